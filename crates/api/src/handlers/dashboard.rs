//! Admin overview of the hotel and its subscription.

use axum::{extract::State, Json};
use chrono::{Datelike, NaiveDate};

use db::repository::{
    reservations as reservation_repo, rooms as room_repo, stocks as stock_repo,
    subscriptions as subscription_repo, users as user_repo,
};
use domain::{cents_to_decimal, Role};

use super::{today, AppState};
use crate::auth::AuthUser;
use crate::dto::{CountBy, Dashboard, SubscriptionUsage};
use crate::error::ApiError;

/// First and last day of the month containing `day`.
fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(day);
    (first, last)
}

pub async fn dashboard(State(state): State<AppState>, user: AuthUser) -> Result<Json<Dashboard>, ApiError> {
    let hotel_id = user.hotel_id()?;
    let day = today();
    let (month_start, month_end) = month_bounds(day);

    let rooms_by_status = room_repo::count_by_status(&state.pool, hotel_id).await?;
    let reservations_by_status = reservation_repo::count_by_status(&state.pool, hotel_id).await?;
    let arrivals_today = reservation_repo::count_arrivals(&state.pool, hotel_id, day).await?;
    let departures_today = reservation_repo::count_departures(&state.pool, hotel_id, day).await?;
    let revenue = reservation_repo::revenue_cents(&state.pool, hotel_id, month_start, month_end).await?;
    let low_stock_items = stock_repo::count_low_stocks(&state.pool, hotel_id).await?;

    Ok(Json(Dashboard {
        rooms_by_status: rooms_by_status.into_iter().map(CountBy::from).collect(),
        reservations_by_status: reservations_by_status.into_iter().map(CountBy::from).collect(),
        arrivals_today,
        departures_today,
        revenue_this_month: cents_to_decimal(revenue),
        low_stock_items,
    }))
}

/// Current subscription with how much of the plan is in use.
pub async fn subscription(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<SubscriptionUsage>, ApiError> {
    let hotel_id = user.hotel_id()?;
    let subscription = subscription_repo::effective_for_hotel(&state.pool, hotel_id, today()).await?;
    let rooms = room_repo::count_rooms(&state.pool, hotel_id).await?;
    let employees =
        user_repo::count_active_by_hotel_role(&state.pool, hotel_id, Role::Employee.as_str()).await?;

    Ok(Json(SubscriptionUsage {
        subscription,
        rooms,
        employees,
    }))
}
