//! Platform management: hotels, their admins, plans and subscriptions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use db::DbError;
use db::models::{HotelFields, HotelRow, NewSubscription, NewUser, PlanFields, SubscriptionRow, UserRow};
use db::repository::{
    hotels as hotel_repo, plans as plan_repo, subscriptions as subscription_repo, users as user_repo,
};
use domain::{decimal_to_cents, subscription, Role};

use super::{today, AppState};
use crate::auth::hash_password_blocking;
use crate::dto::{
    CountBy, CreateStaffRequest, HotelQuery, HotelRequest, PlanRequest, PlanResponse, PlatformStats,
    SubscriptionQuery, SubscriptionRequest, ValidJson,
};
use crate::error::{ApiError, DbResultExt};

// ---- hotels ----

impl From<HotelRequest> for HotelFields {
    fn from(req: HotelRequest) -> Self {
        Self {
            name: req.name,
            address: req.address,
            city: req.city,
            country: req.country,
            phone: req.phone,
            email: req.email,
            stars: req.stars,
        }
    }
}

pub async fn list_hotels(
    State(state): State<AppState>,
    Query(query): Query<HotelQuery>,
) -> Result<Json<Vec<HotelRow>>, ApiError> {
    let hotels = hotel_repo::list_hotels(&state.pool, query.city.as_deref()).await?;
    Ok(Json(hotels))
}

pub async fn create_hotel(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<HotelRequest>,
) -> Result<(StatusCode, Json<HotelRow>), ApiError> {
    let hotel = hotel_repo::create_hotel(&state.pool, &payload.into()).await?;
    info!(hotel_id = %hotel.id, name = %hotel.name, "hotel created");
    Ok((StatusCode::CREATED, Json(hotel)))
}

pub async fn get_hotel(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<HotelRow>, ApiError> {
    let hotel = hotel_repo::get_hotel(&state.pool, id).await.or_not_found("hotel")?;
    Ok(Json(hotel))
}

pub async fn update_hotel(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<HotelRequest>,
) -> Result<Json<HotelRow>, ApiError> {
    let hotel = hotel_repo::update_hotel(&state.pool, id, &payload.into())
        .await
        .or_not_found("hotel")?;
    Ok(Json(hotel))
}

/// Removes the hotel with all of its rooms, bookings, stock and staff.
pub async fn delete_hotel(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    hotel_repo::delete_hotel(&state.pool, id).await.or_not_found("hotel")?;
    info!(hotel_id = %id, "hotel deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---- hotel admins ----

pub async fn list_admins(
    Path(hotel_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserRow>>, ApiError> {
    hotel_repo::get_hotel(&state.pool, hotel_id).await.or_not_found("hotel")?;
    let admins = user_repo::list_by_hotel_role(&state.pool, hotel_id, Role::Admin.as_str()).await?;
    Ok(Json(admins))
}

pub async fn create_admin(
    Path(hotel_id): Path<Uuid>,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateStaffRequest>,
) -> Result<(StatusCode, Json<UserRow>), ApiError> {
    hotel_repo::get_hotel(&state.pool, hotel_id).await.or_not_found("hotel")?;

    let password_hash = hash_password_blocking(payload.password).await?;
    let admin = user_repo::create_user(
        &state.pool,
        &NewUser {
            hotel_id: Some(hotel_id),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone: payload.phone,
            password_hash,
            role: Role::Admin.to_string(),
            position: payload.position,
        },
    )
    .await
    .or_conflict("email is already registered")?;

    info!(user_id = %admin.id, %hotel_id, "hotel admin created");
    Ok((StatusCode::CREATED, Json(admin)))
}

// ---- plans ----

fn plan_fields(req: PlanRequest) -> Result<PlanFields, ApiError> {
    Ok(PlanFields {
        monthly_price_cents: decimal_to_cents(req.monthly_price)?,
        name: req.name,
        max_rooms: req.max_rooms,
        max_employees: req.max_employees,
        description: req.description,
        is_active: req.is_active,
    })
}

pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = plan_repo::list_plans(&state.pool).await?;
    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

pub async fn create_plan(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<PlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError> {
    let plan = plan_repo::create_plan(&state.pool, &plan_fields(payload)?)
        .await
        .or_conflict("a plan with this name already exists")?;
    Ok((StatusCode::CREATED, Json(plan.into())))
}

pub async fn update_plan(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<PlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = plan_repo::update_plan(&state.pool, id, &plan_fields(payload)?)
        .await
        .map_err(|e| match e {
            DbError::NotFound => ApiError::NotFound("plan not found".into()),
            DbError::UniqueViolation(_) => {
                ApiError::Conflict("a plan with this name already exists".into())
            }
            other => other.into(),
        })?;
    Ok(Json(plan.into()))
}

// ---- subscriptions ----

pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(query): Query<SubscriptionQuery>,
) -> Result<Json<Vec<SubscriptionRow>>, ApiError> {
    let rows = subscription_repo::list_subscriptions(&state.pool, query.hotel_id).await?;
    Ok(Json(rows))
}

/// Start a subscription; the hotel's current one, if any, is cancelled.
pub async fn create_subscription(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionRow>), ApiError> {
    hotel_repo::get_hotel(&state.pool, payload.hotel_id)
        .await
        .or_not_found("hotel")?;
    let plan = plan_repo::get_plan(&state.pool, payload.plan_id)
        .await
        .or_not_found("plan")?;
    if !plan.is_active {
        return Err(ApiError::BadRequest(format!("plan '{}' is not offered anymore", plan.name)));
    }

    let start_date = payload.start_date.unwrap_or_else(today);
    let end_date = subscription::end_date(start_date, payload.months)?;
    let row = subscription_repo::create_subscription(
        &state.pool,
        &NewSubscription {
            hotel_id: payload.hotel_id,
            plan_id: plan.id,
            start_date,
            end_date,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn cancel_subscription(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SubscriptionRow>, ApiError> {
    let row = subscription_repo::cancel_subscription(&state.pool, id)
        .await
        .or_not_found("subscription")?;
    info!(subscription_id = %id, "subscription cancelled");
    Ok(Json(row))
}

pub async fn expire_subscriptions(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let expired = subscription_repo::expire_overdue(&state.pool, today()).await?;
    Ok(Json(json!({ "expired": expired })))
}

// ---- stats ----

pub async fn stats(State(state): State<AppState>) -> Result<Json<PlatformStats>, ApiError> {
    let hotels = hotel_repo::count_hotels(&state.pool).await?;
    let users_by_role = user_repo::count_by_role(&state.pool).await?;
    let active_subscriptions = subscription_repo::count_effective(&state.pool, today()).await?;

    Ok(Json(PlatformStats {
        hotels,
        users_by_role: users_by_role.into_iter().map(CountBy::from).collect(),
        active_subscriptions,
    }))
}
