pub mod auth;
pub mod client;
pub mod dashboard;
pub mod employees;
pub mod notifications;
pub mod planning;
pub mod reservations;
pub mod rooms;
pub mod stocks;
pub mod superadmin;

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use tracing::warn;
use uuid::Uuid;

use db::repository::{
    notifications as notification_repo, rooms as room_repo, subscriptions as subscription_repo,
    users as user_repo,
};
use domain::subscription::ensure_capacity;
use domain::{DomainError, Role};

use crate::error::ApiError;
pub use crate::state::AppState;

/// Calendar day used for business rules (UTC).
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Deliver an in-app notification; failures are logged and never fail the
/// request that triggered them.
pub(crate) async fn notify(state: &AppState, user_ids: &[Uuid], kind: &str, title: &str, message: &str) {
    if user_ids.is_empty() {
        return;
    }
    if let Err(e) = notification_repo::notify_users(&state.pool, user_ids, kind, title, message).await {
        warn!(kind, "failed to deliver notification: {e}");
    }
}

/// Parse an enum column written by this service; a bad value is a data
/// corruption, not a client error.
pub(crate) fn parse_stored<T>(value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .parse()
        .map_err(|e: DomainError| ApiError::Internal(format!("stored value: {e}")))
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Quota {
    Rooms,
    Employees,
}

/// Refuse to grow a hotel beyond the plan of its effective subscription.
pub(crate) async fn ensure_quota(state: &AppState, hotel_id: Uuid, quota: Quota) -> Result<(), ApiError> {
    let subscription = subscription_repo::effective_for_hotel(&state.pool, hotel_id, today())
        .await?
        .ok_or(DomainError::SubscriptionInactive)?;

    match quota {
        Quota::Rooms => {
            let rooms = room_repo::count_rooms(&state.pool, hotel_id).await?;
            ensure_capacity(rooms, subscription.max_rooms, "rooms")?;
        }
        Quota::Employees => {
            let employees =
                user_repo::count_active_by_hotel_role(&state.pool, hotel_id, Role::Employee.as_str()).await?;
            ensure_capacity(employees, subscription.max_employees, "employees")?;
        }
    }
    Ok(())
}
