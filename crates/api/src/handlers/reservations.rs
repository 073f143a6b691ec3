//! Reservations as seen by admins, employees and clients.
//!
//! All three share [`book`] and [`change_status`]; the per-role handlers only
//! decide whose reservations are visible and which transitions are allowed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use db::models::{NewReservation, ReservationFilter, ReservationRow, RoomRow};
use db::repository::{
    reservations as reservation_repo, room_types as room_type_repo, rooms as room_repo,
    subscriptions as subscription_repo, users as user_repo,
};
use domain::reservation::ensure_client_can_cancel;
use domain::{cents_to_decimal, decimal_to_cents, ReservationStatus, Role, RoomStatus, StayPeriod};

use super::{notify, parse_stored, today, AppState};
use crate::auth::AuthUser;
use crate::dto::{
    ReservationQuery, ReservationRequest, ReservationResponse, ReservationStatusRequest, ValidJson,
};
use crate::error::{ApiError, DbResultExt};

// ---- shared ----

impl From<ReservationQuery> for ReservationFilter {
    fn from(query: ReservationQuery) -> Self {
        Self {
            status: query.status.map(|s| s.as_str().to_string()),
            from: query.from,
            to: query.to,
        }
    }
}

/// Price and store a stay in `room`, then tell the hotel admins.
async fn book(
    state: &AppState,
    room: RoomRow,
    client_id: Uuid,
    payload: ReservationRequest,
    status: ReservationStatus,
) -> Result<ReservationRow, ApiError> {
    let period = StayPeriod::new(payload.check_in, payload.check_out)?;
    if period.check_in < today() {
        return Err(ApiError::BadRequest("check-in date is in the past".into()));
    }
    if parse_stored::<RoomStatus>(&room.status)? == RoomStatus::Maintenance {
        return Err(ApiError::BadRequest("room is under maintenance".into()));
    }

    let room_type = room_type_repo::get_room_type(&state.pool, room.hotel_id, room.room_type_id)
        .await
        .or_not_found("room type")?;
    if payload.guests > room_type.capacity {
        return Err(ApiError::BadRequest(format!(
            "room holds at most {} guests",
            room_type.capacity
        )));
    }
    let total = period.quote(cents_to_decimal(room_type.base_price_cents));

    let row = reservation_repo::create_reservation(
        &state.pool,
        &NewReservation {
            hotel_id: room.hotel_id,
            room_id: room.id,
            client_id,
            check_in: period.check_in,
            check_out: period.check_out,
            guests: payload.guests,
            status: status.to_string(),
            total_price_cents: decimal_to_cents(total)?,
            notes: payload.notes,
        },
    )
    .await?;

    let admins = user_repo::list_active_admin_ids(&state.pool, row.hotel_id).await?;
    notify(
        state,
        &admins,
        "new_reservation",
        "New reservation",
        &format!(
            "Room {} booked from {} to {}",
            room.number, row.check_in, row.check_out
        ),
    )
    .await;
    Ok(row)
}

/// Move a reservation of `hotel_id` to `next`, keeping its room in step,
/// and tell the client.
async fn change_status(
    state: &AppState,
    hotel_id: Uuid,
    id: Uuid,
    next: ReservationStatus,
    actor: &AuthUser,
) -> Result<ReservationRow, ApiError> {
    let reservation = reservation_repo::get_hotel_reservation(&state.pool, hotel_id, id)
        .await
        .or_not_found("reservation")?;
    let current: ReservationStatus = parse_stored(&reservation.status)?;
    let room = room_repo::get_room(&state.pool, hotel_id, reservation.room_id)
        .await
        .or_not_found("room")?;

    let room_next = current.transition(next, parse_stored(&room.status)?)?;
    let row = reservation_repo::transition_status(
        &state.pool,
        id,
        current.as_str(),
        next.as_str(),
        room_next.map(|s| s.as_str()),
    )
    .await?;
    info!(reservation_id = %id, user_id = %actor.id, %next, "reservation updated by staff");

    notify(
        state,
        &[row.client_id],
        "reservation_status",
        "Reservation update",
        &format!("Your reservation from {} is now {}", row.check_in, next),
    )
    .await;
    Ok(row)
}

async fn list_for_hotel(
    state: &AppState,
    user: &AuthUser,
    query: ReservationQuery,
) -> Result<Vec<ReservationResponse>, ApiError> {
    let rows =
        reservation_repo::list_hotel_reservations(&state.pool, user.hotel_id()?, &query.into()).await?;
    Ok(rows.into_iter().map(ReservationResponse::from).collect())
}

// ---- admin ----

pub async fn admin_list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReservationQuery>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    Ok(Json(list_for_hotel(&state, &user, query).await?))
}

pub async fn admin_get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ReservationResponse>, ApiError> {
    let row = reservation_repo::get_hotel_reservation(&state.pool, user.hotel_id()?, id)
        .await
        .or_not_found("reservation")?;
    Ok(Json(row.into()))
}

/// Booking taken by the front desk; it is confirmed straight away.
pub async fn admin_create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    let hotel_id = user.hotel_id()?;
    let client_id = payload
        .client_id
        .ok_or_else(|| ApiError::BadRequest("client_id is required".into()))?;
    let client = user_repo::get_user(&state.pool, client_id)
        .await
        .or_not_found("client")?;
    if parse_stored::<Role>(&client.role)? != Role::Client {
        return Err(ApiError::BadRequest("reservations can only be made for clients".into()));
    }
    let room = room_repo::get_room(&state.pool, hotel_id, payload.room_id)
        .await
        .or_not_found("room")?;

    let row = book(&state, room, client.id, payload, ReservationStatus::Confirmed).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn admin_set_status(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<ReservationStatusRequest>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let row = change_status(&state, user.hotel_id()?, id, payload.status, &user).await?;
    Ok(Json(row.into()))
}

// ---- employee ----

pub async fn staff_list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ReservationQuery>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    Ok(Json(list_for_hotel(&state, &user, query).await?))
}

/// Front-desk employees only check guests in and out.
pub async fn staff_set_status(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<ReservationStatusRequest>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let next = payload.status;
    if user.role == Role::Employee
        && !matches!(next, ReservationStatus::CheckedIn | ReservationStatus::CheckedOut)
    {
        return Err(ApiError::Forbidden("employees may only check guests in or out".into()));
    }
    let row = change_status(&state, user.hotel_id()?, id, next, &user).await?;
    Ok(Json(row.into()))
}

// ---- client ----

pub async fn client_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let rows = reservation_repo::list_client_reservations(&state.pool, user.id).await?;
    Ok(Json(rows.into_iter().map(ReservationResponse::from).collect()))
}

pub async fn client_get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ReservationResponse>, ApiError> {
    let row = reservation_repo::get_client_reservation(&state.pool, user.id, id)
        .await
        .or_not_found("reservation")?;
    Ok(Json(row.into()))
}

/// Online booking; it waits for the hotel to confirm.
pub async fn client_create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    let room = room_repo::find_room(&state.pool, payload.room_id)
        .await
        .or_not_found("room")?;
    if subscription_repo::effective_for_hotel(&state.pool, room.hotel_id, today())
        .await?
        .is_none()
    {
        return Err(ApiError::BadRequest("hotel is not accepting reservations".into()));
    }

    let row = book(&state, room, user.id, payload, ReservationStatus::Pending).await?;
    info!(reservation_id = %row.id, client_id = %user.id, "client booked a stay");
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn client_cancel(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ReservationResponse>, ApiError> {
    let reservation = reservation_repo::get_client_reservation(&state.pool, user.id, id)
        .await
        .or_not_found("reservation")?;
    let current: ReservationStatus = parse_stored(&reservation.status)?;
    ensure_client_can_cancel(current, reservation.check_in, today())?;

    let row = reservation_repo::transition_status(
        &state.pool,
        id,
        current.as_str(),
        ReservationStatus::Cancelled.as_str(),
        None,
    )
    .await?;

    let admins = user_repo::list_active_admin_ids(&state.pool, row.hotel_id).await?;
    notify(
        &state,
        &admins,
        "reservation_cancelled",
        "Reservation cancelled",
        &format!("A guest cancelled the stay from {} to {}", row.check_in, row.check_out),
    )
    .await;
    Ok(Json(row.into()))
}
