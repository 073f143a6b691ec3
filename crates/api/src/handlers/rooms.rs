//! Room types and rooms of the caller's hotel.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use db::models::{RoomFields, RoomRow, RoomTypeFields};
use db::repository::{room_types as room_type_repo, rooms as room_repo};
use domain::{decimal_to_cents, RoomStatus};

use super::{ensure_quota, parse_stored, AppState, Quota};
use crate::auth::AuthUser;
use crate::dto::{RoomQuery, RoomRequest, RoomStatusRequest, RoomTypeRequest, RoomTypeResponse, ValidJson};
use crate::error::{ApiError, DbResultExt};

// ---- room types ----

fn room_type_fields(req: RoomTypeRequest) -> Result<RoomTypeFields, ApiError> {
    Ok(RoomTypeFields {
        base_price_cents: decimal_to_cents(req.base_price)?,
        name: req.name,
        description: req.description,
        capacity: req.capacity,
    })
}

pub async fn list_room_types(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<RoomTypeResponse>>, ApiError> {
    let rows = room_type_repo::list_room_types(&state.pool, user.hotel_id()?).await?;
    Ok(Json(rows.into_iter().map(RoomTypeResponse::from).collect()))
}

pub async fn create_room_type(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<RoomTypeRequest>,
) -> Result<(StatusCode, Json<RoomTypeResponse>), ApiError> {
    let row = room_type_repo::create_room_type(&state.pool, user.hotel_id()?, &room_type_fields(payload)?)
        .await
        .or_conflict("a room type with this name already exists")?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_room_type(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<RoomTypeRequest>,
) -> Result<Json<RoomTypeResponse>, ApiError> {
    let hotel_id = user.hotel_id()?;
    room_type_repo::get_room_type(&state.pool, hotel_id, id)
        .await
        .or_not_found("room type")?;
    let row = room_type_repo::update_room_type(&state.pool, hotel_id, id, &room_type_fields(payload)?)
        .await
        .or_conflict("a room type with this name already exists")?;
    Ok(Json(row.into()))
}

/// Fails with 409 while rooms still use the type.
pub async fn delete_room_type(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    room_type_repo::delete_room_type(&state.pool, user.hotel_id()?, id)
        .await
        .or_not_found("room type")
        .map_err(|e| match e {
            ApiError::Conflict(_) => ApiError::Conflict("room type is still used by rooms".into()),
            other => other,
        })?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- rooms ----

pub async fn list_rooms(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RoomQuery>,
) -> Result<Json<Vec<RoomRow>>, ApiError> {
    let status = query.status.map(|s| s.as_str());
    let rows = room_repo::list_rooms(&state.pool, user.hotel_id()?, status).await?;
    Ok(Json(rows))
}

pub async fn get_room(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<RoomRow>, ApiError> {
    let row = room_repo::get_room(&state.pool, user.hotel_id()?, id)
        .await
        .or_not_found("room")?;
    Ok(Json(row))
}

/// New rooms count against the plan of the hotel's subscription.
pub async fn create_room(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<RoomRequest>,
) -> Result<(StatusCode, Json<RoomRow>), ApiError> {
    let hotel_id = user.hotel_id()?;
    room_type_repo::get_room_type(&state.pool, hotel_id, payload.room_type_id)
        .await
        .or_not_found("room type")?;
    ensure_quota(&state, hotel_id, Quota::Rooms).await?;

    let row = room_repo::create_room(
        &state.pool,
        hotel_id,
        &RoomFields {
            room_type_id: payload.room_type_id,
            number: payload.number,
            floor: payload.floor,
        },
    )
    .await
    .or_conflict("room number is already in use")?;
    info!(room_id = %row.id, %hotel_id, number = %row.number, "room created");
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_room(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<RoomRequest>,
) -> Result<Json<RoomRow>, ApiError> {
    let hotel_id = user.hotel_id()?;
    room_repo::get_room(&state.pool, hotel_id, id).await.or_not_found("room")?;
    room_type_repo::get_room_type(&state.pool, hotel_id, payload.room_type_id)
        .await
        .or_not_found("room type")?;

    let row = room_repo::update_room(
        &state.pool,
        hotel_id,
        id,
        &RoomFields {
            room_type_id: payload.room_type_id,
            number: payload.number,
            floor: payload.floor,
        },
    )
    .await
    .or_conflict("room number is already in use")?;
    Ok(Json(row))
}

/// Fails with 409 while reservations reference the room.
pub async fn delete_room(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    room_repo::delete_room(&state.pool, user.hotel_id()?, id)
        .await
        .or_not_found("room")
        .map_err(|e| match e {
            ApiError::Conflict(_) => ApiError::Conflict("room has reservations".into()),
            other => other,
        })?;
    Ok(StatusCode::NO_CONTENT)
}

/// Manual status change by staff (housekeeping, maintenance).
pub async fn set_room_status(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<RoomStatusRequest>,
) -> Result<Json<RoomRow>, ApiError> {
    let hotel_id = user.hotel_id()?;
    let room = room_repo::get_room(&state.pool, hotel_id, id).await.or_not_found("room")?;
    let current: RoomStatus = parse_stored(&room.status)?;
    let next = current.manual_change(payload.status)?;

    let row = room_repo::update_room_status(&state.pool, hotel_id, id, current.as_str(), next.as_str())
        .await
        .or_not_found("room")?;
    info!(room_id = %id, from = %current, to = %next, user_id = %user.id, "room status changed");
    Ok(Json(row))
}
