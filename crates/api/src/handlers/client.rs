//! Public catalogue for clients: bookable hotels, room types and free rooms.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use db::models::HotelRow;
use db::repository::{
    hotels as hotel_repo, room_types as room_type_repo, rooms as room_repo,
    subscriptions as subscription_repo,
};
use domain::StayPeriod;

use super::{today, AppState};
use crate::dto::{AvailabilityQuery, AvailableRoom, HotelQuery, HotelWithRoomTypes, RoomTypeResponse};
use crate::error::{ApiError, DbResultExt};

/// Only hotels with an effective subscription are listed.
pub async fn list_hotels(
    State(state): State<AppState>,
    Query(query): Query<HotelQuery>,
) -> Result<Json<Vec<HotelRow>>, ApiError> {
    let mut hotels = hotel_repo::list_bookable_hotels(&state.pool, today()).await?;
    if let Some(city) = query.city.as_deref().map(str::to_lowercase) {
        hotels.retain(|hotel| hotel.city.to_lowercase().contains(&city));
    }
    Ok(Json(hotels))
}

async fn ensure_bookable(state: &AppState, hotel_id: Uuid) -> Result<HotelRow, ApiError> {
    let hotel = hotel_repo::get_hotel(&state.pool, hotel_id).await.or_not_found("hotel")?;
    if subscription_repo::effective_for_hotel(&state.pool, hotel_id, today())
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("hotel not found".into()));
    }
    Ok(hotel)
}

pub async fn hotel_room_types(
    Path(hotel_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<HotelWithRoomTypes>, ApiError> {
    let hotel = ensure_bookable(&state, hotel_id).await?;
    let room_types = room_type_repo::list_room_types(&state.pool, hotel_id).await?;
    Ok(Json(HotelWithRoomTypes {
        hotel,
        room_types: room_types.into_iter().map(RoomTypeResponse::from).collect(),
    }))
}

/// Rooms free for the whole stay, cheapest first, each with its quote.
pub async fn availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AvailableRoom>>, ApiError> {
    let period = StayPeriod::new(query.check_in, query.check_out)?;
    if query.guests < 1 {
        return Err(ApiError::BadRequest("guests must be at least 1".into()));
    }
    ensure_bookable(&state, query.hotel_id).await?;

    let rooms = room_repo::list_available_rooms(
        &state.pool,
        query.hotel_id,
        period.check_in,
        period.check_out,
        query.guests,
    )
    .await?;
    Ok(Json(rooms.into_iter().map(|row| AvailableRoom::new(row, &period)).collect()))
}
