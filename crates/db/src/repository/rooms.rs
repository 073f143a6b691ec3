//! Room operations and availability search, scoped by hotel.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{AvailableRoomRow, RoomFields, RoomRow},
    repository::reservations::BLOCKING_STATUSES,
};

pub async fn create_room(pool: &SqlitePool, hotel_id: Uuid, fields: &RoomFields) -> Result<RoomRow, DbError> {
    let row = sqlx::query_as::<_, RoomRow>(
        r#"
        INSERT INTO rooms (id, hotel_id, room_type_id, number, floor, status, created_at)
        VALUES (?, ?, ?, ?, ?, 'available', ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(hotel_id)
    .bind(fields.room_type_id)
    .bind(&fields.number)
    .bind(fields.floor)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_room(pool: &SqlitePool, hotel_id: Uuid, id: Uuid) -> Result<RoomRow, DbError> {
    sqlx::query_as::<_, RoomRow>("SELECT * FROM rooms WHERE id = ? AND hotel_id = ?")
        .bind(id)
        .bind(hotel_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Rooms of a hotel ordered by number, optionally only those in `status`.
pub async fn list_rooms(
    pool: &SqlitePool,
    hotel_id: Uuid,
    status: Option<&str>,
) -> Result<Vec<RoomRow>, DbError> {
    let rows = sqlx::query_as::<_, RoomRow>(
        r#"
        SELECT * FROM rooms
        WHERE hotel_id = ? AND (? IS NULL OR status = ?)
        ORDER BY number
        "#,
    )
    .bind(hotel_id)
    .bind(status)
    .bind(status)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn update_room(
    pool: &SqlitePool,
    hotel_id: Uuid,
    id: Uuid,
    fields: &RoomFields,
) -> Result<RoomRow, DbError> {
    sqlx::query_as::<_, RoomRow>(
        r#"
        UPDATE rooms SET room_type_id = ?, number = ?, floor = ?
        WHERE id = ? AND hotel_id = ?
        RETURNING *
        "#,
    )
    .bind(fields.room_type_id)
    .bind(&fields.number)
    .bind(fields.floor)
    .bind(id)
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Set the housekeeping status of a room.
///
/// `expected` guards against a concurrent check-in or check-out: the update
/// only applies while the room is still in that status.
pub async fn update_room_status(
    pool: &SqlitePool,
    hotel_id: Uuid,
    id: Uuid,
    expected: &str,
    status: &str,
) -> Result<RoomRow, DbError> {
    let row = sqlx::query_as::<_, RoomRow>(
        "UPDATE rooms SET status = ? WHERE id = ? AND hotel_id = ? AND status = ? RETURNING *",
    )
    .bind(status)
    .bind(id)
    .bind(hotel_id)
    .bind(expected)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(row),
        None => {
            // Distinguish a missing room from a lost race.
            get_room(pool, hotel_id, id).await?;
            Err(DbError::Conflict("room status changed concurrently".into()))
        }
    }
}

/// Delete a room.  Fails with `DbError::ForeignKeyViolation` while
/// reservations reference it.
pub async fn delete_room(pool: &SqlitePool, hotel_id: Uuid, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = ? AND hotel_id = ?")
        .bind(id)
        .bind(hotel_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

pub async fn count_rooms(pool: &SqlitePool, hotel_id: Uuid) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rooms WHERE hotel_id = ?")
        .bind(hotel_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Room by id in any hotel, for client bookings where the hotel follows
/// from the room.
pub async fn find_room(pool: &SqlitePool, id: Uuid) -> Result<RoomRow, DbError> {
    sqlx::query_as::<_, RoomRow>("SELECT * FROM rooms WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Rooms of `hotel_id` that can host `guests` people over
/// `[check_in, check_out)`.
///
/// A room qualifies when it is not under maintenance, its type is large
/// enough, and no blocking reservation overlaps the period.
pub async fn list_available_rooms(
    pool: &SqlitePool,
    hotel_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: i64,
) -> Result<Vec<AvailableRoomRow>, DbError> {
    let sql = format!(
        r#"
        SELECT r.id AS room_id, r.number, r.floor,
               t.id AS room_type_id, t.name AS room_type_name, t.capacity, t.base_price_cents
        FROM rooms r
        JOIN room_types t ON t.id = r.room_type_id
        WHERE r.hotel_id = ?
          AND r.status != 'maintenance'
          AND t.capacity >= ?
          AND NOT EXISTS (
              SELECT 1 FROM reservations x
              WHERE x.room_id = r.id
                AND x.status IN ({BLOCKING_STATUSES})
                AND x.check_in < ? AND x.check_out > ?
          )
        ORDER BY t.base_price_cents, r.number
        "#
    );

    let rows = sqlx::query_as::<_, AvailableRoomRow>(&sql)
        .bind(hotel_id)
        .bind(guests)
        .bind(check_out)
        .bind(check_in)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Number of rooms per status for a hotel.
pub async fn count_by_status(pool: &SqlitePool, hotel_id: Uuid) -> Result<Vec<(String, i64)>, DbError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM rooms WHERE hotel_id = ? GROUP BY status ORDER BY status",
    )
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
