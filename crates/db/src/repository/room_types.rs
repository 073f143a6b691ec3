//! Room type (category and nightly price) operations, scoped by hotel.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{RoomTypeFields, RoomTypeRow},
};

pub async fn create_room_type(
    pool: &SqlitePool,
    hotel_id: Uuid,
    fields: &RoomTypeFields,
) -> Result<RoomTypeRow, DbError> {
    let row = sqlx::query_as::<_, RoomTypeRow>(
        r#"
        INSERT INTO room_types (id, hotel_id, name, description, capacity, base_price_cents)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(hotel_id)
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.capacity)
    .bind(fields.base_price_cents)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_room_type(pool: &SqlitePool, hotel_id: Uuid, id: Uuid) -> Result<RoomTypeRow, DbError> {
    sqlx::query_as::<_, RoomTypeRow>("SELECT * FROM room_types WHERE id = ? AND hotel_id = ?")
        .bind(id)
        .bind(hotel_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

pub async fn list_room_types(pool: &SqlitePool, hotel_id: Uuid) -> Result<Vec<RoomTypeRow>, DbError> {
    let rows = sqlx::query_as::<_, RoomTypeRow>(
        "SELECT * FROM room_types WHERE hotel_id = ? ORDER BY base_price_cents, name",
    )
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn update_room_type(
    pool: &SqlitePool,
    hotel_id: Uuid,
    id: Uuid,
    fields: &RoomTypeFields,
) -> Result<RoomTypeRow, DbError> {
    sqlx::query_as::<_, RoomTypeRow>(
        r#"
        UPDATE room_types
        SET name = ?, description = ?, capacity = ?, base_price_cents = ?
        WHERE id = ? AND hotel_id = ?
        RETURNING *
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.capacity)
    .bind(fields.base_price_cents)
    .bind(id)
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Delete a room type.  Fails with `DbError::ForeignKeyViolation` while rooms
/// still use it.
pub async fn delete_room_type(pool: &SqlitePool, hotel_id: Uuid, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM room_types WHERE id = ? AND hotel_id = ?")
        .bind(id)
        .bind(hotel_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
