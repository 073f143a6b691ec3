//! Hotel CRUD operations.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{HotelFields, HotelRow},
};

pub async fn create_hotel(pool: &SqlitePool, fields: &HotelFields) -> Result<HotelRow, DbError> {
    let row = sqlx::query_as::<_, HotelRow>(
        r#"
        INSERT INTO hotels (id, name, address, city, country, phone, email, stars, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&fields.name)
    .bind(&fields.address)
    .bind(&fields.city)
    .bind(&fields.country)
    .bind(&fields.phone)
    .bind(&fields.email)
    .bind(fields.stars)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_hotel(pool: &SqlitePool, id: Uuid) -> Result<HotelRow, DbError> {
    sqlx::query_as::<_, HotelRow>("SELECT * FROM hotels WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// All hotels, optionally narrowed to a city (case-insensitive substring).
pub async fn list_hotels(pool: &SqlitePool, city: Option<&str>) -> Result<Vec<HotelRow>, DbError> {
    let rows = match city {
        Some(city) => {
            sqlx::query_as::<_, HotelRow>(
                "SELECT * FROM hotels WHERE city LIKE '%' || ? || '%' ORDER BY name",
            )
            .bind(city)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, HotelRow>("SELECT * FROM hotels ORDER BY name")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

/// Hotels whose subscription covers `day`; the ones clients may book.
pub async fn list_bookable_hotels(
    pool: &SqlitePool,
    day: chrono::NaiveDate,
) -> Result<Vec<HotelRow>, DbError> {
    let rows = sqlx::query_as::<_, HotelRow>(
        r#"
        SELECT h.* FROM hotels h
        WHERE EXISTS (
            SELECT 1 FROM subscriptions s
            WHERE s.hotel_id = h.id AND s.status = 'active'
              AND s.start_date <= ? AND s.end_date >= ?
        )
        ORDER BY h.name
        "#,
    )
    .bind(day)
    .bind(day)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn update_hotel(
    pool: &SqlitePool,
    id: Uuid,
    fields: &HotelFields,
) -> Result<HotelRow, DbError> {
    sqlx::query_as::<_, HotelRow>(
        r#"
        UPDATE hotels
        SET name = ?, address = ?, city = ?, country = ?, phone = ?, email = ?, stars = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.address)
    .bind(&fields.city)
    .bind(&fields.country)
    .bind(&fields.phone)
    .bind(&fields.email)
    .bind(fields.stars)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Permanently delete a hotel and, by cascade, everything it owns.
///
/// Returns `DbError::NotFound` if no row was deleted.
pub async fn delete_hotel(pool: &SqlitePool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM hotels WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

pub async fn count_hotels(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM hotels")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
