//! Reservation operations.
//!
//! A booking is one guarded insert. A status change runs inside a
//! transaction so that the reservation and room status updates commit
//! together or not at all.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    DbError,
    models::{NewReservation, ReservationFilter, ReservationRow},
};

/// Statuses that hold a room for their dates, as an SQL list.
pub(crate) const BLOCKING_STATUSES: &str = "'pending', 'confirmed', 'checked_in'";

/// Book a room.
///
/// The overlap check and the insert are a single statement, so SQLite takes
/// the write lock before reading and concurrent bookings of the same room
/// queue on the busy timeout instead of failing. Returns `DbError::Conflict`
/// if a blocking reservation of the same room overlaps the requested dates;
/// nothing is written in that case.
#[instrument(skip(pool, new), fields(room_id = %new.room_id))]
pub async fn create_reservation(
    pool: &SqlitePool,
    new: &NewReservation,
) -> Result<ReservationRow, DbError> {
    let sql = format!(
        r#"
        INSERT INTO reservations
            (id, hotel_id, room_id, client_id, check_in, check_out, guests, status,
             total_price_cents, notes, created_at, updated_at)
        SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
        WHERE NOT EXISTS (
            SELECT 1 FROM reservations
            WHERE room_id = ?
              AND status IN ({BLOCKING_STATUSES})
              AND check_in < ? AND check_out > ?
        )
        RETURNING *
        "#
    );
    let now = Utc::now();
    let row = sqlx::query_as::<_, ReservationRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(new.hotel_id)
        .bind(new.room_id)
        .bind(new.client_id)
        .bind(new.check_in)
        .bind(new.check_out)
        .bind(new.guests)
        .bind(&new.status)
        .bind(new.total_price_cents)
        .bind(&new.notes)
        .bind(now)
        .bind(now)
        .bind(new.room_id)
        .bind(new.check_out)
        .bind(new.check_in)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::Conflict("room is already booked for these dates".into()))?;

    info!(reservation_id = %row.id, "reservation created");
    Ok(row)
}

pub async fn get_reservation(pool: &SqlitePool, id: Uuid) -> Result<ReservationRow, DbError> {
    sqlx::query_as::<_, ReservationRow>("SELECT * FROM reservations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Fetch a reservation only if it belongs to `hotel_id`.
pub async fn get_hotel_reservation(
    pool: &SqlitePool,
    hotel_id: Uuid,
    id: Uuid,
) -> Result<ReservationRow, DbError> {
    sqlx::query_as::<_, ReservationRow>("SELECT * FROM reservations WHERE id = ? AND hotel_id = ?")
        .bind(id)
        .bind(hotel_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Fetch a reservation only if it was made by `client_id`.
pub async fn get_client_reservation(
    pool: &SqlitePool,
    client_id: Uuid,
    id: Uuid,
) -> Result<ReservationRow, DbError> {
    sqlx::query_as::<_, ReservationRow>("SELECT * FROM reservations WHERE id = ? AND client_id = ?")
        .bind(id)
        .bind(client_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Reservations of a hotel ordered by check-in date.
pub async fn list_hotel_reservations(
    pool: &SqlitePool,
    hotel_id: Uuid,
    filter: &ReservationFilter,
) -> Result<Vec<ReservationRow>, DbError> {
    let rows = sqlx::query_as::<_, ReservationRow>(
        r#"
        SELECT * FROM reservations
        WHERE hotel_id = ?
          AND (? IS NULL OR status = ?)
          AND (? IS NULL OR check_out > ?)
          AND (? IS NULL OR check_in < ?)
        ORDER BY check_in, created_at
        "#,
    )
    .bind(hotel_id)
    .bind(&filter.status)
    .bind(&filter.status)
    .bind(filter.from)
    .bind(filter.from)
    .bind(filter.to)
    .bind(filter.to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// A client's reservations, most recent stay first.
pub async fn list_client_reservations(
    pool: &SqlitePool,
    client_id: Uuid,
) -> Result<Vec<ReservationRow>, DbError> {
    let rows = sqlx::query_as::<_, ReservationRow>(
        "SELECT * FROM reservations WHERE client_id = ? ORDER BY check_in DESC",
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Move a reservation from `from` to `to` and, when given, set the status of
/// its room in the same transaction.
///
/// The update is conditional on the reservation still being in `from`;
/// a concurrent change yields `DbError::Conflict`.
#[instrument(skip(pool))]
pub async fn transition_status(
    pool: &SqlitePool,
    id: Uuid,
    from: &str,
    to: &str,
    room_status: Option<&str>,
) -> Result<ReservationRow, DbError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ReservationRow>(
        r#"
        UPDATE reservations SET status = ?, updated_at = ?
        WHERE id = ? AND status = ?
        RETURNING *
        "#,
    )
    .bind(to)
    .bind(Utc::now())
    .bind(id)
    .bind(from)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DbError::Conflict("reservation status changed concurrently".into()))?;

    if let Some(room_status) = room_status {
        sqlx::query("UPDATE rooms SET status = ? WHERE id = ?")
            .bind(room_status)
            .bind(row.room_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!(reservation_id = %id, from, to, "reservation status changed");
    Ok(row)
}

/// Number of reservations per status for a hotel.
pub async fn count_by_status(pool: &SqlitePool, hotel_id: Uuid) -> Result<Vec<(String, i64)>, DbError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM reservations WHERE hotel_id = ? GROUP BY status ORDER BY status",
    )
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Confirmed or pending stays starting on `day`.
pub async fn count_arrivals(pool: &SqlitePool, hotel_id: Uuid, day: NaiveDate) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM reservations
        WHERE hotel_id = ? AND check_in = ? AND status IN ('pending', 'confirmed')
        "#,
    )
    .bind(hotel_id)
    .bind(day)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Checked-in stays ending on `day`.
pub async fn count_departures(pool: &SqlitePool, hotel_id: Uuid, day: NaiveDate) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM reservations
        WHERE hotel_id = ? AND check_out = ? AND status = 'checked_in'
        "#,
    )
    .bind(hotel_id)
    .bind(day)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Revenue in cents of completed stays whose check-out falls in
/// `[from, to]`.
pub async fn revenue_cents(
    pool: &SqlitePool,
    hotel_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<i64, DbError> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(total_price_cents), 0) FROM reservations
        WHERE hotel_id = ? AND status = 'checked_out' AND check_out >= ? AND check_out <= ?
        "#,
    )
    .bind(hotel_id)
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(total)
}
