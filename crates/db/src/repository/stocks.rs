//! Stock items and the movement ledger.
//!
//! Quantities only ever change through [`record_movement`], which writes the
//! ledger line and the new quantity in one transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    DbError,
    models::{NewStockMovement, StockFields, StockMovementRow, StockRow},
};

/// Create a stock item with an initial quantity of zero.
pub async fn create_stock(pool: &SqlitePool, hotel_id: Uuid, fields: &StockFields) -> Result<StockRow, DbError> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, StockRow>(
        r#"
        INSERT INTO stocks (id, hotel_id, name, category, unit, quantity, alert_threshold, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(hotel_id)
    .bind(&fields.name)
    .bind(&fields.category)
    .bind(&fields.unit)
    .bind(fields.alert_threshold)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_stock(pool: &SqlitePool, hotel_id: Uuid, id: Uuid) -> Result<StockRow, DbError> {
    sqlx::query_as::<_, StockRow>("SELECT * FROM stocks WHERE id = ? AND hotel_id = ?")
        .bind(id)
        .bind(hotel_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Stock items of a hotel, optionally narrowed to one category.
pub async fn list_stocks(
    pool: &SqlitePool,
    hotel_id: Uuid,
    category: Option<&str>,
) -> Result<Vec<StockRow>, DbError> {
    let rows = sqlx::query_as::<_, StockRow>(
        r#"
        SELECT * FROM stocks
        WHERE hotel_id = ? AND (? IS NULL OR category = ?)
        ORDER BY category, name
        "#,
    )
    .bind(hotel_id)
    .bind(category)
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Items at or below their alert threshold.
pub async fn list_low_stocks(pool: &SqlitePool, hotel_id: Uuid) -> Result<Vec<StockRow>, DbError> {
    let rows = sqlx::query_as::<_, StockRow>(
        "SELECT * FROM stocks WHERE hotel_id = ? AND quantity <= alert_threshold ORDER BY name",
    )
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn update_stock(
    pool: &SqlitePool,
    hotel_id: Uuid,
    id: Uuid,
    fields: &StockFields,
) -> Result<StockRow, DbError> {
    sqlx::query_as::<_, StockRow>(
        r#"
        UPDATE stocks
        SET name = ?, category = ?, unit = ?, alert_threshold = ?, updated_at = ?
        WHERE id = ? AND hotel_id = ?
        RETURNING *
        "#,
    )
    .bind(&fields.name)
    .bind(&fields.category)
    .bind(&fields.unit)
    .bind(fields.alert_threshold)
    .bind(Utc::now())
    .bind(id)
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Delete a stock item together with its ledger.
pub async fn delete_stock(pool: &SqlitePool, hotel_id: Uuid, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM stocks WHERE id = ? AND hotel_id = ?")
        .bind(id)
        .bind(hotel_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Apply a signed movement to a stock item of `hotel_id` and append it to the
/// ledger.
///
/// The quantity update is guarded so the stored quantity never goes below
/// zero.  On `DbError::InsufficientStock` or `DbError::NotFound` the
/// transaction is rolled back and no ledger line is written.
#[instrument(skip(pool, movement), fields(stock_id = %movement.stock_id, delta = movement.delta))]
pub async fn record_movement(
    pool: &SqlitePool,
    hotel_id: Uuid,
    movement: &NewStockMovement,
) -> Result<(StockRow, StockMovementRow), DbError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let stock = sqlx::query_as::<_, StockRow>(
        r#"
        UPDATE stocks SET quantity = quantity + ?, updated_at = ?
        WHERE id = ? AND hotel_id = ? AND quantity + ? >= 0
        RETURNING *
        "#,
    )
    .bind(movement.delta)
    .bind(now)
    .bind(movement.stock_id)
    .bind(hotel_id)
    .bind(movement.delta)
    .fetch_optional(&mut *tx)
    .await?;

    let stock = match stock {
        Some(stock) => stock,
        None => {
            let available = sqlx::query_scalar::<_, i64>(
                "SELECT quantity FROM stocks WHERE id = ? AND hotel_id = ?",
            )
            .bind(movement.stock_id)
            .bind(hotel_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;
            return Err(DbError::InsufficientStock {
                available,
                requested: movement.delta.saturating_neg(),
            });
        }
    };

    let line = sqlx::query_as::<_, StockMovementRow>(
        r#"
        INSERT INTO stock_movements (id, stock_id, user_id, kind, quantity, reason, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(movement.stock_id)
    .bind(movement.user_id)
    .bind(&movement.kind)
    .bind(movement.delta)
    .bind(&movement.reason)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(quantity = stock.quantity, "stock movement recorded");
    Ok((stock, line))
}

/// Ledger of one stock item, newest first.
pub async fn list_movements(
    pool: &SqlitePool,
    hotel_id: Uuid,
    stock_id: Uuid,
) -> Result<Vec<StockMovementRow>, DbError> {
    let rows = sqlx::query_as::<_, StockMovementRow>(
        r#"
        SELECT m.* FROM stock_movements m
        JOIN stocks s ON s.id = m.stock_id
        WHERE m.stock_id = ? AND s.hotel_id = ?
        ORDER BY m.created_at DESC
        "#,
    )
    .bind(stock_id)
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count_low_stocks(pool: &SqlitePool, hotel_id: Uuid) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM stocks WHERE hotel_id = ? AND quantity <= alert_threshold",
    )
    .bind(hotel_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
