//! Hotel subscriptions.
//!
//! A hotel has at most one `active` subscription; creating a new one cancels
//! the previous in the same transaction.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    DbError,
    models::{NewSubscription, SubscriptionRow, SubscriptionWithPlanRow},
};

#[instrument(skip(pool, new), fields(hotel_id = %new.hotel_id, plan_id = %new.plan_id))]
pub async fn create_subscription(
    pool: &SqlitePool,
    new: &NewSubscription,
) -> Result<SubscriptionRow, DbError> {
    let mut tx = pool.begin().await?;

    let replaced = sqlx::query(
        "UPDATE subscriptions SET status = 'cancelled' WHERE hotel_id = ? AND status = 'active'",
    )
    .bind(new.hotel_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let row = sqlx::query_as::<_, SubscriptionRow>(
        r#"
        INSERT INTO subscriptions (id, hotel_id, plan_id, status, start_date, end_date, created_at)
        VALUES (?, ?, ?, 'active', ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.hotel_id)
    .bind(new.plan_id)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(subscription_id = %row.id, replaced, "subscription created");
    Ok(row)
}

pub async fn list_subscriptions(
    pool: &SqlitePool,
    hotel_id: Option<Uuid>,
) -> Result<Vec<SubscriptionRow>, DbError> {
    let rows = sqlx::query_as::<_, SubscriptionRow>(
        r#"
        SELECT * FROM subscriptions
        WHERE (? IS NULL OR hotel_id = ?)
        ORDER BY created_at DESC
        "#,
    )
    .bind(hotel_id)
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// The subscription covering `day` for a hotel, joined with its plan limits.
pub async fn effective_for_hotel(
    pool: &SqlitePool,
    hotel_id: Uuid,
    day: NaiveDate,
) -> Result<Option<SubscriptionWithPlanRow>, DbError> {
    let row = sqlx::query_as::<_, SubscriptionWithPlanRow>(
        r#"
        SELECT s.id, s.hotel_id, s.plan_id, p.name AS plan_name, s.status,
               s.start_date, s.end_date, p.max_rooms, p.max_employees
        FROM subscriptions s
        JOIN plans p ON p.id = s.plan_id
        WHERE s.hotel_id = ? AND s.status = 'active'
          AND s.start_date <= ? AND s.end_date >= ?
        ORDER BY s.end_date DESC
        LIMIT 1
        "#,
    )
    .bind(hotel_id)
    .bind(day)
    .bind(day)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Cancel an active subscription.
///
/// Returns `DbError::NotFound` if it does not exist and `DbError::Conflict`
/// if it is no longer active.
pub async fn cancel_subscription(pool: &SqlitePool, id: Uuid) -> Result<SubscriptionRow, DbError> {
    let row = sqlx::query_as::<_, SubscriptionRow>(
        "UPDATE subscriptions SET status = 'cancelled' WHERE id = ? AND status = 'active' RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(row),
        None => {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions WHERE id = ?")
                .bind(id)
                .fetch_one(pool)
                .await?;
            if exists == 0 {
                Err(DbError::NotFound)
            } else {
                Err(DbError::Conflict("subscription is not active".into()))
            }
        }
    }
}

/// Mark every active subscription that ended before `today` as expired.
pub async fn expire_overdue(pool: &SqlitePool, today: NaiveDate) -> Result<u64, DbError> {
    let result = sqlx::query(
        "UPDATE subscriptions SET status = 'expired' WHERE status = 'active' AND end_date < ?",
    )
    .bind(today)
    .execute(pool)
    .await?;

    let expired = result.rows_affected();
    if expired > 0 {
        info!(expired, "subscriptions expired");
    }
    Ok(expired)
}

pub async fn count_effective(pool: &SqlitePool, day: NaiveDate) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM subscriptions
        WHERE status = 'active' AND start_date <= ? AND end_date >= ?
        "#,
    )
    .bind(day)
    .bind(day)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
