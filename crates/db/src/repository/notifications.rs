//! In-app notifications.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{DbError, models::NotificationRow};

/// Send the same notification to every user in `user_ids`, atomically.
pub async fn notify_users(
    pool: &SqlitePool,
    user_ids: &[Uuid],
    kind: &str,
    title: &str,
    message: &str,
) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    for user_id in user_ids {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, message, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind)
        .bind(title)
        .bind(message)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(user_ids.len() as u64)
}

/// Notifications of a user, newest first.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
    unread_only: bool,
) -> Result<Vec<NotificationRow>, DbError> {
    let rows = sqlx::query_as::<_, NotificationRow>(
        r#"
        SELECT * FROM notifications
        WHERE user_id = ? AND (? = 0 OR is_read = 0)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(unread_only)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn mark_read(pool: &SqlitePool, user_id: Uuid, id: Uuid) -> Result<NotificationRow, DbError> {
    sqlx::query_as::<_, NotificationRow>(
        "UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ? RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Returns the number of notifications that were unread.
pub async fn mark_all_read(pool: &SqlitePool, user_id: Uuid) -> Result<u64, DbError> {
    let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_notification(pool: &SqlitePool, user_id: Uuid, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
