//! User account operations.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{NewUser, UserRow, UserUpdate},
};

/// Insert a new user.  The email is lowercased before storage.
///
/// Returns `DbError::UniqueViolation` if the email is already registered.
pub async fn create_user(pool: &SqlitePool, new: &NewUser) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users
            (id, hotel_id, first_name, last_name, email, phone, password_hash, role, position, is_active, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.hotel_id)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(new.email.trim().to_lowercase())
    .bind(&new.phone)
    .bind(&new.password_hash)
    .bind(&new.role)
    .bind(&new.position)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_user(pool: &SqlitePool, id: Uuid) -> Result<UserRow, DbError> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

/// Case-insensitive lookup used by login.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Users of one hotel with the given role, ordered by name.
pub async fn list_by_hotel_role(
    pool: &SqlitePool,
    hotel_id: Uuid,
    role: &str,
) -> Result<Vec<UserRow>, DbError> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT * FROM users
        WHERE hotel_id = ? AND role = ?
        ORDER BY last_name, first_name
        "#,
    )
    .bind(hotel_id)
    .bind(role)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Ids of the active admins of a hotel, the recipients of hotel-wide alerts.
pub async fn list_active_admin_ids(pool: &SqlitePool, hotel_id: Uuid) -> Result<Vec<Uuid>, DbError> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM users WHERE hotel_id = ? AND role = 'admin' AND is_active = 1",
    )
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// Active users of a hotel with the given role.
pub async fn count_active_by_hotel_role(
    pool: &SqlitePool,
    hotel_id: Uuid,
    role: &str,
) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE hotel_id = ? AND role = ? AND is_active = 1",
    )
    .bind(hotel_id)
    .bind(role)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Number of users per role across the platform.
pub async fn count_by_role(pool: &SqlitePool) -> Result<Vec<(String, i64)>, DbError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Overwrite the editable profile fields of a user belonging to `hotel_id`.
///
/// Returns `DbError::NotFound` if the user does not exist in that hotel.
pub async fn update_hotel_user(
    pool: &SqlitePool,
    hotel_id: Uuid,
    id: Uuid,
    update: &UserUpdate,
) -> Result<UserRow, DbError> {
    sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET first_name = ?, last_name = ?, phone = ?, position = ?, is_active = ?
        WHERE id = ? AND hotel_id = ?
        RETURNING *
        "#,
    )
    .bind(&update.first_name)
    .bind(&update.last_name)
    .bind(&update.phone)
    .bind(&update.position)
    .bind(update.is_active)
    .bind(id)
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Deactivate a user of `hotel_id` with the given role.  Accounts are never
/// hard-deleted so their history (movements, planning) stays attributable.
pub async fn deactivate_hotel_user(
    pool: &SqlitePool,
    hotel_id: Uuid,
    role: &str,
    id: Uuid,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE users SET is_active = 0 WHERE id = ? AND hotel_id = ? AND role = ?",
    )
    .bind(id)
    .bind(hotel_id)
    .bind(role)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

pub async fn update_password(pool: &SqlitePool, id: Uuid, password_hash: &str) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
