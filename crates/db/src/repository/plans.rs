//! Subscription plan catalogue.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{PlanFields, PlanRow},
};

pub async fn create_plan(pool: &SqlitePool, fields: &PlanFields) -> Result<PlanRow, DbError> {
    let row = sqlx::query_as::<_, PlanRow>(
        r#"
        INSERT INTO plans (id, name, monthly_price_cents, max_rooms, max_employees, description, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&fields.name)
    .bind(fields.monthly_price_cents)
    .bind(fields.max_rooms)
    .bind(fields.max_employees)
    .bind(&fields.description)
    .bind(fields.is_active)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_plan(pool: &SqlitePool, id: Uuid) -> Result<PlanRow, DbError> {
    sqlx::query_as::<_, PlanRow>("SELECT * FROM plans WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)
}

pub async fn list_plans(pool: &SqlitePool) -> Result<Vec<PlanRow>, DbError> {
    let rows = sqlx::query_as::<_, PlanRow>("SELECT * FROM plans ORDER BY monthly_price_cents, name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn update_plan(pool: &SqlitePool, id: Uuid, fields: &PlanFields) -> Result<PlanRow, DbError> {
    sqlx::query_as::<_, PlanRow>(
        r#"
        UPDATE plans
        SET name = ?, monthly_price_cents = ?, max_rooms = ?, max_employees = ?, description = ?, is_active = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&fields.name)
    .bind(fields.monthly_price_cents)
    .bind(fields.max_rooms)
    .bind(fields.max_employees)
    .bind(&fields.description)
    .bind(fields.is_active)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}
