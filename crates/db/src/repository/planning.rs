//! Staff planning entries (one shift of one employee on one day).

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    DbError,
    models::{PlanningEntryRow, PlanningFields},
};

pub async fn create_entry(
    pool: &SqlitePool,
    hotel_id: Uuid,
    fields: &PlanningFields,
) -> Result<PlanningEntryRow, DbError> {
    let row = sqlx::query_as::<_, PlanningEntryRow>(
        r#"
        INSERT INTO planning_entries
            (id, hotel_id, employee_id, work_date, start_time, end_time, task, notes, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(hotel_id)
    .bind(fields.employee_id)
    .bind(fields.work_date)
    .bind(fields.start_time)
    .bind(fields.end_time)
    .bind(&fields.task)
    .bind(&fields.notes)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Insert several entries atomically.
#[instrument(skip(pool, entries), fields(count = entries.len()))]
pub async fn create_entries(
    pool: &SqlitePool,
    hotel_id: Uuid,
    entries: &[PlanningFields],
) -> Result<Vec<PlanningEntryRow>, DbError> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();
    let mut rows = Vec::with_capacity(entries.len());

    for fields in entries {
        let row = sqlx::query_as::<_, PlanningEntryRow>(
            r#"
            INSERT INTO planning_entries
                (id, hotel_id, employee_id, work_date, start_time, end_time, task, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(hotel_id)
        .bind(fields.employee_id)
        .bind(fields.work_date)
        .bind(fields.start_time)
        .bind(fields.end_time)
        .bind(&fields.task)
        .bind(&fields.notes)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        rows.push(row);
    }

    tx.commit().await?;
    Ok(rows)
}

pub async fn get_entry(pool: &SqlitePool, hotel_id: Uuid, id: Uuid) -> Result<PlanningEntryRow, DbError> {
    sqlx::query_as::<_, PlanningEntryRow>(
        "SELECT * FROM planning_entries WHERE id = ? AND hotel_id = ?",
    )
    .bind(id)
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Entries of a hotel between `from` and `to` inclusive, ordered by day and
/// start time.  `employee_id` narrows to one person.
pub async fn list_entries(
    pool: &SqlitePool,
    hotel_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
    employee_id: Option<Uuid>,
) -> Result<Vec<PlanningEntryRow>, DbError> {
    let rows = sqlx::query_as::<_, PlanningEntryRow>(
        r#"
        SELECT * FROM planning_entries
        WHERE hotel_id = ?
          AND work_date >= ? AND work_date <= ?
          AND (? IS NULL OR employee_id = ?)
        ORDER BY work_date, start_time, employee_id
        "#,
    )
    .bind(hotel_id)
    .bind(from)
    .bind(to)
    .bind(employee_id)
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Shifts of one employee on one day, excluding `exclude` (the entry being
/// edited).
pub async fn list_employee_day(
    pool: &SqlitePool,
    employee_id: Uuid,
    work_date: NaiveDate,
    exclude: Option<Uuid>,
) -> Result<Vec<PlanningEntryRow>, DbError> {
    let rows = sqlx::query_as::<_, PlanningEntryRow>(
        r#"
        SELECT * FROM planning_entries
        WHERE employee_id = ? AND work_date = ? AND (? IS NULL OR id != ?)
        ORDER BY start_time
        "#,
    )
    .bind(employee_id)
    .bind(work_date)
    .bind(exclude)
    .bind(exclude)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn update_entry(
    pool: &SqlitePool,
    hotel_id: Uuid,
    id: Uuid,
    fields: &PlanningFields,
) -> Result<PlanningEntryRow, DbError> {
    sqlx::query_as::<_, PlanningEntryRow>(
        r#"
        UPDATE planning_entries
        SET employee_id = ?, work_date = ?, start_time = ?, end_time = ?, task = ?, notes = ?
        WHERE id = ? AND hotel_id = ?
        RETURNING *
        "#,
    )
    .bind(fields.employee_id)
    .bind(fields.work_date)
    .bind(fields.start_time)
    .bind(fields.end_time)
    .bind(&fields.task)
    .bind(&fields.notes)
    .bind(id)
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

pub async fn delete_entry(pool: &SqlitePool, hotel_id: Uuid, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM planning_entries WHERE id = ? AND hotel_id = ?")
        .bind(id)
        .bind(hotel_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
