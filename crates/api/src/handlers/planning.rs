//! Weekly staff planning.
//!
//! Shifts of one employee on one day never overlap; the check runs before
//! every insert and update.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Duration;
use tracing::info;
use uuid::Uuid;

use db::models::{PlanningEntryRow, PlanningFields};
use db::repository::{planning as planning_repo, users as user_repo};
use domain::planning::weeks_between;
use domain::{week_bounds, DomainError, Role, Shift};

use super::{parse_stored, today, AppState};
use crate::auth::AuthUser;
use crate::dto::{CopyWeekRequest, CopyWeekResponse, PlanningRequest, ValidJson, WeekPlanning, WeekQuery};
use crate::error::{ApiError, DbResultExt};

fn shift_of(row: &PlanningEntryRow) -> Result<Shift, ApiError> {
    Shift::new(row.start_time, row.end_time)
        .map_err(|e| ApiError::Internal(format!("stored shift {}: {e}", row.id)))
}

/// Fail with `ShiftConflict` if `shift` overlaps any of `others`.
fn ensure_free(shift: &Shift, others: &[Shift]) -> Result<(), DomainError> {
    match others.iter().find(|other| shift.overlaps(other)) {
        Some(other) => Err(DomainError::ShiftConflict(format!(
            "employee already works from {} to {}",
            other.start.format("%H:%M"),
            other.end.format("%H:%M")
        ))),
        None => Ok(()),
    }
}

async fn day_shifts(
    state: &AppState,
    fields: &PlanningFields,
    exclude: Option<Uuid>,
) -> Result<Vec<Shift>, ApiError> {
    planning_repo::list_employee_day(&state.pool, fields.employee_id, fields.work_date, exclude)
        .await?
        .iter()
        .map(shift_of)
        .collect()
}

/// Whether `employee_id` is still an active employee of `hotel_id`.
async fn is_active_employee(state: &AppState, hotel_id: Uuid, employee_id: Uuid) -> Result<bool, ApiError> {
    let employee = match user_repo::get_user(&state.pool, employee_id).await {
        Ok(employee) => employee,
        Err(db::DbError::NotFound) => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    Ok(employee.is_active
        && employee.hotel_id == Some(hotel_id)
        && parse_stored::<Role>(&employee.role)? == Role::Employee)
}

/// The employee must be an active employee of `hotel_id`.
async fn ensure_employee(state: &AppState, hotel_id: Uuid, employee_id: Uuid) -> Result<(), ApiError> {
    let employee = user_repo::get_user(&state.pool, employee_id)
        .await
        .or_not_found("employee")?;
    if employee.hotel_id != Some(hotel_id) || parse_stored::<Role>(&employee.role)? != Role::Employee {
        return Err(ApiError::NotFound("employee not found".into()));
    }
    if !employee.is_active {
        return Err(ApiError::BadRequest("employee account is deactivated".into()));
    }
    Ok(())
}

async fn validated_fields(
    state: &AppState,
    hotel_id: Uuid,
    payload: PlanningRequest,
    exclude: Option<Uuid>,
) -> Result<PlanningFields, ApiError> {
    let shift = Shift::new(payload.start_time, payload.end_time)?;
    ensure_employee(state, hotel_id, payload.employee_id).await?;

    let fields = PlanningFields {
        employee_id: payload.employee_id,
        work_date: payload.work_date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        task: payload.task,
        notes: payload.notes,
    };
    ensure_free(&shift, &day_shifts(state, &fields, exclude).await?)?;
    Ok(fields)
}

async fn week_view(
    state: &AppState,
    hotel_id: Uuid,
    query: WeekQuery,
    employee_id: Option<Uuid>,
) -> Result<WeekPlanning<PlanningEntryRow>, ApiError> {
    let (week_start, week_end) = week_bounds(query.week.unwrap_or_else(today));
    let entries = planning_repo::list_entries(&state.pool, hotel_id, week_start, week_end, employee_id).await?;

    let mut total_hours = 0.0;
    for entry in &entries {
        total_hours += shift_of(entry)?.hours();
    }
    Ok(WeekPlanning {
        week_start,
        week_end,
        total_hours,
        entries,
    })
}

// ---- admin ----

pub async fn admin_week(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekPlanning<PlanningEntryRow>>, ApiError> {
    let employee_id = query.employee_id;
    Ok(Json(week_view(&state, user.hotel_id()?, query, employee_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<PlanningRequest>,
) -> Result<(StatusCode, Json<PlanningEntryRow>), ApiError> {
    let hotel_id = user.hotel_id()?;
    let fields = validated_fields(&state, hotel_id, payload, None).await?;
    let row = planning_repo::create_entry(&state.pool, hotel_id, &fields).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<PlanningRequest>,
) -> Result<Json<PlanningEntryRow>, ApiError> {
    let hotel_id = user.hotel_id()?;
    planning_repo::get_entry(&state.pool, hotel_id, id)
        .await
        .or_not_found("planning entry")?;
    let fields = validated_fields(&state, hotel_id, payload, Some(id)).await?;
    let row = planning_repo::update_entry(&state.pool, hotel_id, id, &fields)
        .await
        .or_not_found("planning entry")?;
    Ok(Json(row))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    planning_repo::delete_entry(&state.pool, user.hotel_id()?, id)
        .await
        .or_not_found("planning entry")?;
    Ok(StatusCode::NO_CONTENT)
}

/// Repeat the shifts of one week in another, skipping any that would
/// overlap what is already planned there or that belong to employees who
/// are no longer active.
pub async fn copy_week(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<CopyWeekRequest>,
) -> Result<(StatusCode, Json<CopyWeekResponse<PlanningEntryRow>>), ApiError> {
    let hotel_id = user.hotel_id()?;
    let offset = weeks_between(payload.from_week, payload.to_week);
    if offset == 0 {
        return Err(ApiError::BadRequest("source and target weeks are the same".into()));
    }

    let (from, to) = week_bounds(payload.from_week);
    let source = planning_repo::list_entries(&state.pool, hotel_id, from, to, payload.employee_id).await?;

    let mut active: HashMap<Uuid, bool> = HashMap::new();
    let mut planned: Vec<PlanningFields> = Vec::with_capacity(source.len());
    let mut skipped = 0;
    for entry in &source {
        let still_employed = match active.get(&entry.employee_id) {
            Some(&known) => known,
            None => {
                let known = is_active_employee(&state, hotel_id, entry.employee_id).await?;
                active.insert(entry.employee_id, known);
                known
            }
        };
        if !still_employed {
            skipped += 1;
            continue;
        }

        let fields = PlanningFields {
            employee_id: entry.employee_id,
            work_date: entry.work_date + Duration::weeks(offset),
            start_time: entry.start_time,
            end_time: entry.end_time,
            task: entry.task.clone(),
            notes: entry.notes.clone(),
        };
        let shift = shift_of(entry)?;

        let mut taken = day_shifts(&state, &fields, None).await?;
        taken.extend(
            planned
                .iter()
                .filter(|p| p.employee_id == fields.employee_id && p.work_date == fields.work_date)
                .map(|p| Shift {
                    start: p.start_time,
                    end: p.end_time,
                }),
        );

        if ensure_free(&shift, &taken).is_ok() {
            planned.push(fields);
        } else {
            skipped += 1;
        }
    }

    let created = planning_repo::create_entries(&state.pool, hotel_id, &planned).await?;
    info!(%hotel_id, created = created.len(), skipped, "planning week copied");
    Ok((StatusCode::CREATED, Json(CopyWeekResponse { created, skipped })))
}

// ---- employee ----

/// The caller's own shifts for a week.
pub async fn own_week(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekPlanning<PlanningEntryRow>>, ApiError> {
    Ok(Json(week_view(&state, user.hotel_id()?, query, Some(user.id)).await?))
}
