use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use db::models::{NewUser, UserRow, UserUpdate};
use db::repository::users as user_repo;
use domain::Role;

use super::{ensure_quota, parse_stored, AppState, Quota};
use crate::auth::{hash_password_blocking, AuthUser};
use crate::dto::{CreateStaffRequest, UpdateEmployeeRequest, ValidJson};
use crate::error::{ApiError, DbResultExt};

pub async fn list(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<UserRow>>, ApiError> {
    let rows = user_repo::list_by_hotel_role(&state.pool, user.hotel_id()?, Role::Employee.as_str()).await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<CreateStaffRequest>,
) -> Result<(StatusCode, Json<UserRow>), ApiError> {
    let hotel_id = user.hotel_id()?;
    ensure_quota(&state, hotel_id, Quota::Employees).await?;

    let password_hash = hash_password_blocking(payload.password).await?;
    let employee = user_repo::create_user(
        &state.pool,
        &NewUser {
            hotel_id: Some(hotel_id),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone: payload.phone,
            password_hash,
            role: Role::Employee.to_string(),
            position: payload.position,
        },
    )
    .await
    .or_conflict("email is already registered")?;

    info!(user_id = %employee.id, %hotel_id, "employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<UpdateEmployeeRequest>,
) -> Result<Json<UserRow>, ApiError> {
    let hotel_id = user.hotel_id()?;
    let existing = user_repo::get_user(&state.pool, id).await.or_not_found("employee")?;
    if existing.hotel_id != Some(hotel_id) || parse_stored::<Role>(&existing.role)? != Role::Employee {
        return Err(ApiError::NotFound("employee not found".into()));
    }
    // Reactivation takes a seat of the plan again.
    if payload.is_active && !existing.is_active {
        ensure_quota(&state, hotel_id, Quota::Employees).await?;
    }

    let row = user_repo::update_hotel_user(
        &state.pool,
        hotel_id,
        id,
        &UserUpdate {
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            position: payload.position,
            is_active: payload.is_active,
        },
    )
    .await
    .or_not_found("employee")?;
    Ok(Json(row))
}

/// Deactivates the account; planning history is kept.
pub async fn deactivate(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    user_repo::deactivate_hotel_user(&state.pool, user.hotel_id()?, Role::Employee.as_str(), id)
        .await
        .or_not_found("employee")?;
    info!(user_id = %id, "employee deactivated");
    Ok(StatusCode::NO_CONTENT)
}
