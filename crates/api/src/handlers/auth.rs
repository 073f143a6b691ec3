use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};

use db::models::{NewUser, UserRow};
use db::repository::users as user_repo;
use domain::Role;

use super::{parse_stored, AppState};
use crate::auth::{hash_password_blocking, issue_token, verify_password_blocking, AuthUser};
use crate::dto::{AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, ValidJson};
use crate::error::{ApiError, DbResultExt};

/// Self-service sign-up; always creates a client account.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let password_hash = hash_password_blocking(payload.password).await?;
    let user = user_repo::create_user(
        &state.pool,
        &NewUser {
            hotel_id: None,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone: payload.phone,
            password_hash,
            role: Role::Client.to_string(),
            position: None,
        },
    )
    .await
    .or_conflict("email is already registered")?;

    info!(user_id = %user.id, "client registered");
    let token = issue_token(&state.config, &user, Role::Client)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("invalid email or password".into());

    let Some(user) = user_repo::find_by_email(&state.pool, &payload.email).await? else {
        warn!("login attempt for unknown email");
        return Err(invalid());
    };
    if !verify_password_blocking(payload.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(invalid());
    }
    if !user.is_active {
        return Err(ApiError::Forbidden("account is disabled".into()));
    }

    let role: Role = parse_stored(&user.role)?;
    let token = issue_token(&state.config, &user, role)?;
    info!(user_id = %user.id, %role, "user logged in");
    Ok(Json(AuthResponse { token, user }))
}

pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserRow>, ApiError> {
    let row = user_repo::get_user(&state.pool, user.id).await.or_not_found("user")?;
    Ok(Json(row))
}

pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let row = user_repo::get_user(&state.pool, user.id).await.or_not_found("user")?;
    if !verify_password_blocking(payload.current_password, row.password_hash).await? {
        return Err(ApiError::BadRequest("current password is incorrect".into()));
    }

    let password_hash = hash_password_blocking(payload.new_password).await?;
    user_repo::update_password(&state.pool, user.id, &password_hash)
        .await
        .or_not_found("user")?;
    info!(user_id = %user.id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}
