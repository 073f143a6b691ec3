//! Authentication: password hashing, access tokens, and the role
//! middleware that guards each route prefix.
//!
//! Each request under a guarded prefix goes through [`authorize`]:
//! 1. Read the `Authorization: Bearer <token>` header.
//! 2. Verify the HS256 signature and expiry.
//! 3. Load the account; inactive accounts are refused.
//! 4. Check the account role against the roles allowed for the prefix.
//! 5. Store an [`AuthUser`] in the request extensions for the handler.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use db::models::UserRow;
use db::repository::users as user_repo;
use domain::Role;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// `false` for a wrong password or an unparsable stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// [`hash_password`] on the blocking pool; Argon2 is deliberately slow.
pub async fn hash_password_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(password: String, stored_hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub role: Role,
    pub hotel_id: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(config: &ApiConfig, user: &UserRow, role: Role) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        role,
        hotel_id: user.hotel_id,
        iat: now.timestamp(),
        exp: (now + config.token_ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

pub fn decode_token(config: &ApiConfig, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!("rejected access token: {e}");
        ApiError::Unauthorized("invalid or expired token".into())
    })
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))
}

// ---------------------------------------------------------------------------
// Authenticated user
// ---------------------------------------------------------------------------

/// The caller of a guarded route, as loaded from the database.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub hotel_id: Option<Uuid>,
}

impl AuthUser {
    /// Hotel the caller works for; staff without one cannot act.
    pub fn hotel_id(&self) -> Result<Uuid, ApiError> {
        self.hotel_id
            .ok_or_else(|| ApiError::Forbidden("account is not attached to a hotel".into()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("authentication required".into()))
    }
}

/// Resolve the bearer token of `headers` to an active account.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = bearer_token(headers)?;
    let claims = decode_token(&state.config, token)?;

    let user = match user_repo::get_user(&state.pool, claims.sub).await {
        Ok(user) => user,
        Err(db::DbError::NotFound) => {
            return Err(ApiError::Unauthorized("account no longer exists".into()))
        }
        Err(e) => return Err(e.into()),
    };
    if !user.is_active {
        return Err(ApiError::Forbidden("account is disabled".into()));
    }

    let role: Role = user
        .role
        .parse()
        .map_err(|e| ApiError::Internal(format!("stored role of {}: {e}", user.id)))?;
    Ok(AuthUser {
        id: user.id,
        role,
        hotel_id: user.hotel_id,
    })
}

// ---------------------------------------------------------------------------
// Role middleware
// ---------------------------------------------------------------------------

async fn authorize(
    state: &AppState,
    mut req: Request,
    next: Next,
    allowed: &[Role],
) -> Result<Response, ApiError> {
    let user = authenticate(state, req.headers()).await?;
    if !allowed.contains(&user.role) {
        warn!(user_id = %user.id, role = %user.role, path = %req.uri().path(), "role not allowed");
        return Err(ApiError::Forbidden("insufficient role for this resource".into()));
    }
    if user.role.is_hotel_staff() {
        user.hotel_id()?;
    }
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

pub async fn require_superadmin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, &[Role::SuperAdmin]).await
}

pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, &[Role::Admin]).await
}

/// Employees and their admins share the staff routes.
pub async fn require_staff(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, &[Role::Employee, Role::Admin]).await
}

pub async fn require_client(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(&state, req, next, &[Role::Client]).await
}

pub async fn require_any(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authorize(
        &state,
        req,
        next,
        &[Role::SuperAdmin, Role::Admin, Role::Employee, Role::Client],
    )
    .await
}
