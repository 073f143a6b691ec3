//! HTTP error type.
//!
//! Every handler returns `Result<_, ApiError>`; the error renders as
//! `{"error": "<message>"}` with the matching status code.  Database and
//! domain errors convert with `?`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use db::DbError;
use domain::DomainError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Logged with its detail; the client only sees a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(detail) => {
                error!("request failed: {detail}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => Self::NotFound("resource not found".into()),
            DbError::UniqueViolation(_) => Self::Conflict("resource already exists".into()),
            DbError::ForeignKeyViolation(_) => {
                Self::Conflict("resource is referenced by other records".into())
            }
            DbError::Conflict(msg) => Self::Conflict(msg),
            err @ DbError::InsufficientStock { .. } => Self::BadRequest(err.to_string()),
            err @ (DbError::Sqlx(_) | DbError::Migration(_)) => Self::Internal(err.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::SubscriptionInactive | DomainError::PlanLimitReached(_) => {
                Self::Forbidden(err.to_string())
            }
            DomainError::ShiftConflict(_) => Self::Conflict(err.to_string()),
            _ => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::BadRequest(format!("validation failed: {err}"))
    }
}

/// Attach resource-specific messages to repository results.
pub trait DbResultExt<T> {
    /// Report `DbError::NotFound` as "`what` not found".
    fn or_not_found(self, what: &str) -> Result<T, ApiError>;
    /// Report uniqueness and reference violations with `message`.
    fn or_conflict(self, message: &str) -> Result<T, ApiError>;
}

impl<T> DbResultExt<T> for Result<T, DbError> {
    fn or_not_found(self, what: &str) -> Result<T, ApiError> {
        self.map_err(|err| match err {
            DbError::NotFound => ApiError::NotFound(format!("{what} not found")),
            other => other.into(),
        })
    }

    fn or_conflict(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|err| match err {
            DbError::UniqueViolation(_) | DbError::ForeignKeyViolation(_) => {
                ApiError::Conflict(message.to_string())
            }
            other => other.into(),
        })
    }
}
