use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use db::models::NotificationRow;
use db::repository::notifications as notification_repo;

use super::AppState;
use crate::auth::AuthUser;
use crate::dto::NotificationQuery;
use crate::error::{ApiError, DbResultExt};

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<NotificationRow>>, ApiError> {
    let rows = notification_repo::list_for_user(&state.pool, user.id, query.unread).await?;
    Ok(Json(rows))
}

pub async fn mark_read(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<NotificationRow>, ApiError> {
    let row = notification_repo::mark_read(&state.pool, user.id, id)
        .await
        .or_not_found("notification")?;
    Ok(Json(row))
}

pub async fn mark_all_read(State(state): State<AppState>, user: AuthUser) -> Result<Json<Value>, ApiError> {
    let updated = notification_repo::mark_all_read(&state.pool, user.id).await?;
    Ok(Json(json!({ "updated": updated })))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    notification_repo::delete_notification(&state.pool, user.id, id)
        .await
        .or_not_found("notification")?;
    Ok(StatusCode::NO_CONTENT)
}
