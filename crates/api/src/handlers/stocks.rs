//! Inventory items and their movement ledger.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use db::models::{NewStockMovement, StockFields, StockMovementRow, StockRow};
use db::repository::{stocks as stock_repo, users as user_repo};
use domain::stock::{apply_delta, is_low};

use super::{notify, AppState};
use crate::auth::AuthUser;
use crate::dto::{MovementRequest, StockQuery, StockRequest, ValidJson};
use crate::error::{ApiError, DbResultExt};

impl From<StockRequest> for StockFields {
    fn from(req: StockRequest) -> Self {
        Self {
            name: req.name,
            category: req.category,
            unit: req.unit,
            alert_threshold: req.alert_threshold,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovementResponse {
    pub stock: StockRow,
    pub movement: StockMovementRow,
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<StockQuery>,
) -> Result<Json<Vec<StockRow>>, ApiError> {
    let rows = stock_repo::list_stocks(&state.pool, user.hotel_id()?, query.category.as_deref()).await?;
    Ok(Json(rows))
}

/// Items at or below their alert threshold.
pub async fn alerts(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<StockRow>>, ApiError> {
    let rows = stock_repo::list_low_stocks(&state.pool, user.hotel_id()?).await?;
    Ok(Json(rows))
}

pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<StockRow>, ApiError> {
    let row = stock_repo::get_stock(&state.pool, user.hotel_id()?, id)
        .await
        .or_not_found("stock item")?;
    Ok(Json(row))
}

/// New items start empty; goods arrive through an `in` movement.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<StockRequest>,
) -> Result<(StatusCode, Json<StockRow>), ApiError> {
    let row = stock_repo::create_stock(&state.pool, user.hotel_id()?, &payload.into())
        .await
        .or_conflict("a stock item with this name already exists")?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<StockRequest>,
) -> Result<Json<StockRow>, ApiError> {
    let row = stock_repo::update_stock(&state.pool, user.hotel_id()?, id, &payload.into())
        .await
        .map_err(|e| match e {
            db::DbError::NotFound => ApiError::NotFound("stock item not found".into()),
            db::DbError::UniqueViolation(_) => {
                ApiError::Conflict("a stock item with this name already exists".into())
            }
            other => other.into(),
        })?;
    Ok(Json(row))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, ApiError> {
    stock_repo::delete_stock(&state.pool, user.hotel_id()?, id)
        .await
        .or_not_found("stock item")?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn movements(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<StockMovementRow>>, ApiError> {
    let hotel_id = user.hotel_id()?;
    stock_repo::get_stock(&state.pool, hotel_id, id)
        .await
        .or_not_found("stock item")?;
    let rows = stock_repo::list_movements(&state.pool, hotel_id, id).await?;
    Ok(Json(rows))
}

/// Record a movement and warn the hotel admins when a decreasing movement
/// leaves the item at or below its threshold.
pub async fn record_movement(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    user: AuthUser,
    ValidJson(payload): ValidJson<MovementRequest>,
) -> Result<(StatusCode, Json<MovementResponse>), ApiError> {
    let hotel_id = user.hotel_id()?;
    let delta = payload.kind.delta(payload.quantity)?;

    let current = stock_repo::get_stock(&state.pool, hotel_id, id)
        .await
        .or_not_found("stock item")?;
    apply_delta(current.quantity, delta)?;

    let (stock, movement) = stock_repo::record_movement(
        &state.pool,
        hotel_id,
        &NewStockMovement {
            stock_id: id,
            user_id: Some(user.id),
            kind: payload.kind.to_string(),
            delta,
            reason: payload.reason,
        },
    )
    .await
    .or_not_found("stock item")?;

    if delta < 0 && is_low(stock.quantity, stock.alert_threshold) {
        let admins = user_repo::list_active_admin_ids(&state.pool, hotel_id).await?;
        notify(
            &state,
            &admins,
            "low_stock",
            "Low stock",
            &format!(
                "{} is down to {} {} (threshold {})",
                stock.name, stock.quantity, stock.unit, stock.alert_threshold
            ),
        )
        .await;
        info!(stock_id = %id, quantity = stock.quantity, "low stock alert sent");
    }

    Ok((StatusCode::CREATED, Json(MovementResponse { stock, movement })))
}
