//! Order route handlers.
//!
//! Creation is open to guests; when the caller has a session, the order is
//! attached to their account server-side. The body never carries an owning
//! identity. Mutating verbs beyond creation belong to the admin client.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use dora_patisserie_core::OrderId;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::OptionalAuth;
use crate::models::{NewOrder, OrderUpdate};
use crate::state::AppState;

/// List all orders: earliest deliveries first, newest requests first within
/// a day.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list()
        .await
        .map_err(|e| AppError::from_repo("Failed to fetch orders", "Order", e))?;

    Ok(Json(orders))
}

/// Fetch one order with its items.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse, AppError> {
    let order = OrderRepository::new(state.pool())
        .get_with_items(id)
        .await
        .map_err(|e| AppError::from_repo("Failed to fetch order", "Order", e))?;

    Ok(Json(order))
}

/// Place an order. The owning identity, if any, comes from the session.
pub async fn create(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Json(body): Json<NewOrder>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = user.map(|u| u.id);

    let order = OrderRepository::new(state.pool())
        .create(body, user_id)
        .await
        .map_err(|e| AppError::from_repo("Failed to create order", "Order", e))?;

    tracing::info!(order_id = %order.id, total = %order.total, "order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// Sparse update of an order. Supplying `items` replaces the item set and
/// recomputes the total.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<OrderUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let order = OrderRepository::new(state.pool())
        .update(id, body)
        .await
        .map_err(|e| AppError::from_repo("Failed to update order", "Order", e))?;

    Ok(Json(order))
}

/// Delete an order and its items.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<impl IntoResponse, AppError> {
    OrderRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| AppError::from_repo("Failed to delete order", "Order", e))?;

    tracing::info!(order_id = %id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
}
