//! Catalog route handlers.
//!
//! `/api/products` is the open JSON surface the storefront reads; the
//! mutating verbs exist for the admin client, which reaches them from
//! behind the gate. `/admin/products` serves the admin catalog view's data.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use dora_patisserie_core::ProductId;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::models::{NewProduct, ProductUpdate};
use crate::state::AppState;

/// List the catalog, grouped by category.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = ProductRepository::new(state.pool())
        .list()
        .await
        .map_err(|e| AppError::from_repo("Failed to fetch products", "Product", e))?;

    Ok(Json(products))
}

/// Fetch one product.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await
        .map_err(|e| AppError::from_repo("Failed to fetch product", "Product", e))?;

    Ok(Json(product))
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewProduct>,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductRepository::new(state.pool())
        .create(body)
        .await
        .map_err(|e| AppError::from_repo("Failed to create product", "Product", e))?;

    tracing::info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Sparse update of a product.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductUpdate>,
) -> Result<impl IntoResponse, AppError> {
    if body.is_empty() {
        return Err(AppError::Validation("no fields to update".to_owned()));
    }

    let product = ProductRepository::new(state.pool())
        .update(id, body)
        .await
        .map_err(|e| AppError::from_repo("Failed to update product", "Product", e))?;

    Ok(Json(product))
}

/// Delete a product. Existing order items keep their snapshots.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| AppError::from_repo("Failed to delete product", "Product", e))?;

    tracing::info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
