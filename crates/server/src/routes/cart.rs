//! Cart and checkout route handlers.
//!
//! The cart lives in the session under a fixed key, one per browser,
//! surviving reloads. Handlers load it, apply one pure cart operation, and
//! store it back; the session store is the single writer. Checkout turns
//! the cart's snapshots into an order verbatim, with no revalidation
//! against the live catalog.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;

use chrono::NaiveDate;
use dora_patisserie_core::{Cart, ProductId, ProductSnapshot};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::OptionalAuth;
use crate::models::{NewOrder, NewOrderItem, session_keys};
use crate::state::AppState;

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    #[serde(flatten)]
    pub product: ProductSnapshot,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Body for overwriting one line's quantity.
#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Checkout contact and delivery details. The items come from the session
/// cart, never from this body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_date: NaiveDate,
    pub notes: Option<String>,
}

/// The cart as the client sees it: lines plus the derived totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Cart,
    pub total: rust_decimal::Decimal,
    pub item_count: u32,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let total = cart.total();
        let item_count = cart.item_count();
        Self {
            items: cart,
            total,
            item_count,
        }
    }
}

async fn load_cart(session: &Session) -> Result<Cart, AppError> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

async fn store_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Read the session cart.
pub async fn get(session: Session) -> Result<impl IntoResponse, AppError> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartView::from(cart)))
}

/// Add a product to the cart, merging quantities when it is already there.
pub async fn add(
    session: Session,
    Json(body): Json<AddToCartRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.quantity == 0 {
        return Err(AppError::Validation("quantity must be positive".to_owned()));
    }

    let mut cart = load_cart(&session).await?;
    cart.add(body.product, body.quantity);
    store_cart(&session, &cart).await?;

    Ok(Json(CartView::from(cart)))
}

/// Overwrite one line's quantity; zero removes the line.
pub async fn set_quantity(
    session: Session,
    Json(body): Json<SetQuantityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut cart = load_cart(&session).await?;
    cart.set_quantity(body.product_id, body.quantity);
    store_cart(&session, &cart).await?;

    Ok(Json(CartView::from(cart)))
}

/// Remove one product's line entirely.
pub async fn remove(
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    let mut cart = load_cart(&session).await?;
    cart.remove(product_id);
    store_cart(&session, &cart).await?;

    Ok(Json(CartView::from(cart)))
}

/// Empty the cart.
pub async fn clear(session: Session) -> Result<impl IntoResponse, AppError> {
    let cart = Cart::new();
    store_cart(&session, &cart).await?;

    Ok(Json(CartView::from(cart)))
}

/// Place an order from the session cart, then clear it.
///
/// Item names and prices are the snapshots taken when each product was
/// added; a price change between add and checkout does not reprice the
/// order.
pub async fn checkout(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Json(body): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(AppError::Validation("cart is empty".to_owned()));
    }

    let items = cart
        .lines()
        .iter()
        .map(|line| NewOrderItem {
            product_id: line.product.id,
            product_name: line.product.name.clone(),
            quantity: line.quantity,
            unit_price: line.product.price,
        })
        .collect();

    let new_order = NewOrder {
        customer_name: body.customer_name,
        customer_phone: body.customer_phone,
        customer_email: body.customer_email,
        delivery_address: body.delivery_address,
        delivery_date: body.delivery_date,
        notes: body.notes,
        items,
    };

    let order = OrderRepository::new(state.pool())
        .create(new_order, user.map(|u| u.id))
        .await
        .map_err(|e| AppError::from_repo("Failed to create order", "Order", e))?;

    // Only clear once the order is committed; a failed checkout keeps the
    // cart intact for a retry.
    store_cart(&session, &Cart::new()).await?;

    tracing::info!(order_id = %order.id, total = %order.total, "checkout complete");
    Ok((StatusCode::CREATED, Json(json!({ "order": order }))))
}
