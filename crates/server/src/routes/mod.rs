//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database connectivity)
//!
//! # Open JSON API
//! GET  /api/products           - Catalog, ordered by category then name
//! POST /api/products           - Create product
//! GET  /api/products/{id}      - Product detail
//! PUT  /api/products/{id}      - Sparse product update
//! DELETE /api/products/{id}    - Delete product
//! GET  /api/orders             - Orders, delivery date asc then created desc
//! POST /api/orders             - Place order (identity from session, if any)
//! GET  /api/orders/{id}        - Order with items
//! PUT  /api/orders/{id}        - Sparse order update (items replace atomically)
//! DELETE /api/orders/{id}      - Delete order
//! GET  /api/stats              - Dashboard snapshot (never fails: zeros on error)
//! GET  /api/working-hours      - Weekly schedule
//! PUT  /api/working-hours/{id} - Update one day
//!
//! # Cart + checkout (session-backed)
//! GET  /cart                   - Read cart
//! POST /cart                   - Add item (merges quantities)
//! PUT  /cart/quantity          - Overwrite one line's quantity (0 removes)
//! DELETE /cart/{product_id}    - Remove one line
//! DELETE /cart                 - Clear cart
//! POST /checkout               - Cart snapshots + contact fields -> order
//!
//! # Auth entry (gate bounces authenticated callers)
//! GET  /login, /signup         - Entry page data
//! POST /signup                 - Create customer account
//! POST /login                  - Password login
//! POST /logout                 - Destroy session
//!
//! # Account (gate: any authenticated identity)
//! GET  /account                - Own profile + own orders
//! PUT  /account/profile        - Self-service profile update
//!
//! # Admin (gate: owner only)
//! GET  /admin                  - Kanban board data (orders + column order)
//! POST /admin/board/move       - Drag-and-drop status move (from == to is a no-op)
//! GET  /admin/board/events     - SSE order-change feed
//! GET  /admin/products         - Admin catalog view data
//! GET  /admin/hours            - Admin schedule view data
//! ```

pub mod account;
pub mod auth;
pub mod board;
pub mod cart;
pub mod orders;
pub mod products;
pub mod stats;
pub mod working_hours;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the open JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/{id}",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
        .route("/stats", get(stats::get))
        .route("/working-hours", get(working_hours::list))
        .route("/working-hours/{id}", put(working_hours::update))
}

/// Create the cart and checkout router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::get).post(cart::add).delete(cart::clear))
        .route("/cart/quantity", put(cart::set_quantity))
        .route("/cart/{product_id}", delete(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/account", get(account::page))
        .route("/account/profile", put(account::update_profile))
}

/// Create the admin routes router. Access control is the gate middleware's
/// job; these handlers assume an owner caller.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(board::page))
        .route("/admin/board/move", post(board::move_card))
        .route("/admin/board/events", get(board::events))
        .route("/admin/products", get(products::list))
        .route("/admin/hours", get(working_hours::list))
}

/// Assemble the full application router, without middleware layers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", api_routes())
        .merge(cart_routes())
        .merge(auth_routes())
        .merge(account_routes())
        .merge(admin_routes())
}
