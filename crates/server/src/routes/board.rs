//! Admin kanban board route handlers.
//!
//! The board shows one column per status in workflow order and every order
//! as a card. A drag between columns posts a move; a drop back onto the
//! source column is a no-op and issues no update at all. Any status may be
//! dragged to any other: the column order is a display convention, not a
//! transition constraint.
//!
//! Board sync is push-based: `/admin/board/events` streams change
//! notifications as SSE and clients refetch the full list on each one.

use std::convert::Infallible;

use axum::{
    Extension, Json,
    extract::State,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use dora_patisserie_core::{OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::models::{Identity, Order, OrderUpdate};
use crate::state::AppState;

/// Board page data: the full order list plus the column order.
#[derive(Debug, Serialize)]
pub struct BoardView {
    pub columns: &'static [OrderStatus],
    pub orders: Vec<Order>,
}

/// A drag-and-drop move. `from` is the column the card left, `to` the one
/// it landed on.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// The status write a move implies, if any. A drop back onto the source
/// column means nothing changed, so nothing is written.
#[must_use]
pub fn plan_move(from: OrderStatus, to: OrderStatus) -> Option<OrderStatus> {
    (from != to).then_some(to)
}

/// Serve the board data.
pub async fn page(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list()
        .await
        .map_err(|e| AppError::from_repo("Failed to fetch orders", "Order", e))?;

    Ok(Json(BoardView {
        columns: &OrderStatus::COLUMNS,
        orders,
    }))
}

/// Apply a drag-and-drop move. The acting identity is stashed in the
/// request extensions by the access gate on admin paths.
pub async fn move_card(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<MoveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Some(to) = plan_move(body.from, body.to) else {
        return Ok(Json(json!({ "moved": false })));
    };

    let update = OrderUpdate {
        status: Some(to),
        ..OrderUpdate::default()
    };
    let order = OrderRepository::new(state.pool())
        .update(body.order_id, update)
        .await
        .map_err(|e| AppError::from_repo("Failed to update order", "Order", e))?;

    tracing::info!(
        order_id = %order.id,
        from = %body.from,
        to = %to,
        moved_by = ?identity.user_id(),
        "order moved"
    );
    Ok(Json(json!({ "moved": true, "order": order })))
}

/// Stream order-change notifications as SSE.
///
/// Events carry only the operation name; clients refetch the list on any
/// event. A lagged subscriber gets a synthetic event instead of an error,
/// which triggers the same refetch and loses nothing.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut rx = state.changes().subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(change) => {
                    yield Ok(Event::default().event("orders_changed").data(change.op));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "board event subscriber lagged");
                    yield Ok(Event::default().event("orders_changed").data("LAGGED"));
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_on_source_column_issues_no_update() {
        assert_eq!(plan_move(OrderStatus::Pending, OrderStatus::Pending), None);
        assert_eq!(
            plan_move(OrderStatus::Delivered, OrderStatus::Delivered),
            None
        );
    }

    #[test]
    fn any_column_pair_is_a_legal_move() {
        // Forward, backward, and out of a terminal column all write.
        assert_eq!(
            plan_move(OrderStatus::Pending, OrderStatus::Ready),
            Some(OrderStatus::Ready)
        );
        assert_eq!(
            plan_move(OrderStatus::Ready, OrderStatus::Pending),
            Some(OrderStatus::Pending)
        );
        assert_eq!(
            plan_move(OrderStatus::Cancelled, OrderStatus::Confirmed),
            Some(OrderStatus::Confirmed)
        );
    }
}
