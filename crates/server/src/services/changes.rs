//! Order-change notification fanout.
//!
//! A database trigger raises `pg_notify('orders_changed', <op>)` on every
//! insert, update, or delete against the orders table. A background task
//! holds a `LISTEN` connection and republishes each notification onto a
//! broadcast channel; the admin board's SSE endpoint subscribes to that
//! channel.
//!
//! Events carry only the operation name, not the changed row. Subscribers
//! are expected to refetch the full order list on any event: coarse
//! invalidation trades bandwidth for immunity to missed-update bugs, and a
//! full refetch is idempotent.

use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::broadcast;

/// The `LISTEN`/`NOTIFY` channel the orders trigger publishes on.
pub const ORDERS_CHANNEL: &str = "orders_changed";

/// Broadcast capacity. Subscribers that lag past this many events receive a
/// `Lagged` error and should treat it as "refetch now", which is what they
/// do on every event anyway.
const FANOUT_CAPACITY: usize = 64;

/// One change notification. `op` is the trigger's operation name
/// (`INSERT`/`UPDATE`/`DELETE`).
#[derive(Debug, Clone, Serialize)]
pub struct OrderChange {
    pub op: String,
}

/// Create the fanout channel.
#[must_use]
pub fn fanout() -> broadcast::Sender<OrderChange> {
    broadcast::channel(FANOUT_CAPACITY).0
}

/// Listen for order-change notifications and republish them.
///
/// Runs until the process shuts down. `PgListener::recv` re-establishes its
/// connection after a drop, so transient database outages degrade to a gap
/// in notifications rather than a dead feed; a gap is harmless because
/// subscribers refetch on every event.
pub async fn listen(pool: PgPool, tx: broadcast::Sender<OrderChange>) {
    loop {
        let mut listener = match PgListener::connect_with(&pool).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::warn!(error = %e, "order-change listener failed to connect, retrying");
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                continue;
            }
        };

        if let Err(e) = listener.listen(ORDERS_CHANNEL).await {
            tracing::warn!(error = %e, "LISTEN {ORDERS_CHANNEL} failed, retrying");
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            continue;
        }

        tracing::info!("order-change listener up on {ORDERS_CHANNEL}");

        loop {
            match listener.recv().await {
                Ok(notification) => {
                    let change = OrderChange {
                        op: notification.payload().to_owned(),
                    };
                    // Send fails only when no subscriber is connected,
                    // which is fine - the board may simply be closed.
                    let _ = tx.send(change);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "order-change listener dropped, reconnecting");
                    break;
                }
            }
        }
    }
}
