//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::broadcast;

use crate::config::ServerConfig;
use crate::services::changes::OrderChange;

/// Application state shared across all handlers.
///
/// Cheap to clone; the inner data lives behind an `Arc`. Constructed once
/// at startup and injected everywhere a gateway handle is needed - there is
/// no process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    changes: broadcast::Sender<OrderChange>,
}

impl AppState {
    /// Build the application state.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        pool: PgPool,
        changes: broadcast::Sender<OrderChange>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                changes,
            }),
        }
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// The database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The order-change fanout feeding the admin board.
    #[must_use]
    pub fn changes(&self) -> &broadcast::Sender<OrderChange> {
        &self.inner.changes
    }
}
