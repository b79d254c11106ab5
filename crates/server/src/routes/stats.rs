//! Dashboard statistics.
//!
//! One aggregate snapshot over orders and the catalog. This endpoint never
//! fails: when the gateway errors, it degrades to the all-zero body with
//! HTTP 200, because the dashboard renders something either way and the
//! failure is already in the log.

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use dora_patisserie_core::OrderStatus;

use crate::db::orders::OrderStatsRow;
use crate::db::{OrderRepository, ProductRepository};
use crate::state::AppState;

/// The dashboard snapshot. Field names are the dashboard's wire contract.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub today_orders: usize,
    pub total_products: usize,
    pub total_revenue: Decimal,
}

/// Serve the dashboard snapshot, degrading to zeros on gateway failure.
pub async fn get(State(state): State<AppState>) -> impl IntoResponse {
    let pool = state.pool();
    let today = Utc::now().date_naive();

    let rows = OrderRepository::new(pool).stats_rows().await;
    let product_count = ProductRepository::new(pool).count().await;

    match (rows, product_count) {
        (Ok(rows), Ok(product_count)) => {
            let product_count = usize::try_from(product_count).unwrap_or(0);
            Json(compute(&rows, product_count, today))
        }
        (rows, product_count) => {
            if let Err(e) = &rows {
                tracing::error!(error = %e, "stats: order aggregation failed");
            }
            if let Err(e) = &product_count {
                tracing::error!(error = %e, "stats: product count failed");
            }
            Json(Stats::default())
        }
    }
}

/// Fold the order rows into the snapshot. "Pending" counts both pending and
/// confirmed orders: the dashboard number means "not yet in the kitchen".
/// Revenue sums every order regardless of status.
fn compute(rows: &[OrderStatsRow], total_products: usize, today: NaiveDate) -> Stats {
    Stats {
        total_orders: rows.len(),
        pending_orders: rows
            .iter()
            .filter(|r| matches!(r.status, OrderStatus::Pending | OrderStatus::Confirmed))
            .count(),
        today_orders: rows.iter().filter(|r| r.delivery_date == today).count(),
        total_products,
        total_revenue: rows.iter().map(|r| r.total).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: OrderStatus, delivery_date: &str, total: &str) -> OrderStatsRow {
        OrderStatsRow {
            status,
            delivery_date: delivery_date.parse().expect("valid date"),
            total: total.parse().expect("valid decimal"),
        }
    }

    #[test]
    fn pending_counts_pending_and_confirmed() {
        let today = "2026-03-14".parse().expect("valid date");
        let rows = [
            row(OrderStatus::Pending, "2026-03-15", "10.00"),
            row(OrderStatus::Confirmed, "2026-03-15", "20.00"),
            row(OrderStatus::InProgress, "2026-03-15", "30.00"),
            row(OrderStatus::Delivered, "2026-03-10", "40.00"),
        ];

        let stats = compute(&rows, 7, today);
        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.total_products, 7);
    }

    #[test]
    fn today_counts_delivery_date_not_creation_date() {
        let today = "2026-03-14".parse().expect("valid date");
        let rows = [
            row(OrderStatus::Pending, "2026-03-14", "10.00"),
            row(OrderStatus::Ready, "2026-03-14", "15.00"),
            row(OrderStatus::Pending, "2026-03-15", "20.00"),
        ];

        assert_eq!(compute(&rows, 0, today).today_orders, 2);
    }

    #[test]
    fn revenue_sums_all_orders_regardless_of_status() {
        let today = "2026-03-14".parse().expect("valid date");
        let rows = [
            row(OrderStatus::Cancelled, "2026-03-14", "10.00"),
            row(OrderStatus::Delivered, "2026-03-14", "25.50"),
        ];

        assert_eq!(
            compute(&rows, 0, today).total_revenue,
            Decimal::new(3550, 2)
        );
    }

    #[test]
    fn empty_input_yields_the_all_zero_body() {
        let today = "2026-03-14".parse().expect("valid date");
        assert_eq!(compute(&[], 0, today), Stats::default());

        let json = serde_json::to_value(Stats::default()).expect("serialize");
        assert_eq!(json["totalOrders"], 0);
        assert_eq!(json["pendingOrders"], 0);
        assert_eq!(json["todayOrders"], 0);
        assert_eq!(json["totalProducts"], 0);
    }
}
