//! Order and order-item types.
//!
//! `total` is always derived server-side from the item set; a client-supplied
//! total is never trusted. Item `product_name`/`unit_price` are snapshots
//! taken at order time and intentionally do not track later catalog changes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dora_patisserie_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// An order row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub total: Decimal,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order line-item row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// An order together with its full item set.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Input line item. `subtotal` is computed here, never accepted from the
/// client.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl NewOrderItem {
    /// Line subtotal: `quantity × unit_price`, exact decimal arithmetic.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Fields for placing an order. The owning identity is resolved server-side
/// by the handler and is not part of the request body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_date: NaiveDate,
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
}

/// Sparse order update: only supplied fields are written. Supplying `items`
/// replaces the full item set and recomputes `total`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_date: Option<NaiveDate>,
    pub status: Option<OrderStatus>,
    pub notes: Option<String>,
    pub items: Option<Vec<NewOrderItem>>,
}

/// Largest quantity the `order_items.quantity` integer column can hold.
pub const MAX_ITEM_QUANTITY: u32 = 2_147_483_647;

/// Validate an item set and compute the order total from it.
///
/// `require_non_empty` holds for order creation; an update may legitimately
/// replace the item set with an empty one (total becomes zero).
///
/// # Errors
///
/// Returns a human-readable message when the set is empty but required, or
/// when any quantity is zero or exceeds [`MAX_ITEM_QUANTITY`].
pub fn validate_and_total(
    items: &[NewOrderItem],
    require_non_empty: bool,
) -> Result<Decimal, String> {
    if require_non_empty && items.is_empty() {
        return Err("order must contain at least one item".to_owned());
    }
    if items.iter().any(|item| item.quantity == 0) {
        return Err("item quantity must be positive".to_owned());
    }
    if items.iter().any(|item| item.quantity > MAX_ITEM_QUANTITY) {
        return Err(format!("item quantity must not exceed {MAX_ITEM_QUANTITY}"));
    }
    Ok(items.iter().map(NewOrderItem::subtotal).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_price: &str, quantity: u32) -> NewOrderItem {
        NewOrderItem {
            product_id: ProductId::generate(),
            product_name: "Bolo de Chocolate".to_owned(),
            quantity,
            unit_price: unit_price.parse().expect("valid decimal"),
        }
    }

    #[test]
    fn total_is_the_sum_of_item_subtotals() {
        // 10.00 × 2 + 5.50 × 1 = 25.50
        let items = [item("10.00", 2), item("5.50", 1)];
        let total = validate_and_total(&items, true).expect("valid items");
        assert_eq!(total, Decimal::new(2550, 2));
    }

    #[test]
    fn subtotal_is_exactly_quantity_times_unit_price() {
        let line = item("3.33", 3);
        assert_eq!(line.subtotal(), Decimal::new(999, 2));
    }

    #[test]
    fn empty_items_rejected_on_create() {
        assert!(validate_and_total(&[], true).is_err());
    }

    #[test]
    fn empty_items_allowed_on_replace() {
        assert_eq!(validate_and_total(&[], false), Ok(Decimal::ZERO));
    }

    #[test]
    fn status_only_update_carries_no_item_replacement() {
        // A PATCH like {"status": "ready"} must leave items and total alone:
        // no items field means no replacement and no recompute.
        let update: OrderUpdate =
            serde_json::from_str(r#"{"status": "ready"}"#).expect("deserialize");
        assert_eq!(update.status, Some(OrderStatus::Ready));
        assert!(update.items.is_none());
        assert!(update.customer_name.is_none());
    }

    #[test]
    fn zero_quantity_rejected() {
        let items = [item("10.00", 0)];
        assert!(validate_and_total(&items, true).is_err());
        assert!(validate_and_total(&items, false).is_err());
    }

    #[test]
    fn quantity_beyond_column_range_rejected() {
        // The quantity column is a Postgres integer; anything wider must be
        // refused here rather than silently capped at insert time.
        let items = [item("10.00", MAX_ITEM_QUANTITY + 1)];
        assert!(validate_and_total(&items, true).is_err());
        assert!(validate_and_total(&items, false).is_err());

        let at_limit = [item("10.00", MAX_ITEM_QUANTITY)];
        assert!(validate_and_total(&at_limit, true).is_ok());
    }
}
