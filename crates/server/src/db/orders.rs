//! Order repository: CRUD over orders and their line items.
//!
//! All multi-row writes (create, item replacement, delete) run inside a
//! transaction, so an order can never be observed with a half-written item
//! set and `total` can never drift from the items it was computed from.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use chrono::NaiveDate;
use dora_patisserie_core::{OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::order::validate_and_total;
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem, OrderUpdate, OrderWithItems};

/// The order columns the stats endpoint aggregates over.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderStatsRow {
    pub status: OrderStatus,
    pub delivery_date: NaiveDate,
    pub total: Decimal,
}

const LIST_SQL: &str = "SELECT * FROM orders ORDER BY delivery_date ASC, created_at DESC";
const LIST_FOR_USER_SQL: &str =
    "SELECT * FROM orders WHERE user_id = $1 ORDER BY delivery_date ASC, created_at DESC";

/// Repository for orders and their items.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders in dispatch-queue order: earliest deliveries first,
    /// and within the same delivery day, newest requests first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(LIST_SQL)
            .fetch_all(self.pool)
            .await?;

        Ok(orders)
    }

    /// List one identity's orders, same ordering as [`Self::list`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(LIST_FOR_USER_SQL)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(orders)
    }

    /// Fetch the aggregation rows for the stats endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats_rows(&self) -> Result<Vec<OrderStatsRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderStatsRow>(
            "SELECT status, delivery_date, total FROM orders",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Fetch one order together with its full item set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order id does not exist.
    pub async fn get_with_items(&self, id: OrderId) -> Result<OrderWithItems, RepositoryError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(OrderWithItems { order, items })
    }

    /// Create an order with its items in one transaction.
    ///
    /// `total` and each item `subtotal` are computed here from the supplied
    /// quantities and unit-price snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` when the item list is empty or
    /// any quantity is out of range, `RepositoryError::Database` if a write
    /// fails.
    pub async fn create(
        &self,
        new: NewOrder,
        user_id: Option<UserId>,
    ) -> Result<Order, RepositoryError> {
        let total = validate_and_total(&new.items, true).map_err(RepositoryError::Validation)?;

        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (customer_name, customer_phone, customer_email,
                                 delivery_address, delivery_date, notes, total, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(&new.customer_name)
        .bind(&new.customer_phone)
        .bind(&new.customer_email)
        .bind(&new.delivery_address)
        .bind(new.delivery_date)
        .bind(&new.notes)
        .bind(total)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_items(&mut tx, order.id, &new.items).await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Apply a sparse update. Only supplied fields are written; supplying
    /// `items` replaces the full item set and recomputes `total` in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order id does not exist,
    /// `RepositoryError::Validation` for an out-of-range item quantity.
    pub async fn update(
        &self,
        id: OrderId,
        update: OrderUpdate,
    ) -> Result<Order, RepositoryError> {
        // An update may clear the item set, so emptiness is allowed here.
        let new_total = update
            .items
            .as_deref()
            .map(|items| validate_and_total(items, false))
            .transpose()
            .map_err(RepositoryError::Validation)?;

        let mut tx = self.pool.begin().await?;

        let mut builder = sqlx::QueryBuilder::new("UPDATE orders SET updated_at = NOW()");
        if let Some(customer_name) = &update.customer_name {
            builder.push(", customer_name = ").push_bind(customer_name);
        }
        if let Some(customer_phone) = &update.customer_phone {
            builder.push(", customer_phone = ").push_bind(customer_phone);
        }
        if let Some(customer_email) = &update.customer_email {
            builder.push(", customer_email = ").push_bind(customer_email);
        }
        if let Some(delivery_address) = &update.delivery_address {
            builder
                .push(", delivery_address = ")
                .push_bind(delivery_address);
        }
        if let Some(delivery_date) = update.delivery_date {
            builder.push(", delivery_date = ").push_bind(delivery_date);
        }
        if let Some(status) = update.status {
            builder.push(", status = ").push_bind(status);
        }
        if let Some(notes) = &update.notes {
            builder.push(", notes = ").push_bind(notes);
        }
        if let Some(total) = new_total {
            builder.push(", total = ").push_bind(total);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING *");

        let order = builder
            .build_query_as::<Order>()
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        // Full replace-by-delete-then-insert, atomic inside the transaction.
        if let Some(items) = &update.items {
            sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            insert_items(&mut tx, id, items).await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    /// Delete an order. Items are removed explicitly in the same
    /// transaction rather than relying on the schema's cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order id does not exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Bulk-insert an item set for an order. Subtotals are computed here from
/// the quantity and the unit-price snapshot.
async fn insert_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: OrderId,
    items: &[NewOrderItem],
) -> Result<(), RepositoryError> {
    if items.is_empty() {
        return Ok(());
    }

    let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id.as_uuid()).collect();
    let product_names: Vec<String> = items.iter().map(|i| i.product_name.clone()).collect();
    // Quantities were range-checked by `validate_and_total` before any call
    // reaches this point, so the conversion cannot fail in practice.
    let quantities: Vec<i32> = items
        .iter()
        .map(|i| i32::try_from(i.quantity))
        .collect::<Result<_, _>>()
        .map_err(|_| RepositoryError::Validation("item quantity out of range".to_owned()))?;
    let unit_prices: Vec<Decimal> = items.iter().map(|i| i.unit_price).collect();
    let subtotals: Vec<Decimal> = items.iter().map(NewOrderItem::subtotal).collect();

    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, product_name, quantity, unit_price, subtotal)
         SELECT $1, unnest($2::uuid[]), unnest($3::text[]), unnest($4::int[]),
                unnest($5::numeric[]), unnest($6::numeric[])",
    )
    .bind(order_id)
    .bind(&product_ids)
    .bind(&product_names)
    .bind(&quantities)
    .bind(&unit_prices)
    .bind(&subtotals)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings_use_the_dispatch_queue_ordering() {
        // Both listings must page through the same queue: earliest delivery
        // day first, newest request first within a day.
        const DISPATCH_ORDER: &str = "ORDER BY delivery_date ASC, created_at DESC";
        assert!(LIST_SQL.ends_with(DISPATCH_ORDER));
        assert!(LIST_FOR_USER_SQL.ends_with(DISPATCH_ORDER));
    }
}
