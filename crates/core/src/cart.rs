//! The cart aggregate.
//!
//! A cart is an ordered collection of product snapshots with quantities,
//! keyed by product id. The server keeps one per session under a fixed key;
//! this module holds only the pure value logic so it can be exercised
//! without a session store.
//!
//! Prices inside the cart are snapshots taken when the product was added.
//! They are deliberately not reconciled against the live catalog until
//! checkout, which builds the order from these same snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// The product fields a cart line captures at add time.
///
/// Survives later catalog edits and deletions, mirroring the denormalized
/// `product_name`/`unit_price` columns on order items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}

/// One cart entry: a product snapshot plus quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal: snapshot price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// An ordered, product-id-keyed cart.
///
/// Invariant: no two lines share a product id. Insertion order is display
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a product, merging into an existing line if the product is
    /// already in the cart.
    pub fn add(&mut self, product: ProductSnapshot, quantity: u32) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine { product, quantity });
        }
    }

    /// Remove a product's line entirely. Unknown ids are ignored.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    /// Overwrite a line's quantity. A quantity of zero removes the line.
    /// Unknown ids are ignored.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
        } else if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn snapshot(name: &str, price: &str) -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::generate(),
            name: name.to_owned(),
            price: price.parse().expect("valid decimal"),
            image_url: None,
        }
    }

    #[test]
    fn adding_same_product_twice_merges_quantities() {
        let mut cart = Cart::new();
        let brigadeiro = snapshot("Brigadeiro", "2.50");

        cart.add(brigadeiro.clone(), 2);
        cart.add(brigadeiro, 3);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn setting_quantity_to_zero_removes_the_line() {
        let mut cart = Cart::new();
        let bolo = snapshot("Bolo de Cenoura", "35.00");
        let id = bolo.id;

        cart.add(bolo, 1);
        cart.set_quantity(id, 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_overwrites_rather_than_adds() {
        let mut cart = Cart::new();
        let torta = snapshot("Torta de Limão", "48.00");
        let id = torta.id;

        cart.add(torta, 2);
        cart.set_quantity(id, 7);

        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn total_and_item_count_sum_over_lines() {
        let mut cart = Cart::new();
        cart.add(snapshot("Croissant", "10.00"), 2);
        cart.add(snapshot("Pão de Mel", "5.50"), 1);

        assert_eq!(cart.total(), Decimal::new(2550, 2));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut cart = Cart::new();
        cart.add(snapshot("A", "1.00"), 1);
        cart.add(snapshot("B", "1.00"), 1);
        cart.add(snapshot("C", "1.00"), 1);

        let names: Vec<_> = cart
            .lines()
            .iter()
            .map(|l| l.product.name.as_str())
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn remove_and_clear() {
        let mut cart = Cart::new();
        let quindim = snapshot("Quindim", "4.00");
        let id = quindim.id;
        cart.add(quindim, 2);
        cart.add(snapshot("Beijinho", "2.00"), 1);

        cart.remove(id);
        assert_eq!(cart.lines().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn survives_serde_round_trip() {
        let mut cart = Cart::new();
        cart.add(snapshot("Palha Italiana", "6.00"), 4);

        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
