//! Shopping cart aggregate.
//!
//! The cart holds at most one line per product id. Adding an id that is
//! already present increments its quantity and deliberately ignores the
//! incoming snapshot, so the name and price a customer saw when they first
//! added the item stay frozen for the rest of the session. Totals are
//! recomputed from the lines on every call; there is no cached field to go
//! stale.

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// One line in the cart: a product snapshot plus a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Name snapshot taken when the line was created.
    pub name: String,
    /// Price snapshot taken when the line was created.
    pub price: Money,
    /// Line quantity, always at least 1 while the line exists.
    pub quantity: u32,
    /// Dimensions snapshot for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    /// Guest capacity snapshot for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
    /// Image snapshot for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartItem {
    /// Price times quantity for this line.
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// The shopper's in-progress selection.
///
/// Owned by a single session; there is no concurrent-writer resolution here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in insertion order.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a product snapshot to the cart.
    ///
    /// If a line with the same product id exists, its quantity is
    /// incremented by 1 and the incoming snapshot is ignored - the price a
    /// customer first saw does not drift while the item sits in the cart.
    /// Otherwise the snapshot becomes a new line with quantity 1.
    pub fn add_item(&mut self, snapshot: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == snapshot.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem {
                quantity: 1,
                ..snapshot
            });
        }
    }

    /// Set a line's quantity directly.
    ///
    /// A quantity of zero or less removes the line entirely. Unknown ids
    /// are a no-op.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove a line by product id. No-op if absent.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product_id != product_id);
    }

    /// Empty the cart. Called after a successful checkout.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price times quantity over all lines, recomputed fresh.
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all lines, recomputed fresh.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(id: i64, price: i64) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("Capsule {id}"),
            price: Money::new(price),
            quantity: 1,
            dimensions: None,
            guests: None,
            image: None,
        }
    }

    #[test]
    fn test_add_is_idempotent_on_identity() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add_item(snapshot(1, 1_000));
        }

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().unwrap().quantity, 3);
    }

    #[test]
    fn test_add_ignores_newer_snapshot() {
        let mut cart = Cart::new();
        cart.add_item(snapshot(1, 1_000));

        let mut repriced = snapshot(1, 9_999);
        repriced.name = "Renamed".to_owned();
        cart.add_item(repriced);

        let line = cart.items.first().unwrap();
        assert_eq!(line.price, Money::new(1_000));
        assert_eq!(line.name, "Capsule 1");
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_update_quantity_sets_directly() {
        let mut cart = Cart::new();
        cart.add_item(snapshot(1, 1_000));
        cart.update_quantity(ProductId::new(1), 7);
        assert_eq!(cart.items.first().unwrap().quantity, 7);
    }

    #[test]
    fn test_zero_and_negative_quantity_remove() {
        let mut cart = Cart::new();
        cart.add_item(snapshot(1, 1_000));
        cart.update_quantity(ProductId::new(1), 0);
        assert!(cart.is_empty());

        cart.add_item(snapshot(2, 500));
        cart.update_quantity(ProductId::new(2), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(snapshot(1, 1_000));
        cart.update_quantity(ProductId::new(99), 5);
        cart.remove_item(ProductId::new(99));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().unwrap().quantity, 1);
    }

    #[test]
    fn test_totals_recomputed_after_every_mutation() {
        let mut cart = Cart::new();
        cart.add_item(snapshot(1, 1_000));
        cart.add_item(snapshot(1, 1_000));
        cart.add_item(snapshot(2, 500));
        assert_eq!(cart.total_price(), Money::new(2_500));
        assert_eq!(cart.total_quantity(), 3);

        cart.update_quantity(ProductId::new(1), 1);
        assert_eq!(cart.total_price(), Money::new(1_500));
        assert_eq!(cart.total_quantity(), 2);

        cart.remove_item(ProductId::new(2));
        assert_eq!(cart.total_price(), Money::new(1_000));
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(snapshot(1, 1_000));
        cart.add_item(snapshot(2, 500));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Money::ZERO);
    }
}
