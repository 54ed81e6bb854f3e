//! Cart store: one cart per storefront session.
//!
//! The cart id lives in the visitor's session cookie; this store maps it
//! to the cart contents. A single visitor is the only writer of their own
//! cart - the last write wins and no conflict resolution is attempted.

use std::collections::HashMap;
use std::sync::Arc;

use capsulehaus_core::cart::{Cart, CartItem};
use capsulehaus_core::{Money, ProductId};

use super::{Backend, Persisted, StoreError};

/// Persisted key.
const KEY: &str = "capsule-carts";

/// The session-keyed cart store.
pub struct CartStore {
    state: Persisted<HashMap<String, Cart>>,
}

impl CartStore {
    /// Open the store against a backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if loading fails.
    pub fn open(backend: Arc<dyn Backend>) -> Result<Self, StoreError> {
        Ok(Self {
            state: Persisted::open(KEY, backend)?,
        })
    }

    /// The cart for a session, empty if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn get(&self, cart_id: &str) -> Result<Cart, StoreError> {
        self.state
            .read(|carts| carts.get(cart_id).cloned().unwrap_or_default())
    }

    /// Add a product snapshot to a session's cart (merge-by-id).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn add_item(&self, cart_id: &str, snapshot: CartItem) -> Result<Cart, StoreError> {
        self.state.mutate(|carts| {
            let cart = carts.entry(cart_id.to_owned()).or_default();
            cart.add_item(snapshot);
            cart.clone()
        })
    }

    /// Set a line's quantity; zero or negative removes the line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn update_quantity(
        &self,
        cart_id: &str,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Cart, StoreError> {
        self.state.mutate(|carts| {
            let cart = carts.entry(cart_id.to_owned()).or_default();
            cart.update_quantity(product_id, quantity);
            cart.clone()
        })
    }

    /// Remove a line by product id. No-op when absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn remove_item(&self, cart_id: &str, product_id: ProductId) -> Result<Cart, StoreError> {
        self.state.mutate(|carts| {
            let cart = carts.entry(cart_id.to_owned()).or_default();
            cart.remove_item(product_id);
            cart.clone()
        })
    }

    /// Empty a session's cart and drop its entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn clear(&self, cart_id: &str) -> Result<(), StoreError> {
        self.state.mutate(|carts| {
            carts.remove(cart_id);
        })
    }

    /// Total price of a session's cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn total_price(&self, cart_id: &str) -> Result<Money, StoreError> {
        self.state.read(|carts| {
            carts
                .get(cart_id)
                .map_or(Money::ZERO, Cart::total_price)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::JsonFileBackend;

    fn open_store(dir: &std::path::Path) -> CartStore {
        let backend: Arc<dyn Backend> = Arc::new(JsonFileBackend::open(dir).unwrap());
        CartStore::open(backend).unwrap()
    }

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
    fn test_sessions_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());

        store.add_item("cart_a", snapshot(1, 1_000)).unwrap();
        store.add_item("cart_b", snapshot(2, 500)).unwrap();

        assert_eq!(store.get("cart_a").unwrap().total_quantity(), 1);
        assert_eq!(store.get("cart_b").unwrap().total_quantity(), 1);
        assert_eq!(store.total_price("cart_a").unwrap(), Money::new(1_000));
    }

    #[test]
    fn test_clear_drops_entry_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open_store(dir.path());
            store.add_item("cart_a", snapshot(1, 1_000)).unwrap();
            store.clear("cart_a").unwrap();
        }
        let store = open_store(dir.path());
        assert!(store.get("cart_a").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_cart_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        assert!(store.get("nope").unwrap().is_empty());
        assert_eq!(store.total_price("nope").unwrap(), Money::ZERO);
    }
}
