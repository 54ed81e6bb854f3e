//! Order store: wraps the core ledger with persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use capsulehaus_core::order::{Order, OrderDraft, OrderLedger};
use capsulehaus_core::{Money, OrderId, OrderStatus};

use super::{Backend, Persisted, StoreError};

/// Persisted key.
const KEY: &str = "capsule-orders";

/// Revenue and count summary for the back-office dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderStats {
    /// Sum of totals excluding cancelled orders.
    pub revenue: Money,
    /// Number of orders including cancelled ones.
    pub count: usize,
}

/// The order ledger store.
pub struct OrderStore {
    state: Persisted<OrderLedger>,
}

impl OrderStore {
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

    /// Snapshot of all orders, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.state.read(|ledger| ledger.orders().to_vec())
    }

    /// Orders in the given status, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn by_status(&self, status: OrderStatus) -> Result<Vec<Order>, StoreError> {
        self.state.read(|ledger| {
            ledger
                .by_status(status)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Look up an order by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.state.read(|ledger| ledger.get(id).cloned())
    }

    /// Create an order from a checkout draft.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn create(&self, draft: OrderDraft, now: DateTime<Utc>) -> Result<Order, StoreError> {
        self.state.mutate(|ledger| ledger.create(draft, now))
    }

    /// Rewrite an order's status, maintaining the cancellation-reason
    /// invariant. Returns the updated order, or `None` (a no-op) when the
    /// id is absent.
    ///
    /// The status change is committed here; any customer notification is
    /// the caller's best-effort follow-up and never rolls this back.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        reason: Option<String>,
    ) -> Result<Option<Order>, StoreError> {
        self.state
            .mutate(|ledger| ledger.update_status(id, status, reason).cloned())
    }

    /// Irreversibly delete an order. No-op when the id is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        self.state.mutate(|ledger| ledger.delete(id))
    }

    /// Revenue and count summary.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn stats(&self) -> Result<OrderStats, StoreError> {
        self.state.read(|ledger| OrderStats {
            revenue: ledger.total_revenue(),
            count: ledger.count(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::JsonFileBackend;
    use capsulehaus_core::order::OrderItem;
    use capsulehaus_core::{Phone, ProductId};
    use chrono::TimeZone;

    fn open_store(dir: &std::path::Path) -> OrderStore {
        let backend: Arc<dyn Backend> = Arc::new(JsonFileBackend::open(dir).unwrap());
        OrderStore::open(backend).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()
    }

    fn draft(total: i64) -> OrderDraft {
        OrderDraft {
            customer_name: "Ivan".to_owned(),
            customer_phone: Phone::parse("+79991234567").unwrap(),
            customer_email: None,
            items: vec![OrderItem {
                product_id: ProductId::new(1),
                name: "Capsule M2".to_owned(),
                quantity: 1,
                price: Money::new(total),
            }],
            order_number: None,
            delivery_address: None,
            notes: None,
        }
    }

    #[test]
    fn test_stats_asymmetry_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open_store(dir.path());
            store.create(draft(100), at(0)).unwrap();
            store.create(draft(200), at(1)).unwrap();
            let cancelled = store.create(draft(300), at(2)).unwrap().id;
            store
                .update_status(cancelled, OrderStatus::Cancelled, Some("test".to_owned()))
                .unwrap();
        }

        let store = open_store(dir.path());
        let stats = store.stats().unwrap();
        assert_eq!(stats.revenue, Money::new(300));
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_update_status_absent_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        let result = store
            .update_status(OrderId::new(404), OrderStatus::Shipped, None)
            .unwrap();
        assert!(result.is_none());
    }
}
