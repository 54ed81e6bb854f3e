//! Order ledger and lifecycle.
//!
//! Orders are created from a checkout snapshot, keep most-recent-first
//! order in the ledger, and move through the [`OrderStatus`] state machine.
//! Line items are copies of the cart lines, never live references to
//! products, so later catalog edits can not rewrite order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, Money, OrderId, OrderStatus, Phone, ProductId};

/// One line of an order: a frozen copy of a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product the line was created from.
    pub product_id: ProductId,
    /// Name at checkout time.
    pub name: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Price at checkout time, per unit.
    pub price: Money,
}

impl OrderItem {
    /// Price times quantity for this line.
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Creation-timestamp-derived identifier.
    pub id: OrderId,
    /// Human-facing sequential number, zero-padded.
    pub order_number: String,
    /// Customer display name.
    pub customer_name: String,
    /// Customer contact phone.
    pub customer_phone: Phone,
    /// Customer email, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<Email>,
    /// Frozen line items.
    pub items: Vec<OrderItem>,
    /// Order total in whole rubles.
    pub total: Money,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Delivery address, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    /// Free-form customer notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Reason recorded when the order was cancelled.
    ///
    /// Present only while `status` is [`OrderStatus::Cancelled`]; any other
    /// status clears it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

/// Everything the checkout flow knows about an order before it exists.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Customer display name.
    pub customer_name: String,
    /// Customer contact phone.
    pub customer_phone: Phone,
    /// Customer email, when provided.
    pub customer_email: Option<Email>,
    /// Cart lines to freeze into the order.
    pub items: Vec<OrderItem>,
    /// Caller-supplied order number; generated from the ledger count when
    /// absent.
    pub order_number: Option<String>,
    /// Delivery address, when provided.
    pub delivery_address: Option<String>,
    /// Free-form customer notes.
    pub notes: Option<String>,
}

/// The order list, most recent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderLedger {
    orders: Vec<Order>,
}

impl OrderLedger {
    /// Create an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self { orders: Vec::new() }
    }

    /// All orders, most recent first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Look up an order by id.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// Create an order from a draft.
    ///
    /// The id derives from `now` (millisecond precision - unique in
    /// practice within a session), the order number falls back to a
    /// zero-padded sequence over the current count, the status starts at
    /// [`OrderStatus::New`], the total is the sum of the frozen lines, and
    /// the order is prepended so the ledger stays most-recent-first.
    pub fn create(&mut self, draft: OrderDraft, now: DateTime<Utc>) -> Order {
        let order_number = draft
            .order_number
            .unwrap_or_else(|| format!("{:04}", self.orders.len() + 1));
        let total = draft.items.iter().map(OrderItem::line_total).sum();

        let order = Order {
            id: OrderId::from_timestamp(now),
            order_number,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            customer_email: draft.customer_email,
            items: draft.items,
            total,
            status: OrderStatus::New,
            created_at: now,
            delivery_address: draft.delivery_address,
            notes: draft.notes,
            cancellation_reason: None,
        };

        self.orders.insert(0, order.clone());
        order
    }

    /// Rewrite an order's status.
    ///
    /// A transition to [`OrderStatus::Cancelled`] records `reason` as the
    /// cancellation reason; a transition to any other status clears it.
    /// Unknown ids are a no-op and return `None`. Transitions out of
    /// terminal states are permitted silently - the restriction lives in
    /// the back-office UI, not here.
    pub fn update_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
        reason: Option<String>,
    ) -> Option<&Order> {
        let order = self.orders.iter_mut().find(|order| order.id == id)?;
        order.status = status;
        order.cancellation_reason = if status == OrderStatus::Cancelled {
            reason
        } else {
            None
        };
        Some(order)
    }

    /// Irreversibly remove an order. No-op if absent.
    pub fn delete(&mut self, id: OrderId) {
        self.orders.retain(|order| order.id != id);
    }

    /// Orders currently in the given status, most recent first.
    #[must_use]
    pub fn by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.status == status)
            .collect()
    }

    /// Sum of totals over all orders except cancelled ones.
    #[must_use]
    pub fn total_revenue(&self) -> Money {
        self.orders
            .iter()
            .filter(|order| order.status != OrderStatus::Cancelled)
            .map(|order| order.total)
            .sum()
    }

    /// Number of orders in the ledger. Cancelled orders count; the
    /// asymmetry with [`total_revenue`](Self::total_revenue) is intentional.
    #[must_use]
    pub fn count(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()
    }

    fn draft(name: &str, items: Vec<OrderItem>) -> OrderDraft {
        OrderDraft {
            customer_name: name.to_owned(),
            customer_phone: Phone::parse("+7 999 123-45-67").unwrap(),
            customer_email: Some(Email::parse("ivan@example.com").unwrap()),
            items,
            order_number: None,
            delivery_address: None,
            notes: None,
        }
    }

    fn item(id: i64, price: i64, quantity: u32) -> OrderItem {
        OrderItem {
            product_id: ProductId::new(id),
            name: format!("Capsule {id}"),
            quantity,
            price: Money::new(price),
        }
    }

    #[test]
    fn test_create_assigns_defaults() {
        let mut ledger = OrderLedger::new();
        let now = at(0);
        let order = ledger.create(draft("Ivan", vec![item(1, 1_000, 2), item(2, 500, 1)]), now);

        assert_eq!(order.id, OrderId::from_timestamp(now));
        assert_eq!(order.order_number, "0001");
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.total, Money::new(2_500));
        assert_eq!(order.created_at, now);
        assert!(order.cancellation_reason.is_none());
    }

    #[test]
    fn test_ledger_is_most_recent_first() {
        let mut ledger = OrderLedger::new();
        ledger.create(draft("First", vec![item(1, 100, 1)]), at(0));
        ledger.create(draft("Second", vec![item(1, 100, 1)]), at(10));

        let names: Vec<&str> = ledger
            .orders()
            .iter()
            .map(|o| o.customer_name.as_str())
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(ledger.orders().first().unwrap().order_number, "0002");
    }

    #[test]
    fn test_caller_supplied_order_number_wins() {
        let mut ledger = OrderLedger::new();
        let mut d = draft("Ivan", vec![item(1, 100, 1)]);
        d.order_number = Some("A-777".to_owned());
        let order = ledger.create(d, at(0));
        assert_eq!(order.order_number, "A-777");
    }

    #[test]
    fn test_cancellation_reason_set_and_cleared() {
        let mut ledger = OrderLedger::new();
        let id = ledger.create(draft("Ivan", vec![item(1, 100, 1)]), at(0)).id;

        ledger.update_status(id, OrderStatus::Cancelled, Some("out of stock".to_owned()));
        assert_eq!(
            ledger.get(id).unwrap().cancellation_reason.as_deref(),
            Some("out of stock")
        );

        ledger.update_status(id, OrderStatus::Processing, None);
        let order = ledger.get(id).unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        assert!(order.cancellation_reason.is_none());
    }

    #[test]
    fn test_reason_ignored_for_non_cancelled() {
        let mut ledger = OrderLedger::new();
        let id = ledger.create(draft("Ivan", vec![item(1, 100, 1)]), at(0)).id;

        ledger.update_status(id, OrderStatus::Shipped, Some("whoops".to_owned()));
        assert!(ledger.get(id).unwrap().cancellation_reason.is_none());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut ledger = OrderLedger::new();
        ledger.create(draft("Ivan", vec![item(1, 100, 1)]), at(0));
        assert!(
            ledger
                .update_status(OrderId::new(42), OrderStatus::Shipped, None)
                .is_none()
        );
        assert_eq!(ledger.orders().first().unwrap().status, OrderStatus::New);
    }

    #[test]
    fn test_revenue_excludes_cancelled_count_includes() {
        let mut ledger = OrderLedger::new();
        ledger.create(draft("A", vec![item(1, 100, 1)]), at(0));
        ledger.create(draft("B", vec![item(1, 200, 1)]), at(1));
        let cancelled = ledger.create(draft("C", vec![item(1, 300, 1)]), at(2)).id;
        ledger.update_status(cancelled, OrderStatus::Cancelled, None);

        assert_eq!(ledger.total_revenue(), Money::new(300));
        assert_eq!(ledger.count(), 3);
    }

    #[test]
    fn test_delete_is_irreversible_and_noop_when_absent() {
        let mut ledger = OrderLedger::new();
        let id = ledger.create(draft("Ivan", vec![item(1, 100, 1)]), at(0)).id;
        ledger.delete(id);
        assert_eq!(ledger.count(), 0);
        ledger.delete(id);
        assert_eq!(ledger.count(), 0);
    }

    #[test]
    fn test_by_status() {
        let mut ledger = OrderLedger::new();
        let a = ledger.create(draft("A", vec![item(1, 100, 1)]), at(0)).id;
        ledger.create(draft("B", vec![item(1, 100, 1)]), at(1));
        ledger.update_status(a, OrderStatus::Shipped, None);

        let shipped = ledger.by_status(OrderStatus::Shipped);
        assert_eq!(shipped.len(), 1);
        assert_eq!(shipped.first().unwrap().customer_name, "A");
        assert_eq!(ledger.by_status(OrderStatus::New).len(), 1);
    }

    #[test]
    fn test_item_snapshots_are_frozen_copies() {
        let mut ledger = OrderLedger::new();
        let items = vec![item(1, 1_000, 2)];
        let id = ledger.create(draft("Ivan", items), at(0)).id;

        // Nothing references the catalog: the stored line keeps checkout
        // values no matter what happens to the product afterwards.
        let stored = ledger.get(id).unwrap().items.first().unwrap().clone();
        assert_eq!(stored.price, Money::new(1_000));
        assert_eq!(stored.name, "Capsule 1");
    }
}
