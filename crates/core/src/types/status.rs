//! Order status state machine.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Orders are created as [`New`](Self::New) and move forward through
/// `Processing`, `Shipped`, and `Delivered`; `Cancelled` is reachable from
/// any active state. `Delivered` and `Cancelled` are terminal.
///
/// [`can_transition_to`](Self::can_transition_to) documents the intended
/// matrix. The order ledger does not enforce it: an admin rewriting a
/// terminal order is tolerated silently, matching the established
/// back-office behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Just created, not yet acknowledged by the back office.
    #[default]
    New,
    /// Acknowledged and being prepared.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer. Terminal.
    Delivered,
    /// Cancelled with an optional reason. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are expected out of this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The intended transition matrix: one step forward along the
    /// fulfilment chain, or cancellation from any active state.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match (self, next) {
            (Self::New, Self::Processing | Self::Cancelled)
            | (Self::Processing, Self::Shipped | Self::Cancelled)
            | (Self::Shipped, Self::Delivered | Self::Cancelled) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
