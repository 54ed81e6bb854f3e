//! Notification message templates.
//!
//! Plain-text subjects and bodies for every notification the gateway can
//! emit. Templates are pure functions so the route layer (and the admin
//! test-email tool, which mirrors them) can render without touching a
//! provider.

use std::fmt::Write as _;

use capsulehaus_core::order::Order;
use capsulehaus_core::OrderStatus;

/// A rendered message: subject plus plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

fn order_lines(order: &Order) -> String {
    let mut out = String::new();
    for item in &order.items {
        let _ = writeln!(
            out,
            "  - {} x{} ({} each)",
            item.name, item.quantity, item.price
        );
    }
    out
}

/// New-order notification for the admin inbox.
#[must_use]
pub fn new_order_admin(order: &Order) -> EmailMessage {
    let mut body = format!(
        "New order {number} from {name} ({phone}).\n\nItems:\n{items}\nTotal: {total}\n",
        number = order.order_number,
        name = order.customer_name,
        phone = order.customer_phone,
        items = order_lines(order),
        total = order.total,
    );
    if let Some(address) = &order.delivery_address {
        let _ = writeln!(body, "Delivery address: {address}");
    }
    if let Some(notes) = &order.notes {
        let _ = writeln!(body, "Notes: {notes}");
    }

    EmailMessage {
        subject: format!("New order {}", order.order_number),
        body,
    }
}

/// New-order confirmation for the customer.
#[must_use]
pub fn new_order_customer(order: &Order) -> EmailMessage {
    let body = format!(
        "Hello {name},\n\nThank you for your order {number}!\n\nItems:\n{items}\nTotal: {total}\n\nWe will contact you shortly to confirm delivery details.\n\nCapsuleHaus",
        name = order.customer_name,
        number = order.order_number,
        items = order_lines(order),
        total = order.total,
    );

    EmailMessage {
        subject: format!("Your CapsuleHaus order {}", order.order_number),
        body,
    }
}

/// New-order SMS for the admin phone.
#[must_use]
pub fn new_order_admin_sms(order: &Order) -> String {
    format!(
        "New order {} from {}: {}",
        order.order_number, order.customer_name, order.total
    )
}

/// New-order SMS for the customer phone.
#[must_use]
pub fn new_order_customer_sms(order: &Order) -> String {
    format!(
        "CapsuleHaus: order {} received, total {}. We will call you shortly.",
        order.order_number, order.total
    )
}

/// Status-change notification for the customer.
///
/// `tracking_number` is included for shipped orders when the carrier
/// provided one; `reason` only applies to cancellations.
#[must_use]
pub fn order_status_customer(
    order: &Order,
    status: OrderStatus,
    reason: Option<&str>,
    tracking_number: Option<&str>,
) -> EmailMessage {
    let mut body = format!(
        "Hello {name},\n\nYour order {number} is now: {status}.\n",
        name = order.customer_name,
        number = order.order_number,
        status = status_label(status),
    );
    if let Some(tracking) = tracking_number {
        let _ = writeln!(body, "Tracking number: {tracking}");
    }
    if status == OrderStatus::Cancelled {
        if let Some(reason) = reason {
            let _ = writeln!(body, "Reason: {reason}");
        }
    }
    body.push_str("\nCapsuleHaus");

    EmailMessage {
        subject: format!(
            "Order {} update: {}",
            order.order_number,
            status_label(status)
        ),
        body,
    }
}

/// Callback request for the admin inbox.
#[must_use]
pub fn callback_admin(name: &str, phone: &str) -> EmailMessage {
    EmailMessage {
        subject: "Callback request".to_string(),
        body: format!("{name} asked for a callback at {phone}."),
    }
}

/// Callback request SMS for the admin phone.
#[must_use]
pub fn callback_admin_sms(name: &str, phone: &str) -> String {
    format!("Callback request: {name}, {phone}")
}

/// Consultation request for the admin inbox.
#[must_use]
pub fn consultation_admin(name: &str, phone: &str) -> EmailMessage {
    EmailMessage {
        subject: "Consultation request".to_string(),
        body: format!("{name} requested a consultation. Phone: {phone}."),
    }
}

/// Contact form submission for the admin inbox.
#[must_use]
pub fn contact_admin(name: &str, email: &str, phone: &str, message: &str) -> EmailMessage {
    EmailMessage {
        subject: format!("Contact form message from {name}"),
        body: format!("From: {name} <{email}>, {phone}\n\n{message}"),
    }
}

/// Partner inquiry for the admin inbox.
#[must_use]
pub fn partner_admin(company: &str, name: &str, phone: &str, email: &str) -> EmailMessage {
    EmailMessage {
        subject: format!("Partner inquiry from {company}"),
        body: format!(
            "Company: {company}\nContact: {name}\nPhone: {phone}\nEmail: {email}"
        ),
    }
}

fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::New => "received",
        OrderStatus::Processing => "being prepared",
        OrderStatus::Shipped => "shipped",
        OrderStatus::Delivered => "delivered",
        OrderStatus::Cancelled => "cancelled",
    }
}
