//! Checkout route handler.
//!
//! Creating the order and clearing the cart are two separate store
//! operations with no transaction between them, and the new-order
//! notifications are strictly best-effort: once the order is committed it
//! stays committed, whatever happens to the cart clear or the delivery
//! channels. Delivery failures come back in the response as a warning
//! instead of an error.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use capsulehaus_core::order::{Order, OrderDraft, OrderItem};
use capsulehaus_core::{Email, Money, Phone};

use crate::error::{AppError, Result};
use crate::routes::cart::get_cart_id;
use crate::services::notify;
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// Customer display name.
    pub name: String,
    /// Customer contact phone.
    pub phone: String,
    /// Customer email, optional.
    #[serde(default)]
    pub email: Option<String>,
    /// Delivery address, optional.
    #[serde(default)]
    pub delivery_address: Option<String>,
    /// Free-form notes, optional.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// True once the order is committed, regardless of delivery outcome.
    pub success: bool,
    /// Created order id.
    pub order_id: i64,
    /// Human-facing order number.
    pub order_number: String,
    /// Order total.
    pub total: Money,
    /// Present when a notification channel failed; the order stands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_error: Option<String>,
}

/// Create an order from the session's cart.
#[instrument(skip(state, session, form), fields(customer = %form.name))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    // Validation failures never reach the stores or the delivery channels.
    if form.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }
    let phone = Phone::parse(&form.phone)
        .map_err(|e| AppError::BadRequest(format!("Invalid phone: {e}")))?;
    let email = match form.email.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(
            Email::parse(raw).map_err(|e| AppError::BadRequest(format!("Invalid email: {e}")))?,
        ),
        None => None,
    };

    let Some(cart_id) = get_cart_id(&session).await else {
        return Err(AppError::BadRequest("Cart is empty.".to_string()));
    };
    let cart = state.stores().carts.get(&cart_id)?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty.".to_string()));
    }

    let items = cart
        .items
        .iter()
        .map(|line| OrderItem {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.price,
        })
        .collect();

    let draft = OrderDraft {
        customer_name: form.name.trim().to_owned(),
        customer_phone: phone,
        customer_email: email,
        items,
        order_number: None,
        delivery_address: form.delivery_address.filter(|s| !s.trim().is_empty()),
        notes: form.notes.filter(|s| !s.trim().is_empty()),
    };

    // The order is the point of no return: everything after this line is
    // best-effort and never rolls it back.
    let order = state.stores().orders.create(draft, chrono::Utc::now())?;
    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        total = %order.total,
        "Order created"
    );

    if let Err(e) = state.stores().carts.clear(&cart_id) {
        tracing::warn!(error = %e, "Failed to clear cart after checkout");
    }

    let notification_error = send_order_notifications(&state, &order).await;

    Ok(Json(CheckoutResponse {
        success: true,
        order_id: order.id.as_i64(),
        order_number: order.order_number,
        total: order.total,
        notification_error,
    }))
}

/// Fire the new-order notifications: admin email + SMS, customer email +
/// SMS. Returns the first delivery error, if any, for the response
/// warning. Failures are logged and never propagate.
pub(crate) async fn send_order_notifications(state: &AppState, order: &Order) -> Option<String> {
    let mut first_error = None;

    let admin_message = notify::new_order_admin(order);
    if let Err(e) = state
        .email()
        .send(
            &state.config().notify.admin_email,
            &admin_message.subject,
            &admin_message.body,
        )
        .await
    {
        tracing::warn!(error = %e, "Failed to email admin about new order");
        first_error.get_or_insert_with(|| e.to_string());
    }

    if let Some(customer_email) = &order.customer_email {
        let customer_message = notify::new_order_customer(order);
        if let Err(e) = state
            .email()
            .send(
                customer_email.as_str(),
                &customer_message.subject,
                &customer_message.body,
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to email customer about new order");
            first_error.get_or_insert_with(|| e.to_string());
        }
    }

    // SMS is simulated and cannot fail.
    state.sms().send_to_admin(&notify::new_order_admin_sms(order));
    state.sms().send(
        order.customer_phone.as_str(),
        &notify::new_order_customer_sms(order),
    );

    first_error
}
