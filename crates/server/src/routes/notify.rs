//! Notification gateway route handlers.
//!
//! Thin JSON endpoints that validate a form payload, render the matching
//! template, and forward it to the email/SMS services. Every response is
//! `{success, error?}`. Validation failures return 400 and never reach a
//! provider; delivery failures return 500 with the error string and leave
//! whatever state triggered the notification untouched.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use capsulehaus_core::order::{Order, OrderItem};
use capsulehaus_core::{Email, Money, OrderId, OrderStatus, Phone, ProductId};

use crate::middleware::RequireAdmin;
use crate::services::notify;
use crate::state::AppState;

/// Gateway response contract: `{success, error?}`.
#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    /// Whether every attempted channel succeeded.
    pub success: bool,
    /// First channel error, when any failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotifyResponse {
    const fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<NotifyResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(NotifyResponse::failed(message.to_string())),
    )
}

fn delivery_failed(error: String) -> (StatusCode, Json<NotifyResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(NotifyResponse::failed(error)),
    )
}

// =============================================================================
// send-order / send-order-status
// =============================================================================

/// New-order notification payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOrderRequest {
    /// The order to announce.
    pub order: Order,
    /// Override for the customer email; falls back to the order's.
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Override for the customer phone; falls back to the order's.
    #[serde(default)]
    pub customer_phone: Option<String>,
}

/// New order: admin + customer email, admin + customer SMS.
#[instrument(skip(state, form), fields(order_number = %form.order.order_number))]
pub async fn send_order(
    State(state): State<AppState>,
    Json(form): Json<SendOrderRequest>,
) -> impl IntoResponse {
    let order = &form.order;
    let mut first_error: Option<String> = None;

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
        tracing::error!(error = %e, "Failed to email admin about order");
        first_error.get_or_insert_with(|| e.to_string());
    }

    let customer_email = form
        .customer_email
        .clone()
        .or_else(|| order.customer_email.as_ref().map(ToString::to_string));
    if let Some(to) = customer_email {
        let message = notify::new_order_customer(order);
        if let Err(e) = state.email().send(&to, &message.subject, &message.body).await {
            tracing::error!(error = %e, "Failed to email customer about order");
            first_error.get_or_insert_with(|| e.to_string());
        }
    }

    state.sms().send_to_admin(&notify::new_order_admin_sms(order));
    let customer_phone = form
        .customer_phone
        .clone()
        .unwrap_or_else(|| order.customer_phone.as_str().to_owned());
    state
        .sms()
        .send(&customer_phone, &notify::new_order_customer_sms(order));

    match first_error {
        None => (StatusCode::OK, Json(NotifyResponse::ok())),
        Some(error) => delivery_failed(error),
    }
}

/// Status-change notification payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOrderStatusRequest {
    /// The order being updated.
    pub order: Order,
    /// The new status, as its wire string.
    pub status: String,
    /// Reason, meaningful only for cancellations.
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    /// Carrier tracking number, included for shipped orders.
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// Customer email to notify.
    pub customer_email: String,
}

/// Status change: customer email.
#[instrument(skip(state, form), fields(order_number = %form.order.order_number))]
pub async fn send_order_status(
    State(state): State<AppState>,
    Json(form): Json<SendOrderStatusRequest>,
) -> impl IntoResponse {
    let Ok(status) = form.status.parse::<OrderStatus>() else {
        return bad_request("Invalid order status.");
    };
    let Ok(to) = Email::parse(&form.customer_email) else {
        return bad_request("Please enter a valid email address.");
    };

    let message = notify::order_status_customer(
        &form.order,
        status,
        form.cancellation_reason.as_deref(),
        form.tracking_number.as_deref(),
    );

    match state
        .email()
        .send(to.as_str(), &message.subject, &message.body)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(NotifyResponse::ok())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to email customer about status change");
            delivery_failed(e.to_string())
        }
    }
}

// =============================================================================
// Form endpoints
// =============================================================================

/// Callback request payload.
#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    /// Customer name.
    pub name: String,
    /// Callback number.
    pub phone: String,
}

/// Callback request: admin email + SMS.
#[instrument(skip(state, form), fields(name = %form.name))]
pub async fn send_callback(
    State(state): State<AppState>,
    Json(form): Json<CallbackRequest>,
) -> impl IntoResponse {
    if form.name.trim().is_empty() {
        return bad_request("Name is required.");
    }
    let Ok(phone) = Phone::parse(&form.phone) else {
        return bad_request("Please enter a valid phone number.");
    };

    let message = notify::callback_admin(form.name.trim(), phone.as_str());
    let result = state
        .email()
        .send(
            &state.config().notify.admin_email,
            &message.subject,
            &message.body,
        )
        .await;

    state
        .sms()
        .send_to_admin(&notify::callback_admin_sms(form.name.trim(), phone.as_str()));

    match result {
        Ok(()) => (StatusCode::OK, Json(NotifyResponse::ok())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to email admin about callback request");
            delivery_failed(e.to_string())
        }
    }
}

/// Consultation request payload.
#[derive(Debug, Deserialize)]
pub struct ConsultationRequest {
    /// Customer name.
    pub name: String,
    /// Contact number.
    pub phone: String,
}

/// Consultation request: admin email.
#[instrument(skip(state, form), fields(name = %form.name))]
pub async fn send_consultation(
    State(state): State<AppState>,
    Json(form): Json<ConsultationRequest>,
) -> impl IntoResponse {
    if form.name.trim().is_empty() {
        return bad_request("Name is required.");
    }
    let Ok(phone) = Phone::parse(&form.phone) else {
        return bad_request("Please enter a valid phone number.");
    };

    let message = notify::consultation_admin(form.name.trim(), phone.as_str());
    match state
        .email()
        .send(
            &state.config().notify.admin_email,
            &message.subject,
            &message.body,
        )
        .await
    {
        Ok(()) => (StatusCode::OK, Json(NotifyResponse::ok())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to email admin about consultation request");
            delivery_failed(e.to_string())
        }
    }
}

/// Contact form payload.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Sender phone.
    pub phone: String,
    /// Message body.
    pub message: String,
}

/// Contact form: admin email.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn send_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactRequest>,
) -> impl IntoResponse {
    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return bad_request("Name and message are required.");
    }
    let Ok(email) = Email::parse(&form.email) else {
        return bad_request("Please enter a valid email address.");
    };
    let Ok(phone) = Phone::parse(&form.phone) else {
        return bad_request("Please enter a valid phone number.");
    };

    let message = notify::contact_admin(
        form.name.trim(),
        email.as_str(),
        phone.as_str(),
        form.message.trim(),
    );
    match state
        .email()
        .send(
            &state.config().notify.admin_email,
            &message.subject,
            &message.body,
        )
        .await
    {
        Ok(()) => (StatusCode::OK, Json(NotifyResponse::ok())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to email admin about contact message");
            delivery_failed(e.to_string())
        }
    }
}

/// Partner inquiry payload.
#[derive(Debug, Deserialize)]
pub struct PartnerRequest {
    /// Company name.
    pub company: String,
    /// Contact person.
    pub name: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
}

/// Partner inquiry: admin email.
#[instrument(skip(state, form), fields(company = %form.company))]
pub async fn send_partner(
    State(state): State<AppState>,
    Json(form): Json<PartnerRequest>,
) -> impl IntoResponse {
    if form.company.trim().is_empty() || form.name.trim().is_empty() {
        return bad_request("Company and contact name are required.");
    }
    let Ok(email) = Email::parse(&form.email) else {
        return bad_request("Please enter a valid email address.");
    };
    let Ok(phone) = Phone::parse(&form.phone) else {
        return bad_request("Please enter a valid phone number.");
    };

    let message = notify::partner_admin(
        form.company.trim(),
        form.name.trim(),
        phone.as_str(),
        email.as_str(),
    );
    match state
        .email()
        .send(
            &state.config().notify.admin_email,
            &message.subject,
            &message.body,
        )
        .await
    {
        Ok(()) => (StatusCode::OK, Json(NotifyResponse::ok())),
        Err(e) => {
            tracing::error!(error = %e, "Failed to email admin about partner inquiry");
            delivery_failed(e.to_string())
        }
    }
}

// =============================================================================
// test-email (admin diagnostic)
// =============================================================================

/// Test email payload. Mirrors the notification templates so an admin can
/// verify the delivery pipeline end to end.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailRequest {
    /// Template to exercise: `order`, `order-status`, `callback`, or `custom`.
    pub r#type: String,
    /// Recipient.
    pub email: String,
    /// Order to render; a built-in sample is used when absent.
    #[serde(default)]
    pub order: Option<Order>,
    /// Status for the `order-status` template (default: `shipped`).
    #[serde(default)]
    pub order_status: Option<String>,
    /// Subject/body pair for the `custom` template.
    #[serde(default)]
    pub custom: Option<CustomTestEmail>,
}

/// Custom test message.
#[derive(Debug, Deserialize)]
pub struct CustomTestEmail {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

fn sample_order() -> Option<Order> {
    let phone = Phone::parse("+79990000000").ok()?;
    Some(Order {
        id: OrderId::new(0),
        order_number: "0000".to_string(),
        customer_name: "Test Customer".to_string(),
        customer_phone: phone,
        customer_email: None,
        items: vec![OrderItem {
            product_id: ProductId::new(0),
            name: "Capsule M2".to_string(),
            quantity: 1,
            price: Money::new(890_000),
        }],
        total: Money::new(890_000),
        status: OrderStatus::New,
        created_at: chrono::Utc::now(),
        delivery_address: None,
        notes: None,
        cancellation_reason: None,
    })
}

/// Send a test email rendering one of the notification templates.
#[instrument(skip(_admin, state, form), fields(kind = %form.r#type, to = %form.email))]
pub async fn test_email(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(form): Json<TestEmailRequest>,
) -> impl IntoResponse {
    let Ok(to) = Email::parse(&form.email) else {
        return bad_request("Please enter a valid email address.");
    };

    let Some(order) = form.order.or_else(sample_order) else {
        return delivery_failed("Failed to build sample order.".to_string());
    };

    let message = match form.r#type.as_str() {
        "order" => notify::new_order_customer(&order),
        "order-status" => {
            let status = form
                .order_status
                .as_deref()
                .and_then(|s| s.parse::<OrderStatus>().ok())
                .unwrap_or(OrderStatus::Shipped);
            notify::order_status_customer(&order, status, None, None)
        }
        "callback" => notify::callback_admin("Test Customer", "+79990000000"),
        "custom" => match form.custom {
            Some(custom) => notify::EmailMessage {
                subject: custom.subject,
                body: custom.body,
            },
            None => return bad_request("Custom test requires subject and body."),
        },
        _ => return bad_request("Unknown test email type."),
    };

    match state
        .email()
        .send(to.as_str(), &message.subject, &message.body)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(NotifyResponse::ok())),
        Err(e) => {
            tracing::error!(error = %e, "Test email failed");
            delivery_failed(e.to_string())
        }
    }
}
