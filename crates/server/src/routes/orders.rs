//! Order route handlers (admin).
//!
//! Status changes commit first; the customer email is a best-effort
//! follow-up orchestrated here, not inside the ledger, and its failure
//! never rolls the status back.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use capsulehaus_core::order::Order;
use capsulehaus_core::{Money, OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::notify;
use crate::state::AppState;

/// Order list query parameters.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    /// Restrict to one status.
    pub status: Option<String>,
}

/// Order list response.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    /// Orders, most recent first.
    pub orders: Vec<Order>,
    /// Count of the returned list.
    pub total: usize,
}

/// Status update request.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: String,
    /// Reason, stored only when the target status is `cancelled`.
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    /// Carrier tracking number, forwarded in the customer email only.
    #[serde(default)]
    pub tracking_number: Option<String>,
}

/// Status update response.
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    /// Always true; an unknown id is a committed no-op.
    pub success: bool,
    /// The updated order, when the id was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    /// Present when the follow-up customer email failed; the status change
    /// stands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

/// Revenue/count summary response.
#[derive(Debug, Serialize)]
pub struct OrderStatsResponse {
    /// Sum of totals excluding cancelled orders.
    pub revenue: Money,
    /// Number of orders including cancelled ones.
    pub count: usize,
}

/// Generic success response for deletes.
#[derive(Debug, Serialize)]
pub struct OrderMutationResponse {
    /// Always true; failures surface as error statuses.
    pub success: bool,
}

/// Order list, optionally filtered by status.
#[instrument(skip(_admin, state))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<OrderListResponse>> {
    let orders = match query.status.as_deref() {
        Some(raw) => {
            let status: OrderStatus = raw.parse().map_err(AppError::BadRequest)?;
            state.stores().orders.by_status(status)?
        }
        None => state.stores().orders.list()?,
    };

    let total = orders.len();
    Ok(Json(OrderListResponse { orders, total }))
}

/// Order detail.
#[instrument(skip(_admin, state))]
pub async fn show(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Order>> {
    state
        .stores()
        .orders
        .get(OrderId::new(id))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// Transition an order's status.
///
/// The transition is committed first. When the new status is anything but
/// `new` and the order carries a customer email, the customer is emailed
/// best-effort afterwards.
#[instrument(skip(_admin, state, form))]
pub async fn update_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    let status: OrderStatus = form.status.parse().map_err(AppError::BadRequest)?;

    let order = state.stores().orders.update_status(
        OrderId::new(id),
        status,
        form.cancellation_reason.clone(),
    )?;

    let Some(order) = order else {
        tracing::debug!(order_id = id, "Status update for unknown order ignored");
        return Ok(Json(UpdateStatusResponse {
            success: true,
            order: None,
            email_error: None,
        }));
    };

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        status = %status,
        "Order status updated"
    );

    let mut email_error = None;
    if status != OrderStatus::New {
        if let Some(customer_email) = &order.customer_email {
            let message = notify::order_status_customer(
                &order,
                status,
                form.cancellation_reason.as_deref(),
                form.tracking_number.as_deref(),
            );
            if let Err(e) = state
                .email()
                .send(customer_email.as_str(), &message.subject, &message.body)
                .await
            {
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "Failed to email customer about status change"
                );
                email_error = Some(e.to_string());
            }
        }
    }

    Ok(Json(UpdateStatusResponse {
        success: true,
        order: Some(order),
        email_error,
    }))
}

/// Irreversibly delete an order. The confirmation step lives in the
/// back-office UI; this endpoint deletes unconditionally.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderMutationResponse>> {
    state.stores().orders.delete(OrderId::new(id))?;
    Ok(Json(OrderMutationResponse { success: true }))
}

/// Revenue and count summary for the dashboard.
#[instrument(skip(_admin, state))]
pub async fn stats(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<OrderStatsResponse>> {
    let stats = state.stores().orders.stats()?;
    Ok(Json(OrderStatsResponse {
        revenue: stats.revenue,
        count: stats.count,
    }))
}
