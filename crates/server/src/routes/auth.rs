//! Auth route handlers.
//!
//! Two very different surfaces share this module:
//!
//! - **Admin login** is a real gate: an equality check against the
//!   credential pair from configuration, with a generic failure message
//!   and no lockout.
//! - **Customer register/login** is an acknowledged stub: any well-formed
//!   submission succeeds and stores the profile in the session. There is
//!   no password and no account database.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use capsulehaus_core::{Email, Phone};

use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_current_admin, set_current_admin};
use crate::middleware::OptionalAdmin;
use crate::models::{CurrentAdmin, CurrentUser, session_keys};
use crate::state::AppState;

/// Admin login form.
#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    /// Login email.
    pub email: String,
    /// Login password.
    pub password: String,
}

/// Generic auth response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Whether the operation succeeded.
    pub success: bool,
}

/// Current-admin response.
#[derive(Debug, Serialize)]
pub struct AdminMeResponse {
    /// Whether an admin session is active.
    pub authenticated: bool,
    /// The admin's email, when logged in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Admin login: equality check against the configured credential pair.
///
/// Failures are a generic 401 so the response does not reveal which half
/// of the pair was wrong. There is no lockout or rate limiting.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn admin_login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AdminLoginRequest>,
) -> Result<Json<AuthResponse>> {
    if !state.config().admin.matches(&form.email, &form.password) {
        tracing::warn!(email = %form.email, "Admin login failed");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let admin = CurrentAdmin {
        email: form.email.clone(),
    };
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;

    tracing::info!(email = %form.email, "Admin logged in");
    Ok(Json(AuthResponse { success: true }))
}

/// Admin logout.
#[instrument(skip(session))]
pub async fn admin_logout(session: Session) -> Result<Json<AuthResponse>> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(Json(AuthResponse { success: true }))
}

/// Current admin, if any.
#[instrument(skip(admin))]
pub async fn admin_me(OptionalAdmin(admin): OptionalAdmin) -> Json<AdminMeResponse> {
    match admin {
        Some(admin) => Json(AdminMeResponse {
            authenticated: true,
            email: Some(admin.email),
        }),
        None => Json(AdminMeResponse {
            authenticated: false,
            email: None,
        }),
    }
}

/// Customer registration form.
#[derive(Debug, Deserialize)]
pub struct CustomerAuthRequest {
    /// Customer email.
    pub email: String,
    /// Display name, optional.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact phone, optional.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Customer registration stub: validates the fields, then succeeds.
#[instrument(skip(session, form), fields(email = %form.email))]
pub async fn register(
    session: Session,
    Json(form): Json<CustomerAuthRequest>,
) -> impl IntoResponse {
    store_customer_profile(&session, form).await
}

/// Customer login stub: identical to registration.
#[instrument(skip(session, form), fields(email = %form.email))]
pub async fn login(session: Session, Json(form): Json<CustomerAuthRequest>) -> impl IntoResponse {
    store_customer_profile(&session, form).await
}

/// Customer logout: drops the session profile.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<AuthResponse>> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(Json(AuthResponse { success: true }))
}

async fn store_customer_profile(
    session: &Session,
    form: CustomerAuthRequest,
) -> std::result::Result<Json<AuthResponse>, (StatusCode, Json<AuthResponse>)> {
    let Ok(email) = Email::parse(&form.email) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(AuthResponse { success: false }),
        ));
    };
    let phone = match form.phone.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => match Phone::parse(raw) {
            Ok(phone) => Some(phone.into_inner()),
            Err(_) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(AuthResponse { success: false }),
                ));
            }
        },
        None => None,
    };

    let user = CurrentUser {
        email: email.into_inner(),
        name: form.name.filter(|s| !s.trim().is_empty()),
        phone,
    };

    if let Err(e) = session.insert(session_keys::CURRENT_USER, &user).await {
        tracing::error!(error = %e, "Failed to store customer profile in session");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AuthResponse { success: false }),
        ));
    }

    Ok(Json(AuthResponse { success: true }))
}
