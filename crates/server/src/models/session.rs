//! Session-stored types.
//!
//! The session carries three things: the visitor's cart id, the logged-in
//! admin identity, and the (stub) customer profile.

use serde::{Deserialize, Serialize};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's login email.
    pub email: String,
}

/// Session-stored customer profile.
///
/// Customer auth is a deliberate stub: any well-formed registration or
/// login succeeds and simply records this profile in the session. There
/// is no password and no account database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Customer email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Session keys for storefront and admin data.
pub mod session_keys {
    /// Key for the visitor's cart id.
    pub const CART_ID: &str = "cart_id";

    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for storing the current customer profile.
    pub const CURRENT_USER: &str = "current_user";
}
