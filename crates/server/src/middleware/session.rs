//! Session middleware configuration.
//!
//! Sessions are held in memory. A restart logs the admin out and detaches
//! visitors from their carts, which is an accepted trade: cart contents
//! themselves live in the persisted cart store, only the cookie-to-cart
//! mapping is ephemeral.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ch_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with the in-memory store.
#[must_use]
pub fn create_session_layer(config: &ServerConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
