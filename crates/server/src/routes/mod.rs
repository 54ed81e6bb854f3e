//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (store backend writable)
//!
//! # Storefront
//! GET  /api/products                    - Catalog query (filter/sort/paginate)
//! GET  /api/products/{id}               - Product detail
//! GET  /api/brochures                   - PDF brochure list
//! GET  /api/pages/{slug}                - Page blocks + typed content
//!
//! # Cart (session-backed)
//! GET  /api/cart                        - Current cart
//! POST /api/cart/add                    - Add product (merge-by-id)
//! POST /api/cart/update                 - Set line quantity (<= 0 removes)
//! POST /api/cart/remove                 - Remove line
//! POST /api/cart/clear                  - Empty the cart
//! POST /api/checkout                    - Create order from cart, then notify best-effort
//!
//! # Notification gateway
//! POST /api/notify/send-order           - New order -> admin+customer email, admin+customer SMS
//! POST /api/notify/send-order-status    - Status change -> customer email
//! POST /api/notify/send-callback        - Callback request -> admin email + SMS
//! POST /api/notify/send-consultation    - Consultation request -> admin email
//! POST /api/notify/send-contact         - Contact form -> admin email
//! POST /api/notify/send-partner         - Partner inquiry -> admin email
//! POST /api/notify/test-email           - Admin diagnostic, mirrors the templates
//!
//! # Customer auth (stub)
//! POST /api/auth/register               - Always succeeds, stores profile in session
//! POST /api/auth/login                  - Always succeeds, stores profile in session
//! POST /api/auth/logout                 - Drops the session profile
//!
//! # Admin (session guard)
//! POST /api/admin/login                 - Credential check against configured pair
//! POST /api/admin/logout
//! GET  /api/admin/me                    - Current admin, if any
//! POST /api/admin/products              - Create product
//! PUT  /api/admin/products/{id}         - Edit product (no-op when absent)
//! DELETE /api/admin/products/{id}       - Delete product
//! GET  /api/admin/orders                - Order list, optional ?status= filter
//! PUT  /api/admin/orders/{id}/status    - Transition status, then email best-effort
//! DELETE /api/admin/orders/{id}         - Delete order
//! GET  /api/admin/orders/stats          - Revenue (excl. cancelled) + count (incl.)
//! POST /api/admin/brochures             - Create brochure
//! PUT  /api/admin/brochures/{id}        - Edit brochure
//! DELETE /api/admin/brochures/{id}      - Delete brochure
//! PUT  /api/admin/pages/{slug}          - Replace typed page content
//! POST /api/admin/pages/{slug}/blocks/reorder     - Apply drag-reorder
//! POST /api/admin/pages/{slug}/blocks/{id}/toggle - Flip block visibility
//! POST /api/admin/pages/{slug}/items              - Append a list item
//! PUT  /api/admin/pages/{slug}/items/{index}      - Patch a list item
//! DELETE /api/admin/pages/{slug}/items/{index}    - Remove a list item
//! ```

pub mod auth;
pub mod brochures;
pub mod cart;
pub mod checkout;
pub mod notify;
pub mod orders;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the public storefront routes router.
pub fn storefront_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/brochures", get(brochures::index))
        .route("/pages/{slug}", get(pages::show))
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/clear", post(cart::clear))
        .route("/checkout", post(checkout::checkout))
}

/// Create the notification gateway routes router.
pub fn notify_routes() -> Router<AppState> {
    Router::new()
        .route("/send-order", post(notify::send_order))
        .route("/send-order-status", post(notify::send_order_status))
        .route("/send-callback", post(notify::send_callback))
        .route("/send-consultation", post(notify::send_consultation))
        .route("/send-contact", post(notify::send_contact))
        .route("/send-partner", post(notify::send_partner))
        .route("/test-email", post(notify::test_email))
}

/// Create the customer auth (stub) routes router.
pub fn customer_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the admin routes router. Individual handlers carry the
/// `RequireAdmin` extractor; login/logout/me are the exceptions.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::admin_login))
        .route("/logout", post(auth::admin_logout))
        .route("/me", get(auth::admin_me))
        .route("/products", post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::destroy),
        )
        .route("/orders", get(orders::index))
        .route("/orders/stats", get(orders::stats))
        .route(
            "/orders/{id}",
            get(orders::show).delete(orders::destroy),
        )
        .route("/orders/{id}/status", put(orders::update_status))
        .route("/brochures", post(brochures::create))
        .route(
            "/brochures/{id}",
            put(brochures::update).delete(brochures::destroy),
        )
        .route("/pages/{slug}", put(pages::set_content))
        .route("/pages/{slug}/blocks/reorder", post(pages::reorder_blocks))
        .route("/pages/{slug}/blocks/{id}/toggle", post(pages::toggle_block))
        .route("/pages/{slug}/items", post(pages::add_item))
        .route(
            "/pages/{slug}/items/{index}",
            put(pages::update_item).delete(pages::remove_item),
        )
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", storefront_routes())
        .nest("/api/notify", notify_routes())
        .nest("/api/auth", customer_auth_routes())
        .nest("/api/admin", admin_routes())
}
