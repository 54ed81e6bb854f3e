//! Integration tests for CapsuleHaus.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p capsulehaus-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to order to status transitions, end to end
//! - `catalog_queries` - The seeded catalog against the query engine
//! - `content_editing` - Block reorder/toggle and item CRUD over the store
//!
//! Tests run against real stores on a `tempfile` data directory with
//! simulated delivery services - no network, no external state.

use std::sync::Arc;

use capsulehaus_server::store::{Backend, JsonFileBackend, Stores};

/// Open a full store set over a fresh temp directory.
///
/// Returns the guard together with the stores; dropping the guard removes
/// the directory.
///
/// # Panics
///
/// Panics if the temp directory or stores cannot be created - test-only
/// code fails loudly.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn temp_stores() -> (tempfile::TempDir, Stores) {
    let dir = tempfile::tempdir().unwrap();
    let backend: Arc<dyn Backend> = Arc::new(JsonFileBackend::open(dir.path()).unwrap());
    let stores = Stores::open(backend).unwrap();
    (dir, stores)
}

/// Reopen stores over an existing data directory, simulating a restart.
///
/// # Panics
///
/// Panics if the stores cannot be opened.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn reopen_stores(dir: &tempfile::TempDir) -> Stores {
    let backend: Arc<dyn Backend> = Arc::new(JsonFileBackend::open(dir.path()).unwrap());
    Stores::open(backend).unwrap()
}
