//! CLI command implementations.

pub mod seed;
pub mod stats;

use std::path::PathBuf;
use std::sync::Arc;

use capsulehaus_server::store::{Backend, JsonFileBackend, StoreError, Stores};

/// Resolve the data directory the same way the server does:
/// `CAPSULEHAUS_DATA_DIR`, defaulting to `data`.
pub(crate) fn data_dir() -> PathBuf {
    dotenvy::dotenv().ok();
    PathBuf::from(std::env::var("CAPSULEHAUS_DATA_DIR").unwrap_or_else(|_| "data".to_owned()))
}

/// Open the stores against the resolved data directory.
pub(crate) fn open_stores() -> Result<Stores, StoreError> {
    let dir = data_dir();
    let backend: Arc<dyn Backend> = Arc::new(JsonFileBackend::open(&dir)?);
    Stores::open(backend)
}
