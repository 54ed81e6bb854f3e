//! Persisted JSON stores.
//!
//! Every store owns one top-level piece of state (products, orders, carts,
//! page content, brochures) and round-trips it through a [`Backend`] under
//! a distinct namespaced key. The backend is the repository seam: store
//! logic never touches a concrete storage mechanism, so the JSON-file
//! backend can be swapped for a database without touching the stores.
//!
//! There is no schema versioning or migration logic - a shape change means
//! a new key name, which is why the product and brochure keys carry
//! version suffixes.
//!
//! Stores have no cross-store transactional guarantee: checkout's order
//! creation and cart clearing are two separate saves, and the second can
//! fail after the first succeeded.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod brochures;
pub mod carts;
pub mod content;
pub mod orders;
pub mod products;

pub use brochures::BrochureStore;
pub use carts::CartStore;
pub use content::ContentStore;
pub use orders::OrderStore;
pub use products::ProductStore;

/// Errors from the store layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend I/O failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted payload could not be (de)serialized.
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// The repository seam: load and save JSON payloads by namespaced key.
pub trait Backend: Send + Sync {
    /// Load the payload stored under `key`, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend cannot be written.
    fn save(&self, key: &str, payload: &str) -> Result<(), StoreError>;
}

/// File-per-key backend: `<dir>/<key>.json`, written atomically via a
/// temp file and rename.
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Open a backend rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Backend for JsonFileBackend {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// One piece of state persisted under a namespaced key.
///
/// Loads at construction (falling back to `T::default()` when the key has
/// never been saved) and writes the full state back after every mutation.
pub struct Persisted<T> {
    key: &'static str,
    backend: Arc<dyn Backend>,
    state: RwLock<T>,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Open the state stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read or the stored
    /// payload does not deserialize.
    pub fn open(key: &'static str, backend: Arc<dyn Backend>) -> Result<Self, StoreError> {
        let state = match backend.load(key)? {
            Some(payload) => serde_json::from_str(&payload)?,
            None => T::default(),
        };
        Ok(Self {
            key,
            backend,
            state: RwLock::new(state),
        })
    }

    /// Read the state through a closure.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` if a writer panicked while holding
    /// the lock.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, StoreError> {
        let guard = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&guard))
    }

    /// Mutate the state through a closure, then persist the full state.
    ///
    /// The mutation is applied before the save, so a failed save leaves the
    /// in-memory state ahead of the backend - consistent with the
    /// best-effort, never-roll-back posture of the rest of the system.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the lock is poisoned or the save fails.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, StoreError> {
        let mut guard = self.state.write().map_err(|_| StoreError::Poisoned)?;
        let result = f(&mut guard);
        let payload = serde_json::to_string_pretty(&*guard)?;
        drop(guard);
        self.backend.save(self.key, &payload)?;
        Ok(result)
    }

    /// The namespaced key this state persists under.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }
}

/// All stores, opened together at startup.
pub struct Stores {
    /// Product catalog.
    pub products: ProductStore,
    /// Order ledger.
    pub orders: OrderStore,
    /// Per-session shopping carts.
    pub carts: CartStore,
    /// Page blocks and typed page data.
    pub content: ContentStore,
    /// PDF brochures.
    pub brochures: BrochureStore,
}

impl Stores {
    /// Open every store against the given backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if any store fails to load.
    pub fn open(backend: Arc<dyn Backend>) -> Result<Self, StoreError> {
        Ok(Self {
            products: ProductStore::open(Arc::clone(&backend))?,
            orders: OrderStore::open(Arc::clone(&backend))?,
            carts: CartStore::open(Arc::clone(&backend))?,
            content: ContentStore::open(Arc::clone(&backend))?,
            brochures: BrochureStore::open(backend)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::open(dir.path()).unwrap();

        assert!(backend.load("missing").unwrap().is_none());

        backend.save("some-key", "{\"a\":1}").unwrap();
        assert_eq!(backend.load("some-key").unwrap().unwrap(), "{\"a\":1}");

        // Overwrite replaces the whole payload.
        backend.save("some-key", "{}").unwrap();
        assert_eq!(backend.load("some-key").unwrap().unwrap(), "{}");
    }

    #[test]
    fn test_persisted_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let backend: Arc<dyn Backend> =
            Arc::new(JsonFileBackend::open(dir.path()).unwrap());

        let persisted: Persisted<Vec<u32>> =
            Persisted::open("numbers", Arc::clone(&backend)).unwrap();
        persisted.mutate(|v| v.extend([1, 2, 3])).unwrap();
        drop(persisted);

        let reopened: Persisted<Vec<u32>> = Persisted::open("numbers", backend).unwrap();
        let loaded = reopened.read(Clone::clone).unwrap();
        assert_eq!(loaded, vec![1, 2, 3]);
    }

    #[test]
    fn test_persisted_defaults_when_unsaved() {
        let dir = tempfile::tempdir().unwrap();
        let backend: Arc<dyn Backend> =
            Arc::new(JsonFileBackend::open(dir.path()).unwrap());
        let persisted: Persisted<Vec<u32>> = Persisted::open("fresh", backend).unwrap();
        assert!(persisted.read(Vec::is_empty).unwrap());
    }
}
