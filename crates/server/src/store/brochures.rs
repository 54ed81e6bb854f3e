//! Brochure store: CRUD for downloadable PDF records.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use capsulehaus_core::brochure::Brochure;
use capsulehaus_core::BrochureId;

use super::{Backend, Persisted, StoreError};

/// Persisted key. The `-v1` suffix marks the current shape.
const KEY: &str = "capsule-catalogs-v1";

/// Fields for creating a brochure through the back office.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBrochure {
    /// Display title.
    pub title: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Cover image URL.
    #[serde(default)]
    pub cover_image: String,
    /// URL of the PDF file.
    pub pdf_url: String,
    /// Original file name.
    pub pdf_file_name: String,
}

/// Field-level patch for editing a brochure. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrochurePatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New cover image URL.
    #[serde(default)]
    pub cover_image: Option<String>,
    /// New PDF URL.
    #[serde(default)]
    pub pdf_url: Option<String>,
    /// New file name.
    #[serde(default)]
    pub pdf_file_name: Option<String>,
}

/// The brochure store.
pub struct BrochureStore {
    state: Persisted<Vec<Brochure>>,
}

impl BrochureStore {
    /// Open the store against a backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if loading fails.
    pub fn open(backend: Arc<dyn Backend>) -> Result<Self, StoreError> {
        Ok(Self {
            state: Persisted::open(KEY, backend)?,
        })
    }

    /// Snapshot of all brochures.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn all(&self) -> Result<Vec<Brochure>, StoreError> {
        self.state.read(Clone::clone)
    }

    /// Create a brochure with an id derived from the creation instant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn create(&self, new: NewBrochure, now: DateTime<Utc>) -> Result<Brochure, StoreError> {
        let brochure = Brochure {
            id: BrochureId::from_timestamp(now),
            title: new.title,
            description: new.description,
            cover_image: new.cover_image,
            pdf_url: new.pdf_url,
            pdf_file_name: new.pdf_file_name,
        };
        self.state.mutate(|brochures| {
            brochures.push(brochure.clone());
        })?;
        Ok(brochure)
    }

    /// Merge a patch into the brochure with the given id. Returns the
    /// updated record, or `None` (a no-op) when the id is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn update(
        &self,
        id: BrochureId,
        patch: BrochurePatch,
    ) -> Result<Option<Brochure>, StoreError> {
        self.state.mutate(|brochures| {
            let brochure = brochures.iter_mut().find(|b| b.id == id)?;
            if let Some(title) = patch.title {
                brochure.title = title;
            }
            if let Some(description) = patch.description {
                brochure.description = description;
            }
            if let Some(cover_image) = patch.cover_image {
                brochure.cover_image = cover_image;
            }
            if let Some(pdf_url) = patch.pdf_url {
                brochure.pdf_url = pdf_url;
            }
            if let Some(pdf_file_name) = patch.pdf_file_name {
                brochure.pdf_file_name = pdf_file_name;
            }
            Some(brochure.clone())
        })
    }

    /// Delete a brochure. No-op when the id is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn delete(&self, id: BrochureId) -> Result<(), StoreError> {
        self.state.mutate(|brochures| {
            brochures.retain(|b| b.id != id);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::JsonFileBackend;
    use chrono::TimeZone;

    fn open_store(dir: &std::path::Path) -> BrochureStore {
        let backend: Arc<dyn Backend> = Arc::new(JsonFileBackend::open(dir).unwrap());
        BrochureStore::open(backend).unwrap()
    }

    #[test]
    fn test_crud_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let created = store
            .create(
                NewBrochure {
                    title: "2025 lineup".to_owned(),
                    description: String::new(),
                    cover_image: String::new(),
                    pdf_url: "/uploads/catalog-2025.pdf".to_owned(),
                    pdf_file_name: "catalog-2025.pdf".to_owned(),
                },
                now,
            )
            .unwrap();

        let updated = store
            .update(
                created.id,
                BrochurePatch {
                    title: Some("2025 full lineup".to_owned()),
                    ..BrochurePatch::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "2025 full lineup");
        assert_eq!(updated.pdf_url, "/uploads/catalog-2025.pdf");

        assert!(
            store
                .update(BrochureId::new(404), BrochurePatch::default())
                .unwrap()
                .is_none()
        );

        store.delete(created.id).unwrap();
        assert!(store.all().unwrap().is_empty());
    }
}
