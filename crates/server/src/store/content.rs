//! Content store: per-page block lists and typed page data.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use capsulehaus_core::content::{PageBlocks, PageContent};
use capsulehaus_core::BlockId;

use super::{Backend, Persisted, StoreError};

/// Persisted key.
const KEY: &str = "capsule-page-content";

/// Everything the store holds for one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageEntry {
    /// Ordered, toggleable content sections.
    pub blocks: PageBlocks,
    /// Typed page payload; pages that only have blocks carry `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<PageContent>,
}

/// Map of page slug to its entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentState {
    pages: HashMap<String, PageEntry>,
}

/// The page content store.
pub struct ContentStore {
    state: Persisted<ContentState>,
}

impl ContentStore {
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

    /// The entry for a page slug, if the page is known.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn page(&self, slug: &str) -> Result<Option<PageEntry>, StoreError> {
        self.state.read(|state| state.pages.get(slug).cloned())
    }

    /// All page slugs the store knows about.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn slugs(&self) -> Result<Vec<String>, StoreError> {
        self.state.read(|state| {
            let mut slugs: Vec<String> = state.pages.keys().cloned().collect();
            slugs.sort();
            slugs
        })
    }

    /// Replace a page's typed content. Creates the page entry if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn set_content(&self, slug: &str, content: PageContent) -> Result<(), StoreError> {
        self.state.mutate(|state| {
            state.pages.entry(slug.to_owned()).or_default().content = Some(content);
        })
    }

    /// Mutate a page's typed content in place. Returns `false` (a no-op)
    /// when the page or its content is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn with_content(
        &self,
        slug: &str,
        f: impl FnOnce(&mut PageContent),
    ) -> Result<bool, StoreError> {
        self.state.mutate(|state| {
            match state.pages.get_mut(slug).and_then(|page| page.content.as_mut()) {
                Some(content) => {
                    f(content);
                    true
                }
                None => false,
            }
        })
    }

    /// Apply a drag-reorder arrangement to a page's blocks. No-op when the
    /// page is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn reorder_blocks(
        &self,
        slug: &str,
        arrangement: &[BlockId],
    ) -> Result<Option<PageBlocks>, StoreError> {
        self.state.mutate(|state| {
            let page = state.pages.get_mut(slug)?;
            page.blocks.reorder(arrangement);
            Some(page.blocks.clone())
        })
    }

    /// Flip one block's enabled flag. Returns the new value, or `None`
    /// when the page or block is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn toggle_block(&self, slug: &str, id: BlockId) -> Result<Option<bool>, StoreError> {
        self.state
            .mutate(|state| state.pages.get_mut(slug)?.blocks.toggle(id))
    }

    /// Replace a page entry wholesale. Used by the seed command.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn put_page(&self, slug: &str, entry: PageEntry) -> Result<(), StoreError> {
        self.state.mutate(|state| {
            state.pages.insert(slug.to_owned(), entry);
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::JsonFileBackend;
    use capsulehaus_core::content::{ContactsContent, HomeContent};
    use chrono::{TimeZone, Utc};

    fn open_store(dir: &std::path::Path) -> ContentStore {
        let backend: Arc<dyn Backend> = Arc::new(JsonFileBackend::open(dir).unwrap());
        ContentStore::open(backend).unwrap()
    }

    fn seeded_entry() -> PageEntry {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        PageEntry {
            blocks: PageBlocks::from_kinds(&[("hero", true), ("gallery", true)], at),
            content: Some(PageContent::Home(HomeContent {
                hero_title: "Capsule houses".to_owned(),
                hero_subtitle: "Delivered in 30 days".to_owned(),
                innovations: vec![],
            })),
        }
    }

    #[test]
    fn test_page_roundtrip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open_store(dir.path());
            store.put_page("home", seeded_entry()).unwrap();
        }
        let store = open_store(dir.path());
        let page = store.page("home").unwrap().unwrap();
        assert_eq!(page.blocks.len(), 2);
        assert!(matches!(page.content, Some(PageContent::Home(_))));
    }

    #[test]
    fn test_reorder_and_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.put_page("home", seeded_entry()).unwrap();

        let ids: Vec<BlockId> = store
            .page("home")
            .unwrap()
            .unwrap()
            .blocks
            .ordered()
            .iter()
            .map(|b| b.id)
            .collect();

        let reversed: Vec<BlockId> = ids.iter().rev().copied().collect();
        let blocks = store.reorder_blocks("home", &reversed).unwrap().unwrap();
        let kinds: Vec<String> = blocks
            .ordered()
            .iter()
            .map(|b| b.kind.clone())
            .collect();
        assert_eq!(kinds, vec!["gallery", "hero"]);

        let flipped = store.toggle_block("home", *ids.first().unwrap()).unwrap();
        assert_eq!(flipped, Some(false));
    }

    #[test]
    fn test_absent_page_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        assert!(store.page("nope").unwrap().is_none());
        assert!(store.reorder_blocks("nope", &[]).unwrap().is_none());
        assert!(store.toggle_block("nope", BlockId::new(1)).unwrap().is_none());
        assert!(!store.with_content("nope", |_| {}).unwrap());
    }

    #[test]
    fn test_set_content_creates_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store
            .set_content(
                "contacts",
                PageContent::Contacts(ContactsContent::default()),
            )
            .unwrap();
        let page = store.page("contacts").unwrap().unwrap();
        assert!(page.blocks.is_empty());
        assert!(matches!(page.content, Some(PageContent::Contacts(_))));
    }
}
