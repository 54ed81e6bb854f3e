//! Per-page content blocks and typed page data.
//!
//! Every public page has an ordered list of named content blocks the back
//! office can reorder and toggle, plus a typed data payload whose shape
//! depends on the page. The payload is a tagged union rather than an open
//! dictionary: each page slug owns a concrete schema, which keeps the
//! "different shape per page" flexibility without giving up type safety.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BlockId, ItemId, Money};

/// A named, orderable, independently toggleable section of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBlock {
    /// Block identity, stable across reorders.
    pub id: BlockId,
    /// Section type tag, e.g. `hero`, `gallery`, `faq`.
    pub kind: String,
    /// Whether the rendering layer should show the block. Disabled blocks
    /// are hidden by the renderer, never filtered out here.
    pub enabled: bool,
    /// Display rank. Contiguous and 0-based after every reorder.
    pub order: u32,
}

/// The ordered block list of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBlocks {
    blocks: Vec<PageBlock>,
}

impl PageBlocks {
    /// Build a block list from `(kind, enabled)` pairs, assigning ids and
    /// ranks from list position.
    #[must_use]
    pub fn from_kinds(kinds: &[(&str, bool)], at: DateTime<Utc>) -> Self {
        let base = at.timestamp_millis();
        let blocks = kinds
            .iter()
            .enumerate()
            .map(|(i, (kind, enabled))| PageBlock {
                id: BlockId::new(base + i as i64),
                kind: (*kind).to_owned(),
                enabled: *enabled,
                order: u32::try_from(i).unwrap_or(u32::MAX),
            })
            .collect();
        Self { blocks }
    }

    /// Blocks sorted by rank.
    #[must_use]
    pub fn ordered(&self) -> Vec<&PageBlock> {
        let mut refs: Vec<&PageBlock> = self.blocks.iter().collect();
        refs.sort_by_key(|block| block.order);
        refs
    }

    /// Number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the page has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Apply a drag-reorder arrangement.
    ///
    /// Blocks are arranged in the order their ids appear in `arrangement`;
    /// ids not found in the list are ignored, and blocks missing from the
    /// arrangement keep their previous relative order after the listed
    /// ones. Every block's rank is then renumbered to its new index, so
    /// the result is always a contiguous, duplicate-free 0-based sequence.
    pub fn reorder(&mut self, arrangement: &[BlockId]) {
        let mut arranged: Vec<PageBlock> = Vec::with_capacity(self.blocks.len());
        for id in arrangement {
            if let Some(pos) = self.blocks.iter().position(|block| block.id == *id) {
                arranged.push(self.blocks.remove(pos));
            }
        }
        self.blocks.sort_by_key(|block| block.order);
        arranged.append(&mut self.blocks);

        for (index, block) in arranged.iter_mut().enumerate() {
            block.order = u32::try_from(index).unwrap_or(u32::MAX);
        }
        self.blocks = arranged;
    }

    /// Flip one block's `enabled` flag. Returns the new value, or `None`
    /// if the id is unknown.
    pub fn toggle(&mut self, id: BlockId) -> Option<bool> {
        let block = self.blocks.iter_mut().find(|block| block.id == id)?;
        block.enabled = !block.enabled;
        Some(block.enabled)
    }
}

/// A labeled feature shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureItem {
    /// Item identity.
    pub id: ItemId,
    /// Icon name understood by the rendering layer.
    pub icon: String,
    /// Short title.
    pub title: String,
    /// One-paragraph description.
    pub description: String,
}

/// Field-level patch for a [`FeatureItem`]. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureItemPatch {
    /// New icon name.
    #[serde(default)]
    pub icon: Option<String>,
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A purchasable add-on shown on the options page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Item identity.
    pub id: ItemId,
    /// Short title.
    pub title: String,
    /// One-paragraph description.
    pub description: String,
    /// Add-on price.
    pub price: Money,
}

/// Field-level patch for an [`OptionItem`]. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionItemPatch {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New price.
    #[serde(default)]
    pub price: Option<Money>,
}

/// Home page data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeContent {
    /// Hero headline.
    pub hero_title: String,
    /// Hero subheadline.
    pub hero_subtitle: String,
    /// "Our innovations" feature list.
    pub innovations: Vec<FeatureItem>,
}

impl HomeContent {
    /// Append a feature, assigning its id from the creation instant.
    pub fn add_innovation(
        &mut self,
        icon: String,
        title: String,
        description: String,
        at: DateTime<Utc>,
    ) {
        self.innovations.push(FeatureItem {
            id: ItemId::from_timestamp(at),
            icon,
            title,
            description,
        });
    }

    /// Remove a feature by index. Out-of-range is a no-op.
    pub fn remove_innovation(&mut self, index: usize) {
        if index < self.innovations.len() {
            self.innovations.remove(index);
        }
    }

    /// Merge a patch into the feature at `index`. Out-of-range is a no-op.
    pub fn update_innovation(&mut self, index: usize, patch: FeatureItemPatch) {
        if let Some(item) = self.innovations.get_mut(index) {
            if let Some(icon) = patch.icon {
                item.icon = icon;
            }
            if let Some(title) = patch.title {
                item.title = title;
            }
            if let Some(description) = patch.description {
                item.description = description;
            }
        }
    }
}

/// Options page data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsContent {
    /// Purchasable add-ons.
    pub additional_options: Vec<OptionItem>,
}

impl OptionsContent {
    /// Append an add-on, assigning its id from the creation instant.
    pub fn add_option(
        &mut self,
        title: String,
        description: String,
        price: Money,
        at: DateTime<Utc>,
    ) {
        self.additional_options.push(OptionItem {
            id: ItemId::from_timestamp(at),
            title,
            description,
            price,
        });
    }

    /// Remove an add-on by index. Out-of-range is a no-op.
    pub fn remove_option(&mut self, index: usize) {
        if index < self.additional_options.len() {
            self.additional_options.remove(index);
        }
    }

    /// Merge a patch into the add-on at `index`. Out-of-range is a no-op.
    pub fn update_option(&mut self, index: usize, patch: OptionItemPatch) {
        if let Some(item) = self.additional_options.get_mut(index) {
            if let Some(title) = patch.title {
                item.title = title;
            }
            if let Some(description) = patch.description {
                item.description = description;
            }
            if let Some(price) = patch.price {
                item.price = price;
            }
        }
    }
}

/// Contacts page data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactsContent {
    /// Display phone.
    pub phone: String,
    /// Display email.
    pub email: String,
    /// Showroom address.
    pub address: String,
    /// Working hours line.
    pub worktime: String,
}

/// Typed per-page data, keyed by page slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum PageContent {
    /// `home` page payload.
    Home(HomeContent),
    /// `options` page payload.
    Options(OptionsContent),
    /// `contacts` page payload.
    Contacts(ContactsContent),
}

impl PageContent {
    /// The page slug this payload belongs to.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Home(_) => "home",
            Self::Options(_) => "options",
            Self::Contacts(_) => "contacts",
        }
    }
}
