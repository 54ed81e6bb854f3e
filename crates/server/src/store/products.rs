//! Product store: admin CRUD plus the read path for the catalog query
//! engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use capsulehaus_core::catalog::{CatalogPage, CatalogQuery, Product};
use capsulehaus_core::{Money, ProductId};

use super::{Backend, Persisted, StoreError};

/// Persisted key. The `-v2` suffix marks the current shape; a breaking
/// shape change gets a new key instead of a migration.
const KEY: &str = "capsule-products-v2";

/// Fields for creating a product through the back office.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Price in whole rubles.
    pub price: Money,
    /// Free-text dimensions.
    pub dimensions: String,
    /// Guest capacity.
    pub guests: u32,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Category label.
    pub category: String,
    /// Ordered image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Optional promo video URL.
    #[serde(default)]
    pub video_url: Option<String>,
    /// Availability flag.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

/// Field-level patch for editing a product. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New price.
    #[serde(default)]
    pub price: Option<Money>,
    /// New dimensions text.
    #[serde(default)]
    pub dimensions: Option<String>,
    /// New guest capacity.
    #[serde(default)]
    pub guests: Option<u32>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Replacement image list.
    #[serde(default)]
    pub images: Option<Vec<String>>,
    /// Replacement video URL; `Some(None)` is not representable, so the
    /// patch clears the video by sending an empty string.
    #[serde(default)]
    pub video_url: Option<String>,
    /// New availability flag.
    #[serde(default)]
    pub in_stock: Option<bool>,
}

/// The product catalog store.
pub struct ProductStore {
    state: Persisted<Vec<Product>>,
}

impl ProductStore {
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

    /// Snapshot of the full product list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn all(&self) -> Result<Vec<Product>, StoreError> {
        self.state.read(Clone::clone)
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.state
            .read(|products| products.iter().find(|p| p.id == id).cloned())
    }

    /// Run a catalog query over the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn query(&self, query: &CatalogQuery) -> Result<CatalogPage, StoreError> {
        self.state.read(|products| query.run(products))
    }

    /// Create a product with an id derived from the creation instant.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn create(&self, new: NewProduct, now: DateTime<Utc>) -> Result<Product, StoreError> {
        let product = Product {
            id: ProductId::from_timestamp(now),
            name: new.name,
            price: new.price,
            dimensions: new.dimensions,
            guests: new.guests,
            description: new.description,
            category: new.category,
            images: new.images,
            video_url: new.video_url,
            in_stock: new.in_stock,
        };
        self.state.mutate(|products| {
            products.push(product.clone());
        })?;
        Ok(product)
    }

    /// Merge a patch into the product with the given id.
    ///
    /// Returns the updated product, or `None` (a no-op) when the id is
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, StoreError> {
        self.state.mutate(|products| {
            let product = products.iter_mut().find(|p| p.id == id)?;
            if let Some(name) = patch.name {
                product.name = name;
            }
            if let Some(price) = patch.price {
                product.price = price;
            }
            if let Some(dimensions) = patch.dimensions {
                product.dimensions = dimensions;
            }
            if let Some(guests) = patch.guests {
                product.guests = guests;
            }
            if let Some(description) = patch.description {
                product.description = description;
            }
            if let Some(category) = patch.category {
                product.category = category;
            }
            if let Some(images) = patch.images {
                product.images = images;
            }
            if let Some(video_url) = patch.video_url {
                product.video_url = if video_url.is_empty() {
                    None
                } else {
                    Some(video_url)
                };
            }
            if let Some(in_stock) = patch.in_stock {
                product.in_stock = in_stock;
            }
            Some(product.clone())
        })
    }

    /// Delete a product. No-op when the id is absent; carts and orders
    /// keep their snapshots either way.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        self.state.mutate(|products| {
            products.retain(|p| p.id != id);
        })
    }

    /// Replace the whole catalog. Used by the seed command.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if persisting fails.
    pub fn replace_all(&self, products: Vec<Product>) -> Result<(), StoreError> {
        self.state.mutate(|state| {
            *state = products;
        })
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Poisoned` on a poisoned lock.
    pub fn count(&self) -> Result<usize, StoreError> {
        self.state.read(Vec::len)
    }
}
