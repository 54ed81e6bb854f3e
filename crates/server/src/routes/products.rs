//! Product route handlers.
//!
//! The public listing endpoint is a thin shell over the catalog query
//! engine: it parses the query string into a [`CatalogQuery`], runs it
//! over the store snapshot, and reports the page plus the total match
//! count for the pagination UI.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use capsulehaus_core::catalog::{CatalogQuery, CategoryFilter, PriceBand, Product, SortKey};
use capsulehaus_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::store::products::{NewProduct, ProductPatch};

/// Default page size for the catalog listing.
const DEFAULT_PAGE_SIZE: usize = 9;

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Category label or `all`.
    pub category: Option<String>,
    /// Price band slug from the fixed band list.
    pub price_band: Option<String>,
    /// Exact guest-count match.
    pub guests: Option<u32>,
    /// Sort key; unknown values fall back to the default order.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size.
    pub per_page: Option<usize>,
}

/// Catalog listing response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    /// Products on the requested page.
    pub products: Vec<Product>,
    /// Total matches across all pages, for the "N results" display.
    pub total: usize,
    /// Echoed page number.
    pub page: usize,
    /// Echoed page size.
    pub per_page: usize,
}

impl ProductListQuery {
    fn into_catalog_query(self) -> CatalogQuery {
        CatalogQuery {
            category: self
                .category
                .as_deref()
                .map_or(CategoryFilter::All, CategoryFilter::parse),
            price_band: self.price_band.as_deref().and_then(PriceBand::parse),
            guests: self.guests,
            sort: self.sort.as_deref().map_or(SortKey::Default, SortKey::parse),
            page: self.page.unwrap_or(1),
            page_size: self.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// Catalog listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductListResponse>> {
    let catalog_query = query.into_catalog_query();
    let page = state.stores().products.query(&catalog_query)?;

    Ok(Json(ProductListResponse {
        products: page.products,
        total: page.total_matches,
        page: catalog_query.page,
        per_page: catalog_query.page_size,
    }))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    state
        .stores()
        .products
        .get(ProductId::new(id))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Mutation response carrying the affected product when it exists.
///
/// Edits and deletes on an absent id are no-ops by design, so the
/// endpoint still reports success and simply omits the product.
#[derive(Debug, Serialize)]
pub struct ProductMutationResponse {
    /// Always true; failures surface as error statuses.
    pub success: bool,
    /// The affected product, when the id was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// Create a product (admin).
#[instrument(skip(_admin, state, new))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    if new.name.trim().is_empty() {
        return Err(AppError::BadRequest("Product name is required.".to_string()));
    }

    let product = state.stores().products.create(new, chrono::Utc::now())?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Edit a product (admin). No-op when the id is absent.
#[instrument(skip(_admin, state, patch))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ProductMutationResponse>> {
    let product = state.stores().products.update(ProductId::new(id), patch)?;
    if product.is_none() {
        tracing::debug!(product_id = id, "Edit of unknown product ignored");
    }
    Ok(Json(ProductMutationResponse {
        success: true,
        product,
    }))
}

/// Delete a product (admin). No-op when the id is absent; carts and
/// orders keep their snapshots.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductMutationResponse>> {
    state.stores().products.delete(ProductId::new(id))?;
    Ok(Json(ProductMutationResponse {
        success: true,
        product: None,
    }))
}
