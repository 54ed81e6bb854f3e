//! Page content route handlers.
//!
//! Blocks are generic across pages; the typed payload and its item lists
//! depend on the page slug, so the item handlers dispatch on the stored
//! [`PageContent`] variant.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use capsulehaus_core::content::{
    FeatureItemPatch, OptionItemPatch, PageBlock, PageContent,
};
use capsulehaus_core::{BlockId, Money};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::store::content::PageEntry;

/// Page response: ordered blocks plus the typed payload.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    /// Page slug.
    pub slug: String,
    /// Blocks sorted by rank. Disabled blocks are included; hiding them is
    /// the renderer's job.
    pub blocks: Vec<PageBlock>,
    /// Typed page payload, when the page has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<PageContent>,
}

impl PageResponse {
    fn from_entry(slug: &str, entry: PageEntry) -> Self {
        let blocks = entry
            .blocks
            .ordered()
            .into_iter()
            .cloned()
            .collect();
        Self {
            slug: slug.to_owned(),
            blocks,
            content: entry.content,
        }
    }
}

/// Generic success response for block/item mutations.
#[derive(Debug, Serialize)]
pub struct PageMutationResponse {
    /// Always true; failures surface as error statuses.
    pub success: bool,
    /// New enabled value after a toggle, when the block was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Reorder request: block ids in their new display order.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// The new arrangement.
    pub order: Vec<i64>,
}

/// Item create/patch request. Field relevance depends on the page:
/// `icon` applies to home innovations, `price` to additional options.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// Icon name (home innovations).
    #[serde(default)]
    pub icon: Option<String>,
    /// Item title.
    #[serde(default)]
    pub title: Option<String>,
    /// Item description.
    #[serde(default)]
    pub description: Option<String>,
    /// Item price (additional options).
    #[serde(default)]
    pub price: Option<Money>,
}

/// Page blocks + content.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PageResponse>> {
    state
        .stores()
        .content
        .page(&slug)?
        .map(|entry| Json(PageResponse::from_entry(&slug, entry)))
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))
}

/// Replace a page's typed content (admin).
///
/// The payload's tag must match the slug in the path; a `home` payload
/// can not be stored under `contacts`.
#[instrument(skip(_admin, state, content))]
pub async fn set_content(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(content): Json<PageContent>,
) -> Result<Json<PageMutationResponse>> {
    if content.slug() != slug {
        return Err(AppError::BadRequest(format!(
            "Payload is for page '{}', not '{slug}'.",
            content.slug()
        )));
    }

    state.stores().content.set_content(&slug, content)?;
    Ok(Json(PageMutationResponse {
        success: true,
        enabled: None,
    }))
}

/// Apply a drag-reorder arrangement to a page's blocks (admin). No-op
/// when the page is absent.
#[instrument(skip(_admin, state, form))]
pub async fn reorder_blocks(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(form): Json<ReorderRequest>,
) -> Result<Json<PageMutationResponse>> {
    let arrangement: Vec<BlockId> = form.order.iter().copied().map(BlockId::new).collect();
    state.stores().content.reorder_blocks(&slug, &arrangement)?;
    Ok(Json(PageMutationResponse {
        success: true,
        enabled: None,
    }))
}

/// Flip one block's visibility (admin). No-op when the page or block is
/// absent.
#[instrument(skip(_admin, state))]
pub async fn toggle_block(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((slug, id)): Path<(String, i64)>,
) -> Result<Json<PageMutationResponse>> {
    let enabled = state.stores().content.toggle_block(&slug, BlockId::new(id))?;
    Ok(Json(PageMutationResponse {
        success: true,
        enabled,
    }))
}

/// Append an item to the page's list (admin).
#[instrument(skip(_admin, state, form))]
pub async fn add_item(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(form): Json<ItemRequest>,
) -> Result<Json<PageMutationResponse>> {
    let title = form
        .title
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Item title is required.".to_string()))?
        .to_owned();
    let now = chrono::Utc::now();

    let mut handled = false;
    let found = state.stores().content.with_content(&slug, |content| {
        match content {
            PageContent::Home(home) => {
                home.add_innovation(
                    form.icon.clone().unwrap_or_default(),
                    title.clone(),
                    form.description.clone().unwrap_or_default(),
                    now,
                );
                handled = true;
            }
            PageContent::Options(options) => {
                options.add_option(
                    title.clone(),
                    form.description.clone().unwrap_or_default(),
                    form.price.unwrap_or(Money::ZERO),
                    now,
                );
                handled = true;
            }
            PageContent::Contacts(_) => {}
        }
    })?;

    if !found {
        return Err(AppError::NotFound(format!("page {slug}")));
    }
    if !handled {
        return Err(AppError::BadRequest(format!(
            "Page '{slug}' has no item list."
        )));
    }

    Ok(Json(PageMutationResponse {
        success: true,
        enabled: None,
    }))
}

/// Patch the item at `index` (admin). Out-of-range is a no-op.
#[instrument(skip(_admin, state, form))]
pub async fn update_item(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((slug, index)): Path<(String, usize)>,
    Json(form): Json<ItemRequest>,
) -> Result<Json<PageMutationResponse>> {
    let found = state.stores().content.with_content(&slug, |content| {
        match content {
            PageContent::Home(home) => {
                home.update_innovation(
                    index,
                    FeatureItemPatch {
                        icon: form.icon.clone(),
                        title: form.title.clone(),
                        description: form.description.clone(),
                    },
                );
            }
            PageContent::Options(options) => {
                options.update_option(
                    index,
                    OptionItemPatch {
                        title: form.title.clone(),
                        description: form.description.clone(),
                        price: form.price,
                    },
                );
            }
            PageContent::Contacts(_) => {}
        }
    })?;

    if !found {
        return Err(AppError::NotFound(format!("page {slug}")));
    }

    Ok(Json(PageMutationResponse {
        success: true,
        enabled: None,
    }))
}

/// Remove the item at `index` (admin). Out-of-range is a no-op.
#[instrument(skip(_admin, state))]
pub async fn remove_item(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path((slug, index)): Path<(String, usize)>,
) -> Result<Json<PageMutationResponse>> {
    let found = state.stores().content.with_content(&slug, |content| {
        match content {
            PageContent::Home(home) => home.remove_innovation(index),
            PageContent::Options(options) => options.remove_option(index),
            PageContent::Contacts(_) => {}
        }
    })?;

    if !found {
        return Err(AppError::NotFound(format!("page {slug}")));
    }

    Ok(Json(PageMutationResponse {
        success: true,
        enabled: None,
    }))
}
