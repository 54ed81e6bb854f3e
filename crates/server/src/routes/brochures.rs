//! Brochure route handlers.
//!
//! Pure CRUD over PDF brochure records; nothing here couples to products
//! or orders.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;

use capsulehaus_core::brochure::Brochure;
use capsulehaus_core::BrochureId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;
use crate::store::brochures::{BrochurePatch, NewBrochure};

/// Brochure list response.
#[derive(Debug, Serialize)]
pub struct BrochureListResponse {
    /// All brochures.
    pub brochures: Vec<Brochure>,
}

/// Mutation response carrying the affected brochure when it exists.
#[derive(Debug, Serialize)]
pub struct BrochureMutationResponse {
    /// Always true; failures surface as error statuses.
    pub success: bool,
    /// The affected brochure, when the id was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brochure: Option<Brochure>,
}

/// Public brochure list.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<BrochureListResponse>> {
    let brochures = state.stores().brochures.all()?;
    Ok(Json(BrochureListResponse { brochures }))
}

/// Create a brochure (admin).
#[instrument(skip(_admin, state, new))]
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(new): Json<NewBrochure>,
) -> Result<(StatusCode, Json<Brochure>)> {
    if new.title.trim().is_empty() {
        return Err(AppError::BadRequest("Brochure title is required.".to_string()));
    }

    let brochure = state.stores().brochures.create(new, chrono::Utc::now())?;
    tracing::info!(brochure_id = %brochure.id, title = %brochure.title, "Brochure created");
    Ok((StatusCode::CREATED, Json(brochure)))
}

/// Edit a brochure (admin). No-op when the id is absent.
#[instrument(skip(_admin, state, patch))]
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<BrochurePatch>,
) -> Result<Json<BrochureMutationResponse>> {
    let brochure = state.stores().brochures.update(BrochureId::new(id), patch)?;
    Ok(Json(BrochureMutationResponse {
        success: true,
        brochure,
    }))
}

/// Delete a brochure (admin). No-op when the id is absent.
#[instrument(skip(_admin, state))]
pub async fn destroy(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BrochureMutationResponse>> {
    state.stores().brochures.delete(BrochureId::new(id))?;
    Ok(Json(BrochureMutationResponse {
        success: true,
        brochure: None,
    }))
}
