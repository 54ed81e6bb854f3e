//! Cart route handlers.
//!
//! The visitor's cart id lives in the session; the cart contents live in
//! the persisted cart store. Line items are snapshots taken from the
//! catalog at add time, so later product edits never change what is
//! already in a cart.

use axum::{Json, extract::State};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use capsulehaus_core::cart::{Cart, CartItem};
use capsulehaus_core::{Money, ProductId};

use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    /// Lines in insertion order.
    pub items: Vec<CartItem>,
    /// Fresh sum of price times quantity.
    pub total_price: Money,
    /// Fresh sum of quantities.
    pub total_quantity: u32,
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        let total_price = cart.total_price();
        let total_quantity = cart.total_quantity();
        Self {
            items: cart.items,
            total_price,
            total_quantity,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart id from the session.
pub(crate) async fn get_cart_id(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::CART_ID)
        .await
        .ok()
        .flatten()
}

/// Get the cart id from the session, creating one on first use.
pub(crate) async fn ensure_cart_id(session: &Session) -> Result<String> {
    if let Some(cart_id) = get_cart_id(session).await {
        return Ok(cart_id);
    }

    let cart_id = format!("cart_{:016x}", rand::rng().random::<u64>());
    session
        .insert(session_keys::CART_ID, &cart_id)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(cart_id)
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    /// Product to add.
    pub product_id: i64,
}

/// Update quantity request. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    /// Product line to update.
    pub product_id: i64,
    /// New quantity, set directly (not an increment).
    pub quantity: i64,
}

/// Remove line request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    /// Product line to remove.
    pub product_id: i64,
}

/// Current cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = match get_cart_id(&session).await {
        Some(cart_id) => state.stores().carts.get(&cart_id)?,
        None => Cart::new(),
    };
    Ok(Json(CartView::from(cart)))
}

/// Add a product to the cart (merge-by-id).
///
/// The snapshot is taken from the catalog here; adding an id already in
/// the cart increments its quantity and keeps the original snapshot.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .stores()
        .products
        .get(ProductId::new(form.product_id))?
        .ok_or_else(|| AppError::BadRequest("Unknown product.".to_string()))?;

    let snapshot = CartItem {
        product_id: product.id,
        name: product.name,
        price: product.price,
        quantity: 1,
        dimensions: Some(product.dimensions),
        guests: Some(product.guests),
        image: product.images.into_iter().next(),
    };

    let cart_id = ensure_cart_id(&session).await?;
    let cart = state.stores().carts.add_item(&cart_id, snapshot)?;
    Ok(Json(CartView::from(cart)))
}

/// Set a line's quantity. Zero or negative removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let cart_id = ensure_cart_id(&session).await?;
    let cart = state.stores().carts.update_quantity(
        &cart_id,
        ProductId::new(form.product_id),
        form.quantity,
    )?;
    Ok(Json(CartView::from(cart)))
}

/// Remove a line. No-op when absent.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let cart_id = ensure_cart_id(&session).await?;
    let cart = state
        .stores()
        .carts
        .remove_item(&cart_id, ProductId::new(form.product_id))?;
    Ok(Json(CartView::from(cart)))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    if let Some(cart_id) = get_cart_id(&session).await {
        state.stores().carts.clear(&cart_id)?;
    }
    Ok(Json(CartView::from(Cart::new())))
}
