//! Cart route handlers.
//!
//! Every handler opens the session cart, applies at most one mutation, saves
//! it back and returns the resulting view.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use clearsight_core::cart::{CartLineItem, CartSnapshot};
use clearsight_core::{CurrencyCode, Price, ProductId};

use crate::error::{AppError, Result};
use crate::services::cart::{self as session_cart, SessionCartStore};
use crate::state::AppState;

/// Cart line as shown to shoppers.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: Decimal,
    pub price_display: String,
    pub line_total: Decimal,
    pub line_total_display: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        let line_total = line.line_total();
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            image: line.image.clone(),
            quantity: line.quantity.get(),
            price: line.price,
            price_display: line.unit_price().display(),
            line_total,
            line_total_display: Price::new(line_total, CurrencyCode::INR).display(),
        }
    }
}

/// Whole cart with derived totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub total: Decimal,
    pub total_display: String,
}

impl From<&CartSnapshot> for CartView {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            items: snapshot.items.iter().map(CartItemView::from).collect(),
            item_count: snapshot.item_count,
            total: snapshot.total,
            total_display: snapshot.total_price().display(),
        }
    }
}

/// Badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub item_count: u64,
}

/// Add-to-cart body.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
}

/// Set-quantity body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

async fn respond(session: &Session, cart: SessionCartStore) -> Json<CartView> {
    let view = CartView::from(&cart.snapshot());
    session_cart::save(session, cart).await;
    Json(view)
}

/// `GET /api/cart`
pub async fn show(session: Session) -> Json<CartView> {
    Json(CartView::from(&session_cart::load(&session).await.snapshot()))
}

/// `GET /api/cart/count`
pub async fn count(session: Session) -> Json<CartCount> {
    Json(CartCount {
        item_count: session_cart::load(&session).await.item_count(),
    })
}

/// `POST /api/cart/items`
///
/// The product must exist and be active; the cart is not touched otherwise.
#[instrument(skip(state, session), fields(product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .active_product(&body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;
    let candidate = product
        .to_cart_candidate()
        .map_err(|e| AppError::Internal(format!("catalog price rejected by cart: {e}")))?;

    let mut cart = session_cart::load(&session).await;
    cart.add_item(candidate);
    Ok(respond(&session, cart).await)
}

/// `PATCH /api/cart/items/{id}`
///
/// A quantity of zero or less removes the line. Unknown ids leave the cart as is.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateQuantityRequest>,
) -> Json<CartView> {
    let mut cart = session_cart::load(&session).await;
    cart.update_quantity(&id, body.quantity);
    respond(&session, cart).await
}

/// `DELETE /api/cart/items/{id}`
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(id): Path<ProductId>) -> Json<CartView> {
    let mut cart = session_cart::load(&session).await;
    cart.remove_item(&id);
    respond(&session, cart).await
}

/// `DELETE /api/cart`
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Json<CartView> {
    let mut cart = session_cart::load(&session).await;
    cart.clear();
    respond(&session, cart).await
}
