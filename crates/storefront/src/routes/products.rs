//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use clearsight_core::{CurrencyCode, Price, ProductId};

use crate::catalog::ProductQuery;
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::state::AppState;

/// Product as shown to shoppers.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub price_display: String,
    pub original_price: Option<Decimal>,
    pub original_price_display: Option<String>,
    pub discount_percent: Option<u32>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub image: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            price_display: Price::new(product.price, CurrencyCode::INR).display(),
            original_price: product.original_price,
            original_price_display: product
                .original_price
                .map(|p| Price::new(p, CurrencyCode::INR).display()),
            discount_percent: product.discount_percent(),
            description: product.description.clone(),
            features: product.features.clone(),
            image: product.display_image().to_owned(),
        }
    }
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = state.catalog().search(&query).await?;
    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = state
        .catalog()
        .active_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(ProductView::from(&product)))
}

/// `GET /api/categories`
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    Ok(Json(state.catalog().categories().await?))
}
