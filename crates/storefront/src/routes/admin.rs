//! Admin dashboard route handlers.
//!
//! All handlers require [`RequireAdmin`]. Product writes invalidate the
//! catalog cache.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use clearsight_core::{CurrencyCode, OrderId, OrderStatus, Price, ProductId};

use crate::db::{OrderRepository, ProductRepository};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{DashboardStats, NewProduct, Order, OrderLine, Product};
use crate::state::AppState;

/// Dashboard numbers with the revenue preformatted.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub total_revenue_display: String,
}

/// An order with its lines.
#[derive(Debug, Serialize)]
pub struct AdminOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub reference: String,
    pub lines: Vec<OrderLine>,
}

/// Status change body.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: OrderStatus,
}

/// Visibility change body.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub is_active: bool,
}

/// `GET /api/admin/dashboard`
#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<DashboardView>> {
    let stats = OrderRepository::new(state.pool()).stats().await?;
    Ok(Json(DashboardView {
        total_revenue_display: Price::new(stats.total_revenue, CurrencyCode::INR).display(),
        stats,
    }))
}

/// `GET /api/admin/orders`
#[instrument(skip_all)]
pub async fn orders(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<AdminOrderView>>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list_all().await?;
    let ids: Vec<OrderId> = orders.iter().map(|o| o.id.clone()).collect();
    let mut lines: HashMap<OrderId, Vec<OrderLine>> = repo.lines_for(&ids).await?;

    Ok(Json(
        orders
            .into_iter()
            .map(|order| AdminOrderView {
                reference: order.id.short_ref().to_owned(),
                lines: lines.remove(&order.id).unwrap_or_default(),
                order,
            })
            .collect(),
    ))
}

/// `PATCH /api/admin/orders/{id}`
#[instrument(skip(state, admin), fields(admin = %admin.email))]
pub async fn update_order(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_status(&id, body.status)
        .await?;
    info!(order_id = %order.id, status = %order.status, "order status updated");
    Ok(Json(order))
}

/// `GET /api/admin/products`
#[instrument(skip_all)]
pub async fn products(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(ProductRepository::new(state.pool()).list_all().await?))
}

/// `POST /api/admin/products`
#[instrument(skip_all, fields(admin = %admin.email))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = body.validate()?;
    let created = ProductRepository::new(state.pool()).create(&product).await?;
    state.catalog().invalidate_all().await;

    info!(product_id = %created.id, "product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PATCH /api/admin/products/{id}`
#[instrument(skip(state, admin), fields(admin = %admin.email))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .set_active(&id, body.is_active)
        .await?;
    state.catalog().invalidate_all().await;
    Ok(Json(product))
}

/// `DELETE /api/admin/products/{id}`
#[instrument(skip(state, admin), fields(admin = %admin.email))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool()).delete(&id).await?;
    state.catalog().invalidate_all().await;

    info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
