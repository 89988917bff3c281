//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Liveness
//! GET    /health/ready               - Readiness (database reachable)
//!
//! # Catalog
//! GET    /api/products               - Listing (?search=&category=&price=&sort=)
//! GET    /api/products/{id}          - Product detail
//! GET    /api/categories             - Category list
//!
//! # Cart (session-backed)
//! GET    /api/cart                   - Cart with totals
//! GET    /api/cart/count             - Badge count
//! POST   /api/cart/items             - Add one unit
//! PATCH  /api/cart/items/{id}        - Set quantity (<= 0 removes)
//! DELETE /api/cart/items/{id}        - Remove line
//! DELETE /api/cart                   - Clear
//!
//! # Checkout (requires auth)
//! POST   /api/checkout               - Place order from cart
//!
//! # Auth
//! POST   /api/auth/register
//! POST   /api/auth/login
//! POST   /api/auth/logout
//! GET    /api/auth/me
//!
//! # Admin (requires admin)
//! GET    /api/admin/dashboard
//! GET    /api/admin/orders
//! PATCH  /api/admin/orders/{id}
//! GET    /api/admin/products
//! POST   /api/admin/products
//! PATCH  /api/admin/products/{id}
//! DELETE /api/admin/products/{id}
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::from_fn,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::middleware::{
    api_rate_limiter, auth_rate_limiter, create_session_layer, request_id_middleware,
};
use crate::state::AppState;

/// Catalog routes.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(products::categories))
}

/// Cart routes.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/count", get(cart::count))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
}

/// Auth routes. Login and registration are rate limited more strictly.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter())
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Admin routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/orders", get(admin::orders))
        .route("/orders/{id}", patch(admin::update_order))
        .route(
            "/products",
            get(admin::products).post(admin::create_product),
        )
        .route(
            "/products/{id}",
            patch(admin::update_product).delete(admin::delete_product),
        )
}

/// All `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
        .nest("/admin", admin_routes())
        .layer(api_rate_limiter())
        .nest("/auth", auth_routes())
}

/// Build the storefront application over a session store.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check: 503 when the database is unreachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
