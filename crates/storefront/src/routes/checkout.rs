//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::cart as session_cart;
use crate::services::checkout::{self, CheckoutForm, PlacedOrder};
use crate::state::AppState;

/// `POST /api/checkout`
///
/// On success the cleared cart is saved back to the session. On failure the
/// session cart is left as it was.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<PlacedOrder>)> {
    let mut cart = session_cart::load(&session).await;
    let orders = OrderRepository::new(state.pool());

    let placed = checkout::submit(&mut cart, &user, form, &orders).await?;
    session_cart::save(&session, cart).await;

    Ok((StatusCode::CREATED, Json(placed)))
}
