//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Login and registration body.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The logged-in user, as returned to the client.
#[derive(Debug, Serialize)]
pub struct Me {
    pub user: Option<CurrentUser>,
    pub is_admin: bool,
}

async fn start_session(state: &AppState, session: &Session, user: User) -> Result<Json<Me>> {
    let current = CurrentUser {
        id: user.id,
        email: user.email,
    };
    set_current_user(session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));

    Ok(Json(Me {
        is_admin: state.config().is_admin(&current.email),
        user: Some(current),
    }))
}

/// `POST /api/auth/register`
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Credentials>,
) -> Result<(StatusCode, Json<Me>)> {
    let user = AuthService::new(state.pool())
        .register(&body.email, &body.password)
        .await?;
    info!(user_id = %user.id, "user registered");

    let me = start_session(&state, &session, user).await?;
    Ok((StatusCode::CREATED, me))
}

/// `POST /api/auth/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<Credentials>,
) -> Result<Json<Me>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;
    info!(user_id = %user.id, "user logged in");

    start_session(&state, &session, user).await
}

/// `POST /api/auth/logout`
///
/// Forgets the user but keeps the session's cart.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`
pub async fn me(State(state): State<AppState>, OptionalAuth(user): OptionalAuth) -> Json<Me> {
    let is_admin = user
        .as_ref()
        .is_some_and(|u| state.config().is_admin(&u.email));
    Json(Me { user, is_admin })
}
