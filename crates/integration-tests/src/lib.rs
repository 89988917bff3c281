//! Integration test harness for the Clearsight storefront.
//!
//! HTTP tests drive the real router with `tower::ServiceExt::oneshot`. The
//! session store is in memory and the Postgres pool connects lazily, so
//! routes that never reach the database run without one.
//!
//! Tests marked `#[ignore = "Requires database"]` use [`TestApp::with_database`]
//! and need a migrated Postgres at `TEST_DATABASE_URL`:
//!
//! ```bash
//! cargo test -p clearsight-integration-tests
//! TEST_DATABASE_URL=postgres://localhost/clearsight_test \
//!     cargo test -p clearsight-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::cookie::time::{Duration as CookieDuration, OffsetDateTime};
use tower_sessions::session::{Id, Record};
use tower_sessions::{MemoryStore, SessionStore};

use clearsight_core::cart::{CartLineItem, encode_items};
use clearsight_core::{Email, ProductId, UserId};
use clearsight_storefront::config::StorefrontConfig;
use clearsight_storefront::middleware::session::SESSION_COOKIE_NAME;
use clearsight_storefront::models::{CurrentUser, session_keys};
use clearsight_storefront::state::AppState;

/// Email configured as the only admin in [`TestApp`].
pub const ADMIN_EMAIL: &str = "admin@clearsight.example";

/// Client address sent with every request; the rate limiter keys on it.
const CLIENT_IP: &str = "203.0.113.7";

/// Router plus the session store and pool behind it.
pub struct TestApp {
    pub router: Router,
    pub sessions: MemoryStore,
    pub pool: PgPool,
}

/// Configuration pointing at an unreachable database.
///
/// # Panics
///
/// Panics if the hard-coded values fail to parse.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://clearsight@127.0.0.1:1/clearsight_test"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:3000".to_owned(),
        session_secret: SecretString::from("k7Qz2vX9mPq4Lr8tW1nB6yH3jF5dS0aC"),
        admin_emails: vec![Email::parse(ADMIN_EMAIL).unwrap()],
        catalog_cache_ttl: Duration::from_secs(60),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

impl TestApp {
    /// Build the storefront router over fresh in-memory sessions.
    ///
    /// # Panics
    ///
    /// Panics if the lazy pool cannot be configured.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn new() -> Self {
        let config = test_config();
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(secrecy::ExposeSecret::expose_secret(&config.database_url))
            .unwrap();
        Self::build(config, pool)
    }

    /// Build the router over the database named by `TEST_DATABASE_URL`,
    /// applying the storefront migrations first.
    ///
    /// # Panics
    ///
    /// Panics if the variable is unset or the database is unreachable.
    #[allow(clippy::unwrap_used, clippy::expect_used)]
    pub async fn with_database() -> Self {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .unwrap();
        sqlx::migrate!("../storefront/migrations")
            .run(&pool)
            .await
            .unwrap();

        let mut config = test_config();
        config.database_url = SecretString::from(url);
        Self::build(config, pool)
    }

    fn build(config: StorefrontConfig, pool: PgPool) -> Self {
        let sessions = MemoryStore::default();
        let router =
            clearsight_storefront::app(AppState::new(config, pool.clone()), sessions.clone());
        Self {
            router,
            sessions,
            pool,
        }
    }

    /// Create a session holding `cart` and, optionally, a logged-in user.
    /// Returns the `Cookie` header value for it.
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be stored.
    #[allow(clippy::unwrap_used)]
    pub async fn session_with(&self, cart: &[CartLineItem], user: Option<&CurrentUser>) -> String {
        let mut data = HashMap::new();
        data.insert(
            session_keys::CART.to_owned(),
            serde_json::Value::String(encode_items(cart).unwrap()),
        );
        if let Some(user) = user {
            data.insert(
                session_keys::CURRENT_USER.to_owned(),
                serde_json::to_value(user).unwrap(),
            );
        }
        let mut record = Record {
            id: Id::default(),
            data,
            expiry_date: OffsetDateTime::now_utc() + CookieDuration::days(1),
        };
        self.sessions.create(&mut record).await.unwrap();
        format!("{SESSION_COOKIE_NAME}={}", record.id)
    }

    /// Send one request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router errors.
    #[allow(clippy::unwrap_used)]
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", CLIENT_IP);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
#[allow(clippy::unwrap_used)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A cart line with the given quantity.
///
/// # Panics
///
/// Panics on an empty id or zero quantity.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn line(id: &str, name: &str, price: i64, quantity: u32) -> CartLineItem {
    CartLineItem {
        id: ProductId::parse(id).unwrap(),
        name: name.to_owned(),
        price: Decimal::new(price, 0),
        image: "👓".to_owned(),
        quantity: NonZeroU32::new(quantity).unwrap(),
    }
}

/// A session user.
///
/// # Panics
///
/// Panics on an invalid email.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn user(id: &str, email: &str) -> CurrentUser {
    CurrentUser {
        id: UserId::parse(id).unwrap(),
        email: Email::parse(email).unwrap(),
    }
}
