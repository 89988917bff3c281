//! Clearsight storefront library.
//!
//! JSON API over the product catalog, the session-backed cart, checkout,
//! accounts and the admin dashboard. The binary in `main.rs` wires this
//! router to Postgres, sessions and Sentry.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
