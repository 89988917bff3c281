//! Clearsight Core - Shared types library.
//!
//! This crate provides the types shared by all Clearsight components:
//! - `storefront` - Public storefront API and admin dashboard
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types, traits and in-memory state - no
//! database access, no HTTP. The cart persists through the [`cart::CartStorage`]
//! trait so that callers decide where the bytes go.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, and order statuses
//! - [`cart`] - The shopping cart state container

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use types::*;
