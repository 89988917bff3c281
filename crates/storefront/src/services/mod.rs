//! Business logic services for the storefront.
//!
//! - `auth` - Email + password accounts
//! - `cart` - Loading and saving the session-backed cart
//! - `checkout` - Placing orders from the cart

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutForm, OrderSink, PlacedOrder};
