//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from database
//! row types.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{DashboardStats, NewOrder, NewOrderLine, Order, OrderLine};
pub use product::{NewProduct, Product, ProductValidationError};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
