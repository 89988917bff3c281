//! Session-related types.
//!
//! Types stored in the visitor's session record.

use serde::{Deserialize, Serialize};

use clearsight_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key the shopper's cart lines are persisted under.
    pub const CART: &str = clearsight_core::cart::CART_STORAGE_KEY;
}
