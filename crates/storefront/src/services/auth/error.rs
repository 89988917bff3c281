//! Account errors.

use thiserror::Error;

use clearsight_core::EmailError;

use super::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::db::RepositoryError;

/// Why registering or signing in failed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("please enter a valid email address")]
    InvalidEmail(#[from] EmailError),

    #[error("password must be at least {min} characters", min = MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    #[error("password must be at most {max} characters", max = MAX_PASSWORD_LENGTH)]
    PasswordTooLong,

    /// Unknown email or wrong password; the two are not distinguished.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    AccountExists,

    #[error("account store error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("password hashing failed")]
    PasswordHash,
}

impl AuthError {
    /// Whether the shopper can fix this by changing what they submitted.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEmail(_) | Self::PasswordTooShort | Self::PasswordTooLong
        )
    }
}
