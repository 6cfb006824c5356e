//! Domain service for authentication.
//!
//! Handles login and self-service password changes, including the forced
//! rotation handshake after an administrative reset.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Current password is incorrect")]
    CurrentPasswordMismatch,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Authenticated identity as stored in the session. The rotation flag is
/// captured once at login; request handling never re-reads it from the
/// database.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub username: String,
    pub must_change_password: bool,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the session identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AuthError>;

    /// Changes a user's password after re-verifying the current one.
    /// A successful change clears the rotation flag in the store.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::CurrentPasswordMismatch`] if the current
    /// password does not verify, leaving the stored credential untouched,
    /// or [`AuthError::Validation`] if the new password is rejected.
    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
