//! Domain service for administrative user management.
//!
//! Covers the account roster: listing, creating, deleting, and resetting
//! passwords. The bootstrap admin account is protected from deletion and
//! reset here, not in the handlers.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to user administration.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("User not found")]
    UserNotFound,

    #[error("A user with that username already exists")]
    DuplicateUsername,

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for AdminError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AdminError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// User info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub must_change_password: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Domain service trait for user administration.
#[async_trait::async_trait]
pub trait UserAdminService: Send + Sync {
    /// Lists all accounts ordered by username.
    async fn list_users(&self) -> Result<Vec<UserInfo>, AdminError>;

    /// Creates an account with an immediately usable password.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::DuplicateUsername`] when the username is
    /// already taken (matching is case-insensitive), or
    /// [`AdminError::Validation`] when username or password are rejected.
    async fn create_user(&self, username: &str, password: &str) -> Result<UserInfo, AdminError>;

    /// Deletes an account by ID.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Forbidden`] for the bootstrap admin account.
    async fn delete_user(&self, id: i32) -> Result<(), AdminError>;

    /// Resets an account's password and flags it for rotation, so the
    /// owner must pick a new password at next sign-in.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Forbidden`] for the bootstrap admin account.
    async fn reset_password(&self, id: i32, new_password: &str) -> Result<(), AdminError>;
}
