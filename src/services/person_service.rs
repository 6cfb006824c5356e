//! Domain service for the people registry.

use serde::Deserialize;
use thiserror::Error;

use crate::db::{Person, PersonSortKey, SortOrder};

/// Errors specific to people registry operations.
#[derive(Debug, Error)]
pub enum PersonError {
    #[error("Person not found")]
    PersonNotFound,

    #[error("A person with the name {0} already exists")]
    DuplicateName(String),

    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PersonError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for PersonError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PersonError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Request DTO for creating or editing a person.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonInput {
    pub forename: String,
    pub family_name: String,
    pub gender: String,
    pub year_of_birth: i32,
}

/// Domain service trait for the people registry.
#[async_trait::async_trait]
pub trait PersonService: Send + Sync {
    /// Lists people, optionally filtered by a case-insensitive substring
    /// search over both name fields, ordered by the given sort key.
    async fn list(
        &self,
        sort: PersonSortKey,
        order: SortOrder,
        search: Option<&str>,
    ) -> Result<Vec<Person>, PersonError>;

    /// Gets a single person by ID.
    async fn get(&self, id: i32) -> Result<Person, PersonError>;

    /// Creates a person.
    ///
    /// # Errors
    ///
    /// Returns [`PersonError::DuplicateName`] when another person already
    /// has the same forename and family name (matching is
    /// case-insensitive), or [`PersonError::Validation`] for rejected
    /// field values.
    async fn create(&self, input: PersonInput) -> Result<Person, PersonError>;

    /// Updates all editable fields of a person. The duplicate check
    /// excludes the person being edited.
    async fn update(&self, id: i32, input: PersonInput) -> Result<Person, PersonError>;

    /// Deletes a person by ID.
    async fn delete(&self, id: i32) -> Result<(), PersonError>;

    /// Deletes every listed ID, ignoring ones that no longer exist.
    /// Returns the number of rows removed.
    async fn delete_many(&self, ids: &[i32]) -> Result<u64, PersonError>;
}
