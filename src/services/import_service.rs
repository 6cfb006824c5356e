//! Domain service for bulk imports.
//!
//! Imports are line-oriented text: one record per line, fields separated
//! by commas, line numbers reported 1-indexed. Rows are classified
//! independently as committed, duplicate, or error, and the good rows are
//! committed even when others fail.

use serde::Serialize;
use thiserror::Error;

use crate::constants::import::MAX_DUPLICATES_SHOWN;

/// Errors specific to the import process. Per-row problems never surface
/// here; they are collected into the [`ImportReport`] instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ImportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A row that could not be parsed or validated.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    /// Raw line content as received.
    pub line: String,
    pub error: String,
    pub line_number: usize,
}

/// A row skipped because its identity already exists, either in the
/// store or earlier in the same batch.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateRow {
    pub identity: String,
    pub line_number: usize,
    pub attempted_at: String,
}

/// Outcome of one import run.
#[derive(Debug, Default, Serialize)]
pub struct ImportReport {
    pub success_count: usize,
    pub errors: Vec<RowError>,
    pub duplicates: Vec<DuplicateRow>,
}

impl ImportReport {
    /// Human-readable duplicate listing, capped at
    /// [`MAX_DUPLICATES_SHOWN`] entries with a trailing count of the rest.
    #[must_use]
    pub fn duplicate_summary(&self) -> Option<String> {
        if self.duplicates.is_empty() {
            return None;
        }

        let shown: Vec<String> = self
            .duplicates
            .iter()
            .take(MAX_DUPLICATES_SHOWN)
            .map(|d| format!("{} (line {})", d.identity, d.line_number))
            .collect();

        let mut summary = shown.join(", ");
        let remaining = self.duplicates.len().saturating_sub(MAX_DUPLICATES_SHOWN);
        if remaining > 0 {
            summary.push_str(&format!(", and {remaining} more..."));
        }

        Some(summary)
    }
}

/// Domain service trait for bulk imports.
#[async_trait::async_trait]
pub trait ImportService: Send + Sync {
    /// Imports user accounts from `Username,Password` lines.
    ///
    /// Blank lines are skipped silently. Duplicate usernames are never
    /// errors; they are reported separately. Every valid, non-duplicate
    /// row is committed regardless of failures elsewhere in the batch.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Validation`] when the payload is empty.
    async fn import_users(&self, payload: &str) -> Result<ImportReport, ImportError>;

    /// Imports people from `Forename,FamilyName,Gender,YearOfBirth`
    /// lines. The first line is treated as a column header and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Validation`] when the payload is empty.
    async fn import_people(&self, payload: &str) -> Result<ImportReport, ImportError>;
}
