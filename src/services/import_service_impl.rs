//! Line-oriented import pipeline backed by the store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::task;

use crate::constants::people;
use crate::db::repositories::user::hash_password;
use crate::db::{NewPerson, NewUser, Store};
use crate::policy;
use crate::services::import_service::{
    DuplicateRow, ImportError, ImportReport, ImportService, RowError,
};

pub struct DefaultImportService {
    store: Store,
}

impl DefaultImportService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn row_error(raw: &str, error: impl Into<String>, line_number: usize) -> RowError {
    RowError {
        line: raw.to_string(),
        error: error.into(),
        line_number,
    }
}

#[async_trait]
impl ImportService for DefaultImportService {
    async fn import_users(&self, payload: &str) -> Result<ImportReport, ImportError> {
        if payload.trim().is_empty() {
            return Err(ImportError::Validation("Import file is empty".to_string()));
        }

        let attempted_at = chrono::Utc::now().to_rfc3339();
        let mut report = ImportReport::default();
        let mut staged: Vec<(String, String, usize)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (idx, raw) in payload.lines().enumerate() {
            let line_number = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 2 {
                report.errors.push(row_error(
                    raw,
                    "Invalid format - expected Username,Password",
                    line_number,
                ));
                continue;
            }

            let username = fields[0].trim();
            let password = fields[1].trim();

            if username.is_empty() {
                report
                    .errors
                    .push(row_error(raw, "Username cannot be empty", line_number));
                continue;
            }

            if !policy::is_strong(password) {
                report.errors.push(row_error(
                    raw,
                    "Password does not meet requirements",
                    line_number,
                ));
                continue;
            }

            // Duplicates are an expected outcome, not errors: a username
            // already committed or already staged earlier in this batch
            // skips the row and records it.
            let key = username.to_lowercase();
            if seen.contains(&key) || self.store.username_exists(username).await? {
                report.duplicates.push(DuplicateRow {
                    identity: username.to_string(),
                    line_number,
                    attempted_at: attempted_at.clone(),
                });
                continue;
            }

            seen.insert(key);
            staged.push((username.to_string(), password.to_string(), line_number));
        }

        if staged.is_empty() {
            return Ok(report);
        }

        let mut line_numbers: HashMap<String, usize> = HashMap::new();
        for (username, _, line_number) in &staged {
            line_numbers.insert(username.to_lowercase(), *line_number);
        }

        // Argon2 hashing is CPU-bound; hash the whole batch off the
        // async runtime before committing.
        let rows = task::spawn_blocking(move || {
            staged
                .into_iter()
                .map(|(username, password, _)| {
                    Ok(NewUser {
                        username,
                        password_hash: hash_password(&password)?,
                    })
                })
                .collect::<anyhow::Result<Vec<NewUser>>>()
        })
        .await
        .map_err(|e| ImportError::Internal(format!("Hashing task panicked: {e}")))??;

        let staged_count = rows.len();
        let skipped = self.store.import_users(rows).await?;

        report.success_count = staged_count - skipped.len();
        for username in skipped {
            let line_number = line_numbers
                .get(&username.to_lowercase())
                .copied()
                .unwrap_or_default();
            report.duplicates.push(DuplicateRow {
                identity: username,
                line_number,
                attempted_at: attempted_at.clone(),
            });
        }
        report.duplicates.sort_by_key(|d| d.line_number);

        Ok(report)
    }

    async fn import_people(&self, payload: &str) -> Result<ImportReport, ImportError> {
        if payload.trim().is_empty() {
            return Err(ImportError::Validation("Import file is empty".to_string()));
        }

        let attempted_at = chrono::Utc::now().to_rfc3339();
        let mut report = ImportReport::default();
        let mut staged: Vec<(NewPerson, usize)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (idx, raw) in payload.lines().enumerate() {
            let line_number = idx + 1;
            // Line 1 carries the column header.
            if line_number == 1 {
                continue;
            }

            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != 4 {
                report.errors.push(row_error(
                    raw,
                    "Invalid format - expected Forename,FamilyName,Gender,YearOfBirth",
                    line_number,
                ));
                continue;
            }

            let forename = fields[0].trim();
            let family_name = fields[1].trim();
            let gender = fields[2].trim();
            let year_field = fields[3].trim();

            if forename.is_empty() {
                report
                    .errors
                    .push(row_error(raw, "Forename cannot be empty", line_number));
                continue;
            }

            if family_name.is_empty() {
                report
                    .errors
                    .push(row_error(raw, "Family name cannot be empty", line_number));
                continue;
            }

            let Ok(year_of_birth) = year_field.parse::<i32>() else {
                report
                    .errors
                    .push(row_error(raw, "Invalid year of birth", line_number));
                continue;
            };

            if !(people::MIN_YEAR_OF_BIRTH..=people::MAX_YEAR_OF_BIRTH).contains(&year_of_birth) {
                report.errors.push(row_error(
                    raw,
                    format!(
                        "Year of birth must be between {} and {}",
                        people::MIN_YEAR_OF_BIRTH,
                        people::MAX_YEAR_OF_BIRTH
                    ),
                    line_number,
                ));
                continue;
            }

            let row = NewPerson {
                forename: forename.to_string(),
                family_name: family_name.to_string(),
                gender: gender.to_string(),
                year_of_birth,
            };

            let key = row.identity().to_lowercase();
            if seen.contains(&key)
                || self
                    .store
                    .person_name_exists(forename, family_name, None)
                    .await?
            {
                report.duplicates.push(DuplicateRow {
                    identity: row.identity(),
                    line_number,
                    attempted_at: attempted_at.clone(),
                });
                continue;
            }

            seen.insert(key);
            staged.push((row, line_number));
        }

        if staged.is_empty() {
            return Ok(report);
        }

        let mut line_numbers: HashMap<String, usize> = HashMap::new();
        for (row, line_number) in &staged {
            line_numbers.insert(row.identity().to_lowercase(), *line_number);
        }

        let rows: Vec<NewPerson> = staged.into_iter().map(|(row, _)| row).collect();
        let staged_count = rows.len();
        let skipped = self.store.import_people(rows).await?;

        report.success_count = staged_count - skipped.len();
        for identity in skipped {
            let line_number = line_numbers
                .get(&identity.to_lowercase())
                .copied()
                .unwrap_or_default();
            report.duplicates.push(DuplicateRow {
                identity,
                line_number,
                attempted_at: attempted_at.clone(),
            });
        }
        report.duplicates.sort_by_key(|d| d.line_number);

        Ok(report)
    }
}
