use serde::Serialize;

use crate::db::Person;
use crate::services::{DuplicateRow, ImportReport, RowError};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field: None,
        }
    }

    pub fn error_for_field(message: impl Into<String>, field: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            field,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PersonDto {
    pub id: i32,
    pub forename: String,
    pub family_name: String,
    pub gender: String,
    pub year_of_birth: i32,
}

impl From<Person> for PersonDto {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            forename: person.forename,
            family_name: person.family_name,
            gender: person.gender,
            year_of_birth: person.year_of_birth,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportReportDto {
    pub success_count: usize,
    pub errors: Vec<RowError>,
    pub duplicates: Vec<DuplicateRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates_summary: Option<String>,
}

impl From<ImportReport> for ImportReportDto {
    fn from(report: ImportReport) -> Self {
        let duplicates_summary = report.duplicate_summary();
        Self {
            success_count: report.success_count,
            errors: report.errors,
            duplicates: report.duplicates,
            duplicates_summary,
        }
    }
}
