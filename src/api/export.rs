use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::db::{PersonSortKey, SortOrder};

#[derive(Debug, Deserialize, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
    Pdf,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub sort: PersonSortKey,
    #[serde(default)]
    pub order: SortOrder,
    pub search: Option<String>,
}

/// GET /people/export?format=csv|xlsx|pdf
/// Renders the current (sorted, filtered) listing as a download
pub async fn export_people(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExportQuery>,
) -> Result<axum::response::Response, ApiError> {
    let people = state
        .people
        .list(query.sort, query.order, query.search.as_deref())
        .await?;

    let generated_at = chrono::Utc::now();
    let stamp = generated_at.format("%Y%m%d_%H%M%S");

    let response = match query.format {
        ExportFormat::Csv => {
            let csv = crate::export::people_csv(&people);
            (
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"people_export_{stamp}.csv\""),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        ExportFormat::Xlsx => {
            let bytes = crate::export::people_workbook(&people)?;
            (
                [
                    (
                        header::CONTENT_TYPE,
                        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                            .to_string(),
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"people_export_{stamp}.xlsx\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        ExportFormat::Pdf => {
            let bytes = crate::export::people_pdf(&people, generated_at)?;
            (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"people_export_{stamp}.pdf\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
    };

    Ok(response)
}
