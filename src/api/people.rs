use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ImportReportDto, MessageResponse, PersonDto};
use crate::db::{PersonSortKey, SortOrder};
use crate::services::PersonInput;

#[derive(Debug, Deserialize)]
pub struct PeopleQuery {
    #[serde(default)]
    pub sort: PersonSortKey,
    #[serde(default)]
    pub order: SortOrder,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeletePeopleRequest {
    pub ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleteResponse {
    pub removed: u64,
}

/// GET /people
pub async fn list_people(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PeopleQuery>,
) -> Result<Json<ApiResponse<Vec<PersonDto>>>, ApiError> {
    let people = state
        .people
        .list(query.sort, query.order, query.search.as_deref())
        .await?;

    let dtos: Vec<PersonDto> = people.into_iter().map(PersonDto::from).collect();

    Ok(Json(ApiResponse::success(dtos)))
}

/// GET /people/{id}
pub async fn get_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<PersonDto>>, ApiError> {
    let person = state.people.get(id).await?;
    Ok(Json(ApiResponse::success(PersonDto::from(person))))
}

/// POST /people
pub async fn create_person(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PersonInput>,
) -> Result<Json<ApiResponse<PersonDto>>, ApiError> {
    let person = state.people.create(payload).await?;

    tracing::info!("Person created: {} {}", person.forename, person.family_name);

    Ok(Json(ApiResponse::success(PersonDto::from(person))))
}

/// PUT /people/{id}
pub async fn update_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<PersonInput>,
) -> Result<Json<ApiResponse<PersonDto>>, ApiError> {
    let person = state.people.update(id, payload).await?;
    Ok(Json(ApiResponse::success(PersonDto::from(person))))
}

/// DELETE /people/{id}
pub async fn delete_person(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.people.delete(id).await?;

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Person deleted".to_string(),
    })))
}

/// POST /people/delete
/// Bulk delete by id selection; missing ids are ignored
pub async fn delete_people(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeletePeopleRequest>,
) -> Result<Json<ApiResponse<BulkDeleteResponse>>, ApiError> {
    let removed = state.people.delete_many(&payload.ids).await?;

    tracing::info!("Bulk delete removed {removed} people");

    Ok(Json(ApiResponse::success(BulkDeleteResponse { removed })))
}

/// POST /people/import
/// Body is the raw header + `Forename,FamilyName,Gender,YearOfBirth` payload
pub async fn import_people(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ApiResponse<ImportReportDto>>, ApiError> {
    let report = state.imports.import_people(&body).await?;

    tracing::info!(
        imported = report.success_count,
        errors = report.errors.len(),
        duplicates = report.duplicates.len(),
        "Person import finished"
    );

    Ok(Json(ApiResponse::success(ImportReportDto::from(report))))
}
