use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ImportReportDto, MessageResponse};
use crate::services::UserInfo;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserInfo>>>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = state
        .users
        .create_user(&payload.username, &payload.password)
        .await?;

    tracing::info!("User created: {}", user.username);

    Ok(Json(ApiResponse::success(user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.users.delete_user(id).await?;

    tracing::info!("User deleted: {id}");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "User deleted".to_string(),
    })))
}

/// PUT /users/{id}/password
/// Admin reset: the account must pick a new password at next sign-in
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.users.reset_password(id, &payload.new_password).await?;

    tracing::info!("Password reset for user: {id}");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password reset successfully. User must change password at next login."
            .to_string(),
    })))
}

/// POST /users/import
/// Body is the raw `Username,Password` line payload
pub async fn import_users(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<ApiResponse<ImportReportDto>>, ApiError> {
    let report = state.imports.import_users(&body).await?;

    tracing::info!(
        imported = report.success_count,
        errors = report.errors.len(),
        duplicates = report.duplicates.len(),
        "User import finished"
    );

    Ok(Json(ApiResponse::success(ImportReportDto::from(report))))
}
