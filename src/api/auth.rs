use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, MessageResponse};
use crate::constants::session::{MUST_CHANGE_KEY, USER_KEY};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub must_change_password: bool,
}

#[derive(Serialize)]
pub struct CurrentUserResponse {
    pub username: String,
    pub must_change_password: bool,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without a signed-in session.
pub async fn require_session(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match session.get::<String>(USER_KEY).await {
        Ok(Some(user)) => {
            tracing::Span::current().record("user_id", &user);
            Ok(next.run(request).await)
        }
        Ok(None) => Err(ApiError::Unauthorized("Not authenticated".to_string())),
        Err(e) => Err(ApiError::internal(format!("Session error: {e}"))),
    }
}

/// Turns away accounts flagged for rotation until they change their
/// password. The flag lives in the session, so this never touches the
/// database.
pub async fn enforce_password_rotation(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let must_change = session
        .get::<bool>(MUST_CHANGE_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .unwrap_or(false);

    if must_change {
        return Err(ApiError::PasswordChangeRequired);
    }

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with username and password, establishing a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    // Validate input
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state.auth.login(&payload.username, &payload.password).await?;

    // The session carries both the identity and the rotation flag; the
    // stored username keeps the canonical casing from the database.
    session
        .insert(USER_KEY, &user.username)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(MUST_CHANGE_KEY, user.must_change_password)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    tracing::info!("User logged in: {}", user.username);

    Ok(Json(ApiResponse::success(LoginResponse {
        username: user.username,
        must_change_password: user.must_change_password,
    })))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
/// Get the signed-in identity from the session
pub async fn current_user(
    session: Session,
) -> Result<Json<ApiResponse<CurrentUserResponse>>, ApiError> {
    let username = get_session_username(&session).await?;

    let must_change_password = session
        .get::<bool>(MUST_CHANGE_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .unwrap_or(false);

    Ok(Json(ApiResponse::success(CurrentUserResponse {
        username,
        must_change_password,
    })))
}

/// PUT /auth/password
/// Change password (requires current password verification)
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let username = get_session_username(&session).await?;

    state
        .auth
        .change_password(
            &username,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    // The rotation gate reads the session flag, so the successful change
    // must clear it here as well as in the store.
    session
        .insert(MUST_CHANGE_KEY, false)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    tracing::info!("Password changed for user: {username}");

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Password updated successfully".to_string(),
    })))
}

// ============================================================================
// Helpers
// ============================================================================

/// Get username from session, returns error if not authenticated
async fn get_session_username(session: &Session) -> Result<String, ApiError> {
    session
        .get::<String>(USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
}
