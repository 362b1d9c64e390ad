//! Authentication endpoints
//!
//! - POST /api/auth/login — email/password login, sets the `auth-token` cookie
//! - POST /api/auth/logout — deletes the session and clears the cookie
//! - GET /api/auth/session — current admin (requires the auth gate)

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use crate::api::middleware::{extract_token, ApiError, AppState, CurrentAdmin};
use crate::models::AdminInfo;
use crate::services::AuthServiceError;

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn auth_cookie(token: &str, max_age_secs: i64) -> Result<HeaderValue, ApiError> {
    let cookie = format!(
        "auth-token={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        token, max_age_secs
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::internal(anyhow::anyhow!("Invalid cookie value: {}", e)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = body
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Email și parolă sunt obligatorii"))?;
    let password = body
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("Email și parolă sunt obligatorii"))?;

    let (admin, token) = state
        .auth_service
        .login(&email, &password)
        .await
        .map_err(|e| match e {
            AuthServiceError::AuthenticationError(_) => ApiError {
                status: axum::http::StatusCode::UNAUTHORIZED,
                message: "Email sau parolă incorecte".to_string(),
            },
            AuthServiceError::InternalError(err) => ApiError::internal(err),
        })?;

    let max_age = state.config.auth.session_days * 24 * 60 * 60;
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, auth_cookie(&token, max_age)?);

    Ok((headers, Json(AdminInfo::from(&admin))))
}

/// POST /api/auth/logout
///
/// Always succeeds; a missing or invalid token just clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = extract_token(&request) {
        state
            .auth_service
            .logout(&token)
            .await
            .map_err(|e| ApiError::internal(e.into()))?;
    }

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, auth_cookie("", 0)?);

    Ok((headers, Json(serde_json::json!({ "success": true }))))
}

/// GET /api/auth/session
pub async fn session(
    Extension(CurrentAdmin(admin)): Extension<CurrentAdmin>,
) -> Json<AdminInfo> {
    Json(AdminInfo::from(&admin))
}
