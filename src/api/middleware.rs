//! API middleware
//!
//! Shared application state, the JSON error type, and the authentication
//! gate applied to every mutating/admin route. Auth failures are a uniform
//! `401 { "error": "Unauthorized" }` with no further detail.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::config::Config;
use crate::db::repositories::{
    CarouselRepository, ContactRepository, EventRepository, MembershipRepository, NewsRepository,
    PartnerRepository, ProjectRepository, ResourceRepository,
};
use crate::models::Admin;
use crate::services::AuthService;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: Arc<AuthService>,
    pub partner_repo: Arc<dyn PartnerRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub resource_repo: Arc<dyn ResourceRepository>,
    pub news_repo: Arc<dyn NewsRepository>,
    pub carousel_repo: Arc<dyn CarouselRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub membership_repo: Arc<dyn MembershipRepository>,
}

/// Authenticated admin extracted from the request
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub Admin);

/// JSON API error: a status code plus a flat `{ "error": "..." }` body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Log the underlying error server-side; the client gets a fixed message.
    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{:#}", err), "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Extract the auth token from the `auth-token` cookie or a Bearer header
pub fn extract_token(request: &Request) -> Option<String> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = request.headers().get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(token) = cookie.strip_prefix("auth-token=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Authentication middleware
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&request).ok_or_else(ApiError::unauthorized)?;

    let admin = state
        .auth_service
        .validate_token(&token)
        .await
        .map_err(|e| ApiError::internal(e.into()))?
        .ok_or_else(ApiError::unauthorized)?;

    request.extensions_mut().insert(CurrentAdmin(admin));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    fn request_with_bearer(token: &str) -> Request {
        HttpRequest::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    fn request_with_cookie(token: &str) -> Request {
        HttpRequest::builder()
            .uri("/test")
            .header(header::COOKIE, format!("auth-token={}", token))
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_token_from_bearer() {
        let request = request_with_bearer("tok-123");
        assert_eq!(extract_token(&request), Some("tok-123".to_string()));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let request = request_with_cookie("tok-456");
        assert_eq!(extract_token(&request), Some("tok-456".to_string()));
    }

    #[test]
    fn test_extract_token_from_cookie_among_others() {
        let request = HttpRequest::builder()
            .uri("/test")
            .header(header::COOKIE, "lang=ro; auth-token=tok-789; theme=dark")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&request), Some("tok-789".to_string()));
    }

    #[test]
    fn test_extract_token_bearer_wins_over_cookie() {
        let request = HttpRequest::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, "Bearer bearer-tok")
            .header(header::COOKIE, "auth-token=cookie-tok")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_token(&request), Some("bearer-tok".to_string()));
    }

    #[test]
    fn test_extract_token_none() {
        let request = HttpRequest::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();
        assert!(extract_token(&request).is_none());
    }

    #[test]
    fn test_extract_token_ignores_basic_auth() {
        let request = HttpRequest::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        assert!(extract_token(&request).is_none());
    }

    #[test]
    fn test_api_error_bodies() {
        let err = ApiError::unauthorized();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Unauthorized");

        let err = ApiError::validation("Titlul este obligatoriu");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = ApiError::not_found("Resursa nu a fost găsită");
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
