//! Contact form endpoints
//!
//! The POST is public (the site's contact form); listing, read-flag updates
//! and deletion are admin operations.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::common::{is_valid_email, required, IdQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{ContactSubmission, CreateContactInput, UpdateContactInput};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactQuery {
    pub is_read: Option<bool>,
}

/// POST /api/contact (public)
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(input): Json<CreateContactInput>,
) -> Result<impl IntoResponse, ApiError> {
    let name = required(input.name, "Numele este obligatoriu")?;
    let email = required(input.email, "Adresa de email este obligatorie")?;
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Adresa de email nu este validă"));
    }
    let subject = required(input.subject, "Subiectul este obligatoriu")?;
    let message = required(input.message, "Mesajul este obligatoriu")?;

    let submission = ContactSubmission {
        id: 0,
        name,
        email,
        subject,
        message,
        is_read: false,
        created_at: Utc::now(),
    };

    let created = state
        .contact_repo
        .create(&submission)
        .await
        .map_err(ApiError::internal)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/contact (admin)
pub async fn list_contact(
    State(state): State<AppState>,
    Query(query): Query<ListContactQuery>,
) -> Result<Json<Vec<ContactSubmission>>, ApiError> {
    let submissions = state
        .contact_repo
        .list(query.is_read)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(submissions))
}

/// PUT /api/contact (admin) — toggle the read flag
pub async fn update_contact(
    State(state): State<AppState>,
    Json(input): Json<UpdateContactInput>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = input
        .id
        .ok_or_else(|| ApiError::validation("Id-ul mesajului este obligatoriu"))?;

    let updated = state
        .contact_repo
        .set_read(id, input.is_read.unwrap_or(true))
        .await
        .map_err(ApiError::internal)?;

    if !updated {
        return Err(ApiError::not_found("Mesajul nu a fost găsit"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/contact?id= (admin)
pub async fn delete_contact(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .contact_repo
        .delete(query.id)
        .await
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::not_found("Mesajul nu a fost găsit"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
