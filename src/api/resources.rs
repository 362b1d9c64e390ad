//! Resource endpoints
//!
//! A resource either points to an external URL or carries stored files, so
//! creation requires at least one of the two.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::common::{none_if_blank, required, IdQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::db::repositories::ResourceFilter;
use crate::models::{CreateResourceInput, Resource, UpdateResourceInput};
use crate::services::slug::unique_slug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesQuery {
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub include_inactive: Option<bool>,
}

/// GET /api/resources
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ListResourcesQuery>,
) -> Result<Json<Vec<Resource>>, ApiError> {
    let resources = state
        .resource_repo
        .list(&ResourceFilter {
            resource_type: query.resource_type,
            include_inactive: query.include_inactive.unwrap_or(false),
        })
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(resources))
}

/// GET /api/resources/{slug}
pub async fn get_resource(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Resource>, ApiError> {
    let resource = state
        .resource_repo
        .get_by_slug(&slug)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Resursa nu a fost găsită"))?;

    Ok(Json(resource))
}

/// POST /api/resources
pub async fn create_resource(
    State(state): State<AppState>,
    Json(input): Json<CreateResourceInput>,
) -> Result<impl IntoResponse, ApiError> {
    let title = required(input.title, "Titlul este obligatoriu")?;
    let description = required(input.description, "Descrierea este obligatorie")?;
    let resource_type = required(input.resource_type, "Tipul resursei este obligatoriu")?;

    let url = input.url.and_then(none_if_blank);
    if url.is_none() && input.files.is_empty() {
        return Err(ApiError::validation(
            "Resursa trebuie să aibă un URL sau cel puțin un fișier",
        ));
    }

    let slug = unique_slug(state.resource_repo.as_ref(), &title, None)
        .await
        .map_err(ApiError::internal)?;

    let now = Utc::now();
    let resource = Resource {
        id: 0,
        title,
        slug,
        description,
        url,
        resource_type,
        is_active: input.is_active.unwrap_or(true),
        created_at: now,
        updated_at: now,
        files: Vec::new(),
    };

    let created = state
        .resource_repo
        .create(&resource, &input.files)
        .await
        .map_err(ApiError::internal)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/resources
pub async fn update_resource(
    State(state): State<AppState>,
    Json(input): Json<UpdateResourceInput>,
) -> Result<Json<Resource>, ApiError> {
    let id = input
        .id
        .ok_or_else(|| ApiError::validation("Id-ul resursei este obligatoriu"))?;

    let mut resource = state
        .resource_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Resursa nu a fost găsită"))?;

    if let Some(title) = input.title {
        if title != resource.title {
            resource.slug = unique_slug(state.resource_repo.as_ref(), &title, Some(id))
                .await
                .map_err(ApiError::internal)?;
        }
        resource.title = title;
    }
    if let Some(description) = input.description {
        resource.description = description;
    }
    // An empty string clears the external URL
    if let Some(url) = input.url {
        resource.url = none_if_blank(url);
    }
    if let Some(resource_type) = input.resource_type {
        resource.resource_type = resource_type;
    }
    if let Some(is_active) = input.is_active {
        resource.is_active = is_active;
    }

    state
        .resource_repo
        .update(&resource, &input.files, &input.files_to_delete)
        .await
        .map_err(ApiError::internal)?;

    let updated = state
        .resource_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Resursa nu a fost găsită"))?;

    Ok(Json(updated))
}

/// DELETE /api/resources?id=
pub async fn delete_resource(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .resource_repo
        .delete(query.id)
        .await
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::not_found("Resursa nu a fost găsită"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
