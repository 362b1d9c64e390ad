//! Resource download helper
//!
//! GET /api/files/{slug} resolves a resource and sends the caller to its
//! content: a 307 redirect when there is a single target (the external URL,
//! one attached file, or the file picked with `?file=N`), or a JSON index
//! when several files are attached.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    /// Zero-based index into the resource's file list
    pub file: Option<usize>,
}

/// GET /api/files/{slug}
pub async fn download_resource(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<FileQuery>,
) -> Result<Response, ApiError> {
    let resource = state
        .resource_repo
        .get_by_slug(&slug)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Resursa nu a fost găsită"))?;

    if let Some(index) = query.file {
        let file = resource
            .files
            .get(index)
            .ok_or_else(|| ApiError::not_found("Fișierul nu a fost găsit"))?;
        return Ok(Redirect::temporary(&file.file_url).into_response());
    }

    match resource.files.len() {
        0 => {
            let url = resource
                .url
                .as_deref()
                .ok_or_else(|| ApiError::not_found("Resursa nu are fișiere atașate"))?;
            Ok(Redirect::temporary(url).into_response())
        }
        1 => Ok(Redirect::temporary(&resource.files[0].file_url).into_response()),
        _ => Ok(Json(serde_json::json!({
            "title": resource.title,
            "slug": resource.slug,
            "files": resource.files,
        }))
        .into_response()),
    }
}
