//! File upload endpoint
//!
//! POST /api/upload (auth required), multipart/form-data with a `file` field
//! and an optional `type` field (partner|event|project|resource|general,
//! default general). Resource uploads additionally accept document MIME
//! types with a larger cap; everything else is images only. Files are stored
//! under `<upload_dir>/<type>/<uuid>.<ext>` and served at `/uploads/...`.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tokio::fs;
use uuid::Uuid;

use crate::api::middleware::{ApiError, AppState};

const IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
    "application/zip",
];

const UPLOAD_TYPES: &[&str] = &["partner", "event", "project", "resource", "general"];

/// Response for a successful upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub original_name: String,
    pub size: u64,
    pub mime_type: String,
}

/// POST /api/upload
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload_type = "general".to_string();
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::validation(format!("Cererea multipart nu a putut fi citită: {}", e))
    })? {
        match field.name().unwrap_or("") {
            "type" => {
                upload_type = field.text().await.map_err(|e| {
                    ApiError::validation(format!("Câmpul 'type' nu a putut fi citit: {}", e))
                })?;
            }
            "file" => {
                let original_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "fisier".to_string());
                let mime_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|e| {
                    ApiError::validation(format!("Fișierul nu a putut fi citit: {}", e))
                })?;
                file = Some((original_name, mime_type, data.to_vec()));
            }
            _ => {}
        }
    }

    let (original_name, mime_type, data) =
        file.ok_or_else(|| ApiError::validation("Niciun fișier încărcat"))?;

    if !UPLOAD_TYPES.contains(&upload_type.as_str()) {
        return Err(ApiError::validation("Tip de încărcare invalid"));
    }

    // Resources accept documents with a larger cap; everything else is
    // images only
    let (allowed, max_size) = if upload_type == "resource" {
        (
            [IMAGE_TYPES, DOCUMENT_TYPES].concat(),
            state.config.upload.max_document_size,
        )
    } else {
        (IMAGE_TYPES.to_vec(), state.config.upload.max_image_size)
    };

    if !allowed.contains(&mime_type.as_str()) {
        return Err(ApiError::validation(format!(
            "Tip de fișier neacceptat: {}",
            mime_type
        )));
    }

    if data.len() as u64 > max_size {
        return Err(ApiError::validation(format!(
            "Fișierul depășește limita de {} MB",
            max_size / 1024 / 1024
        )));
    }

    let ext = extension_for(&original_name, &mime_type);
    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    let dir = state.config.upload.path.join(&upload_type);

    fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::internal(anyhow::anyhow!("Failed to create upload dir: {}", e)))?;
    fs::write(dir.join(&filename), &data)
        .await
        .map_err(|e| ApiError::internal(anyhow::anyhow!("Failed to save upload: {}", e)))?;

    Ok(Json(UploadResponse {
        url: format!("/uploads/{}/{}", upload_type, filename),
        filename,
        original_name,
        size: data.len() as u64,
        mime_type,
    }))
}

/// Pick a file extension from the original name, falling back to the MIME
/// type for names without a usable one. Only alphanumeric extensions are
/// accepted; the name is client-supplied and must not shape the stored path.
fn extension_for(original_name: &str, mime_type: &str) -> String {
    if let Some(ext) = original_name.rsplit('.').next() {
        if ext != original_name
            && !ext.is_empty()
            && ext.len() <= 10
            && ext.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return ext.to_lowercase();
        }
    }

    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        "application/zip" => "zip",
        _ => "bin",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_filename() {
        assert_eq!(extension_for("raport.PDF", "application/pdf"), "pdf");
        assert_eq!(extension_for("poza.jpeg", "image/jpeg"), "jpeg");
    }

    #[test]
    fn test_extension_from_mime_when_name_has_none() {
        assert_eq!(extension_for("fisier", "image/png"), "png");
        assert_eq!(extension_for("arhiva", "application/zip"), "zip");
    }

    #[test]
    fn test_extension_unknown_mime_falls_back() {
        assert_eq!(extension_for("blob", "application/x-whatever"), "bin");
    }

    #[test]
    fn test_extension_rejects_non_alphanumeric() {
        assert_eq!(extension_for("f.a/../b", "application/pdf"), "pdf");
        assert_eq!(extension_for("raport.p df", "application/pdf"), "pdf");
        assert_eq!(extension_for("arhiva.t..", "application/zip"), "zip");
    }

    #[test]
    fn test_document_types_cover_office_formats() {
        assert!(DOCUMENT_TYPES.contains(&"application/pdf"));
        assert!(DOCUMENT_TYPES
            .contains(&"application/vnd.openxmlformats-officedocument.wordprocessingml.document"));
        assert!(!IMAGE_TYPES.contains(&"application/pdf"));
    }
}
