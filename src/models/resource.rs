//! Resource model
//!
//! Downloadable resources (guides, protocols, documents). A resource either
//! points to an external `url` or carries one or more stored files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resource entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Attached files, ordered by `display_order`
    #[serde(default)]
    pub files: Vec<ResourceFile>,
}

/// A file attached to a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFile {
    pub id: i64,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub display_order: i64,
}

/// Incoming file entry for resource create/update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFileInput {
    pub file_name: String,
    pub file_url: String,
    #[serde(default)]
    pub file_size: i64,
    pub mime_type: String,
    #[serde(default)]
    pub display_order: i64,
}

/// Input for creating a resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub files: Vec<ResourceFileInput>,
}

/// Input for updating a resource
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceInput {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub is_active: Option<bool>,
    /// New files to attach
    #[serde(default)]
    pub files: Vec<ResourceFileInput>,
    /// Ids of existing files to remove
    #[serde(default)]
    pub files_to_delete: Vec<i64>,
}
