//! Content section models
//!
//! Projects and events share the same nested structure: an ordered list of
//! rich-text sections, each with an ordered list of attached files. These
//! wire types are shared by both; the database rows live in entity-specific
//! tables (`project_sections`, `event_sections`, ...).

use serde::{Deserialize, Serialize};

/// A stored content section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: i64,
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub content: Option<String>,
    pub content_en: Option<String>,
    pub background_color: Option<String>,
    pub display_order: i64,
    #[serde(default)]
    pub files: Vec<SectionFile>,
}

/// A file attached to a section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFile {
    pub id: i64,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub mime_type: String,
    pub display_order: i64,
}

/// Incoming section from the admin editor.
///
/// A present `id` refers to an existing row; an absent `id` means a new
/// section. Sections omitted from the incoming list are deleted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionInput {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub content: Option<String>,
    pub content_en: Option<String>,
    pub background_color: Option<String>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub files: Vec<SectionFileInput>,
}

/// Incoming file entry. Files never mutate in place: entries with an `id`
/// are kept as-is, entries without one are inserted, missing ids are deleted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFileInput {
    pub id: Option<i64>,
    pub file_name: String,
    pub file_url: String,
    #[serde(default)]
    pub file_size: i64,
    pub mime_type: String,
    #[serde(default)]
    pub display_order: i64,
}

/// Body of a bulk-reorder PATCH request
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

/// One entry of a bulk-reorder request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderItem {
    pub id: i64,
    pub display_order: i64,
}
