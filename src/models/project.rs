//! Project model
//!
//! Research projects with bilingual descriptions and an ordered list of
//! content sections (see [`crate::models::section`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::section::{Section, SectionInput};

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub title_en: Option<String>,
    /// URL-friendly slug, generated from the title
    pub slug: String,
    pub short_description: String,
    pub short_description_en: Option<String>,
    pub detailed_description: Option<String>,
    pub detailed_description_en: Option<String>,
    /// Free-text status label (e.g. "în desfășurare")
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Content sections, present on detail responses and when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
}

/// Input for creating a project
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub detailed_description: Option<String>,
    pub detailed_description_en: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Appended after the current maximum when omitted
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sections: Vec<SectionInput>,
}

/// Input for updating a project. `sections: None` leaves sections untouched;
/// a present list replaces them through reconciliation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub detailed_description: Option<String>,
    pub detailed_description_en: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
    pub sections: Option<Vec<SectionInput>>,
}
