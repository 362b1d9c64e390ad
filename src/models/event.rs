//! Event model
//!
//! Conferences, workshops and courses, with bilingual descriptions and the
//! same nested section structure as projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::section::{Section, SectionInput};

/// Event entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub title_en: Option<String>,
    pub slug: String,
    /// Event type (e.g. conference, workshop, course)
    #[serde(rename = "type")]
    pub event_type: String,
    pub short_description: String,
    pub short_description_en: Option<String>,
    pub detailed_description: Option<String>,
    pub detailed_description_en: Option<String>,
    pub image_url: Option<String>,
    /// Machine-readable event date
    pub event_date: Option<DateTime<Utc>>,
    /// Human-readable date text ("12-14 mai 2026")
    pub date_text: Option<String>,
    pub date_text_en: Option<String>,
    pub location: Option<String>,
    pub location_en: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
}

/// Input for creating an event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    pub title: Option<String>,
    pub title_en: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub detailed_description: Option<String>,
    pub detailed_description_en: Option<String>,
    pub image_url: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub date_text: Option<String>,
    pub date_text_en: Option<String>,
    pub location: Option<String>,
    pub location_en: Option<String>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sections: Vec<SectionInput>,
}

/// Input for updating an event
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventInput {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub title_en: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub short_description: Option<String>,
    pub short_description_en: Option<String>,
    pub detailed_description: Option<String>,
    pub detailed_description_en: Option<String>,
    pub image_url: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub date_text: Option<String>,
    pub date_text_en: Option<String>,
    pub location: Option<String>,
    pub location_en: Option<String>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
    pub sections: Option<Vec<SectionInput>>,
}
