//! Homepage carousel model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Carousel image entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselImage {
    pub id: i64,
    pub image_url: String,
    /// Accessibility alt text
    pub alt: String,
    pub display_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a carousel image
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarouselInput {
    pub image_url: Option<String>,
    pub alt: Option<String>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
}

/// Input for updating a carousel image
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarouselInput {
    pub id: Option<i64>,
    pub image_url: Option<String>,
    pub alt: Option<String>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
}
