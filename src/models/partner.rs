//! Partner model
//!
//! Partner organizations displayed on the partners page, grouped by type
//! and sorted manually via `display_order`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Partner entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    /// Unique identifier
    pub id: i64,
    /// Partner name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Logo image URL
    pub logo_url: String,
    /// Partner type (e.g. institutional, academic)
    #[serde(rename = "type")]
    pub partner_type: String,
    /// Optional website URL
    pub website_url: Option<String>,
    /// Manual sort position
    pub display_order: i64,
    /// Visibility flag
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a partner
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    #[serde(rename = "type")]
    pub partner_type: Option<String>,
    pub website_url: Option<String>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
}

/// Input for updating a partner; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartnerInput {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    #[serde(rename = "type")]
    pub partner_type: Option<String>,
    pub website_url: Option<String>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
}
