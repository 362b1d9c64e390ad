//! News model
//!
//! News items shown on the homepage. Each item links either to internal
//! content (an event, project or resource), an external URL, or nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// News entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: i64,
    pub title: String,
    pub title_en: Option<String>,
    pub excerpt: Option<String>,
    pub excerpt_en: Option<String>,
    pub content: Option<String>,
    pub content_en: Option<String>,
    pub link_type: LinkType,
    pub link_url: Option<String>,
    pub event_id: Option<i64>,
    pub project_id: Option<i64>,
    pub resource_id: Option<i64>,
    pub display_order: i64,
    pub is_active: bool,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where a news item points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// No link, content shown inline
    Internal,
    Event,
    Project,
    Resource,
    External,
}

impl Default for LinkType {
    fn default() -> Self {
        Self::Internal
    }
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Internal => "internal",
            LinkType::Event => "event",
            LinkType::Project => "project",
            LinkType::Resource => "resource",
            LinkType::External => "external",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "internal" => Some(LinkType::Internal),
            "event" => Some(LinkType::Event),
            "project" => Some(LinkType::Project),
            "resource" => Some(LinkType::Resource),
            "external" => Some(LinkType::External),
            _ => None,
        }
    }
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a news item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsInput {
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub excerpt: Option<String>,
    pub excerpt_en: Option<String>,
    pub content: Option<String>,
    pub content_en: Option<String>,
    pub link_type: Option<String>,
    pub link_url: Option<String>,
    pub event_id: Option<i64>,
    pub project_id: Option<i64>,
    pub resource_id: Option<i64>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Input for updating a news item
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsInput {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub title_en: Option<String>,
    pub excerpt: Option<String>,
    pub excerpt_en: Option<String>,
    pub content: Option<String>,
    pub content_en: Option<String>,
    pub link_type: Option<String>,
    pub link_url: Option<String>,
    pub event_id: Option<i64>,
    pub project_id: Option<i64>,
    pub resource_id: Option<i64>,
    pub display_order: Option<i64>,
    pub is_active: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
}
