//! Contact form model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Whether an admin has read the message
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Public input for the contact form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Admin input for marking a submission read/unread
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactInput {
    pub id: Option<i64>,
    /// Defaults to `true` when omitted
    pub is_read: Option<bool>,
}
