//! Membership application model
//!
//! Applications submitted through the public membership form and reviewed
//! by admins. At most one pending or approved application may exist per
//! email address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Membership application entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipApplication {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Professional grade (e.g. medic primar, rezident, "alta")
    pub professional_grade: String,
    /// Free-text grade, kept only when `professional_grade` is "alta"
    pub other_professional_grade: Option<String>,
    pub medical_specialty: String,
    pub academic_degree: Option<String>,
    pub institutional_affiliation: String,
    pub membership_type: String,
    pub research_interests: String,
    pub gdpr_consent: bool,
    pub fee_consent: bool,
    pub newsletter_consent: bool,
    pub status: ApplicationStatus,
    pub review_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl ApplicationStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parse status from database string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Public input for the membership form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembershipInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub professional_grade: Option<String>,
    pub other_professional_grade: Option<String>,
    pub medical_specialty: Option<String>,
    pub academic_degree: Option<String>,
    pub institutional_affiliation: Option<String>,
    pub membership_type: Option<String>,
    pub research_interests: Option<String>,
    #[serde(default)]
    pub gdpr_consent: bool,
    #[serde(default)]
    pub fee_consent: bool,
    #[serde(default)]
    pub newsletter_consent: bool,
}

/// Admin input for reviewing an application
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMembershipInput {
    pub id: Option<i64>,
    pub status: Option<String>,
    pub review_notes: Option<String>,
}
