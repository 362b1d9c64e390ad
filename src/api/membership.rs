//! Membership application endpoints
//!
//! The public form enforces GDPR and fee consent and the one active
//! application per email rule; review operations are admin-only.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::common::{is_valid_email, required, IdQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{
    ApplicationStatus, CreateMembershipInput, MembershipApplication, ReviewMembershipInput,
};

#[derive(Debug, Deserialize)]
pub struct ListMembershipQuery {
    pub status: Option<String>,
}

/// POST /api/membership (public)
pub async fn submit_application(
    State(state): State<AppState>,
    Json(input): Json<CreateMembershipInput>,
) -> Result<impl IntoResponse, ApiError> {
    let first_name = required(input.first_name, "Prenumele este obligatoriu")?;
    let last_name = required(input.last_name, "Numele este obligatoriu")?;
    let email = required(input.email, "Adresa de email este obligatorie")?;
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Adresa de email nu este validă"));
    }
    let professional_grade = required(
        input.professional_grade,
        "Gradul profesional este obligatoriu",
    )?;
    let medical_specialty = required(
        input.medical_specialty,
        "Specialitatea medicală este obligatorie",
    )?;
    let institutional_affiliation = required(
        input.institutional_affiliation,
        "Afilierea instituțională este obligatorie",
    )?;
    let membership_type = required(input.membership_type, "Tipul de membru este obligatoriu")?;
    let research_interests = required(
        input.research_interests,
        "Domeniile de interes sunt obligatorii",
    )?;

    if !input.gdpr_consent {
        return Err(ApiError::validation("Consimțământul GDPR este obligatoriu"));
    }
    if !input.fee_consent {
        return Err(ApiError::validation(
            "Acordul privind cotizația este obligatoriu",
        ));
    }

    let existing = state
        .membership_repo
        .find_active_by_email(&email)
        .await
        .map_err(ApiError::internal)?;
    if existing.is_some() {
        return Err(ApiError::validation(
            "Există deja o cerere de înscriere activă pentru această adresă de email",
        ));
    }

    // Free-text grade only makes sense with the "alta" option
    let other_professional_grade = if professional_grade == "alta" {
        input.other_professional_grade
    } else {
        None
    };

    let now = Utc::now();
    let application = MembershipApplication {
        id: 0,
        first_name,
        last_name,
        email,
        professional_grade,
        other_professional_grade,
        medical_specialty,
        academic_degree: input.academic_degree,
        institutional_affiliation,
        membership_type,
        research_interests,
        gdpr_consent: input.gdpr_consent,
        fee_consent: input.fee_consent,
        newsletter_consent: input.newsletter_consent,
        status: ApplicationStatus::Pending,
        review_notes: None,
        reviewed_at: None,
        created_at: now,
        updated_at: now,
    };

    let created = state
        .membership_repo
        .create(&application)
        .await
        .map_err(ApiError::internal)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/membership (admin)
pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ListMembershipQuery>,
) -> Result<Json<Vec<MembershipApplication>>, ApiError> {
    let status = match query.status {
        Some(s) => Some(
            ApplicationStatus::from_str(&s)
                .ok_or_else(|| ApiError::validation("Status invalid"))?,
        ),
        None => None,
    };

    let applications = state
        .membership_repo
        .list(status)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(applications))
}

/// PUT /api/membership (admin) — record a review decision
pub async fn review_application(
    State(state): State<AppState>,
    Json(input): Json<ReviewMembershipInput>,
) -> Result<Json<MembershipApplication>, ApiError> {
    let id = input
        .id
        .ok_or_else(|| ApiError::validation("Id-ul cererii este obligatoriu"))?;
    let status = input
        .status
        .as_deref()
        .and_then(ApplicationStatus::from_str)
        .ok_or_else(|| ApiError::validation("Status invalid"))?;

    let updated = state
        .membership_repo
        .review(id, status, input.review_notes.as_deref())
        .await
        .map_err(ApiError::internal)?;

    if !updated {
        return Err(ApiError::not_found("Cererea nu a fost găsită"));
    }

    let application = state
        .membership_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Cererea nu a fost găsită"))?;

    Ok(Json(application))
}

/// DELETE /api/membership?id= (admin)
pub async fn delete_application(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .membership_repo
        .delete(query.id)
        .await
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::not_found("Cererea nu a fost găsită"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
