//! Partner endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::common::{none_if_blank, required, IdQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::db::repositories::PartnerFilter;
use crate::models::{CreatePartnerInput, Partner, ReorderRequest, UpdatePartnerInput};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPartnersQuery {
    #[serde(rename = "type")]
    pub partner_type: Option<String>,
    pub include_inactive: Option<bool>,
}

/// GET /api/partners
pub async fn list_partners(
    State(state): State<AppState>,
    Query(query): Query<ListPartnersQuery>,
) -> Result<Json<Vec<Partner>>, ApiError> {
    let partners = state
        .partner_repo
        .list(&PartnerFilter {
            partner_type: query.partner_type,
            include_inactive: query.include_inactive.unwrap_or(false),
        })
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(partners))
}

/// POST /api/partners
pub async fn create_partner(
    State(state): State<AppState>,
    Json(input): Json<CreatePartnerInput>,
) -> Result<impl IntoResponse, ApiError> {
    let name = required(input.name, "Numele partenerului este obligatoriu")?;
    let logo_url = required(input.logo_url, "Logo-ul partenerului este obligatoriu")?;
    let partner_type = required(input.partner_type, "Tipul partenerului este obligatoriu")?;

    let now = Utc::now();
    let partner = Partner {
        id: 0,
        name,
        description: input.description.and_then(none_if_blank),
        logo_url,
        partner_type,
        website_url: input.website_url.and_then(none_if_blank),
        display_order: input.display_order.unwrap_or(0),
        is_active: input.is_active.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };

    let created = state
        .partner_repo
        .create(&partner)
        .await
        .map_err(ApiError::internal)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/partners
pub async fn update_partner(
    State(state): State<AppState>,
    Json(input): Json<UpdatePartnerInput>,
) -> Result<Json<Partner>, ApiError> {
    let id = input
        .id
        .ok_or_else(|| ApiError::validation("Id-ul partenerului este obligatoriu"))?;

    let mut partner = state
        .partner_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Partenerul nu a fost găsit"))?;

    if let Some(name) = input.name {
        partner.name = name;
    }
    // Nullable text fields: an empty string clears the stored value
    if let Some(description) = input.description {
        partner.description = none_if_blank(description);
    }
    if let Some(logo_url) = input.logo_url {
        partner.logo_url = logo_url;
    }
    if let Some(partner_type) = input.partner_type {
        partner.partner_type = partner_type;
    }
    if let Some(website_url) = input.website_url {
        partner.website_url = none_if_blank(website_url);
    }
    if let Some(display_order) = input.display_order {
        partner.display_order = display_order;
    }
    if let Some(is_active) = input.is_active {
        partner.is_active = is_active;
    }

    state
        .partner_repo
        .update(&partner)
        .await
        .map_err(ApiError::internal)?;

    let updated = state
        .partner_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Partenerul nu a fost găsit"))?;

    Ok(Json(updated))
}

/// PATCH /api/partners — bulk reorder
pub async fn reorder_partners(
    State(state): State<AppState>,
    Json(body): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .partner_repo
        .reorder(&body.items)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/partners?id=
pub async fn delete_partner(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .partner_repo
        .delete(query.id)
        .await
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::not_found("Partenerul nu a fost găsit"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
