//! Homepage carousel endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::common::{required, IdQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::models::{CarouselImage, CreateCarouselInput, ReorderRequest, UpdateCarouselInput};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCarouselQuery {
    pub include_inactive: Option<bool>,
}

/// GET /api/carousel
pub async fn list_carousel(
    State(state): State<AppState>,
    Query(query): Query<ListCarouselQuery>,
) -> Result<Json<Vec<CarouselImage>>, ApiError> {
    let images = state
        .carousel_repo
        .list(query.include_inactive.unwrap_or(false))
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(images))
}

/// POST /api/carousel
pub async fn create_carousel_image(
    State(state): State<AppState>,
    Json(input): Json<CreateCarouselInput>,
) -> Result<impl IntoResponse, ApiError> {
    let image_url = required(input.image_url, "Imaginea este obligatorie")?;
    let alt = required(input.alt, "Textul alternativ este obligatoriu")?;

    let now = Utc::now();
    let image = CarouselImage {
        id: 0,
        image_url,
        alt,
        display_order: input.display_order.unwrap_or(0),
        is_active: input.is_active.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };

    let created = state
        .carousel_repo
        .create(&image)
        .await
        .map_err(ApiError::internal)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/carousel
pub async fn update_carousel_image(
    State(state): State<AppState>,
    Json(input): Json<UpdateCarouselInput>,
) -> Result<Json<CarouselImage>, ApiError> {
    let id = input
        .id
        .ok_or_else(|| ApiError::validation("Id-ul imaginii este obligatoriu"))?;

    let mut image = state
        .carousel_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Imaginea nu a fost găsită"))?;

    if let Some(image_url) = input.image_url {
        image.image_url = image_url;
    }
    if let Some(alt) = input.alt {
        image.alt = alt;
    }
    if let Some(display_order) = input.display_order {
        image.display_order = display_order;
    }
    if let Some(is_active) = input.is_active {
        image.is_active = is_active;
    }

    state
        .carousel_repo
        .update(&image)
        .await
        .map_err(ApiError::internal)?;

    let updated = state
        .carousel_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Imaginea nu a fost găsită"))?;

    Ok(Json(updated))
}

/// PATCH /api/carousel — bulk reorder
pub async fn reorder_carousel(
    State(state): State<AppState>,
    Json(body): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .carousel_repo
        .reorder(&body.items)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/carousel?id=
pub async fn delete_carousel_image(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .carousel_repo
        .delete(query.id)
        .await
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::not_found("Imaginea nu a fost găsită"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
