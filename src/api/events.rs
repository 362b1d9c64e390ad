//! Event endpoints
//!
//! Same section handling as projects; events additionally carry a type
//! (conference, workshop, course) and date/location text in both languages.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::api::common::{none_if_blank, required, IdQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::db::repositories::EventFilter;
use crate::models::{CreateEventInput, Event, ReorderRequest, UpdateEventInput};
use crate::services::sections;
use crate::services::slug::unique_slug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub include_inactive: Option<bool>,
    pub include_sections: Option<bool>,
}

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state
        .event_repo
        .list(&EventFilter {
            event_type: query.event_type,
            include_inactive: query.include_inactive.unwrap_or(false),
            include_sections: query.include_sections.unwrap_or(false),
        })
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(events))
}

/// GET /api/events/{slug}
pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let event = state
        .event_repo
        .get_by_slug(&slug)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Evenimentul nu a fost găsit"))?;

    Ok(Json(event))
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<CreateEventInput>,
) -> Result<impl IntoResponse, ApiError> {
    let title = required(input.title, "Titlul este obligatoriu")?;
    let event_type = required(input.event_type, "Tipul evenimentului este obligatoriu")?;
    let short_description = required(
        input.short_description,
        "Descrierea scurtă este obligatorie",
    )?;

    let slug = unique_slug(state.event_repo.as_ref(), &title, None)
        .await
        .map_err(ApiError::internal)?;

    let now = Utc::now();
    let event = Event {
        id: 0,
        title,
        title_en: input.title_en.and_then(none_if_blank),
        slug,
        event_type,
        short_description,
        short_description_en: input.short_description_en.and_then(none_if_blank),
        detailed_description: input.detailed_description.and_then(none_if_blank),
        detailed_description_en: input.detailed_description_en.and_then(none_if_blank),
        image_url: input.image_url.and_then(none_if_blank),
        event_date: input.event_date,
        date_text: input.date_text.and_then(none_if_blank),
        date_text_en: input.date_text_en.and_then(none_if_blank),
        location: input.location.and_then(none_if_blank),
        location_en: input.location_en.and_then(none_if_blank),
        display_order: input.display_order.unwrap_or(0),
        is_active: input.is_active.unwrap_or(true),
        created_at: now,
        updated_at: now,
        sections: None,
    };

    let plan = sections::plan(&[], input.sections);

    let created = state
        .event_repo
        .create(&event, &plan.inserts)
        .await
        .map_err(ApiError::internal)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/events
pub async fn update_event(
    State(state): State<AppState>,
    Json(input): Json<UpdateEventInput>,
) -> Result<Json<Event>, ApiError> {
    let id = input
        .id
        .ok_or_else(|| ApiError::validation("Id-ul evenimentului este obligatoriu"))?;

    let mut event = state
        .event_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Evenimentul nu a fost găsit"))?;

    if let Some(title) = input.title {
        if title != event.title {
            event.slug = unique_slug(state.event_repo.as_ref(), &title, Some(id))
                .await
                .map_err(ApiError::internal)?;
        }
        event.title = title;
    }
    // Nullable text fields: an empty string clears the stored value
    if let Some(title_en) = input.title_en {
        event.title_en = none_if_blank(title_en);
    }
    if let Some(event_type) = input.event_type {
        event.event_type = event_type;
    }
    if let Some(short_description) = input.short_description {
        event.short_description = short_description;
    }
    if let Some(short_description_en) = input.short_description_en {
        event.short_description_en = none_if_blank(short_description_en);
    }
    if let Some(detailed_description) = input.detailed_description {
        event.detailed_description = none_if_blank(detailed_description);
    }
    if let Some(detailed_description_en) = input.detailed_description_en {
        event.detailed_description_en = none_if_blank(detailed_description_en);
    }
    if let Some(image_url) = input.image_url {
        event.image_url = none_if_blank(image_url);
    }
    if let Some(event_date) = input.event_date {
        event.event_date = Some(event_date);
    }
    if let Some(date_text) = input.date_text {
        event.date_text = none_if_blank(date_text);
    }
    if let Some(date_text_en) = input.date_text_en {
        event.date_text_en = none_if_blank(date_text_en);
    }
    if let Some(location) = input.location {
        event.location = none_if_blank(location);
    }
    if let Some(location_en) = input.location_en {
        event.location_en = none_if_blank(location_en);
    }
    if let Some(display_order) = input.display_order {
        event.display_order = display_order;
    }
    if let Some(is_active) = input.is_active {
        event.is_active = is_active;
    }

    let plan = match input.sections {
        Some(incoming) => {
            let existing = state
                .event_repo
                .get_sections(id)
                .await
                .map_err(ApiError::internal)?;
            Some(sections::plan(&existing, incoming))
        }
        None => None,
    };

    state
        .event_repo
        .update(&event, plan.as_ref())
        .await
        .map_err(ApiError::internal)?;

    let updated = state
        .event_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Evenimentul nu a fost găsit"))?;

    Ok(Json(updated))
}

/// PATCH /api/events — bulk reorder
pub async fn reorder_events(
    State(state): State<AppState>,
    Json(body): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .event_repo
        .reorder(&body.items)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/events?id=
pub async fn delete_event(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .event_repo
        .delete(query.id)
        .await
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::not_found("Evenimentul nu a fost găsit"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
