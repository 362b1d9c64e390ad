//! News endpoints
//!
//! Each news item links to internal content, an event/project/resource, or
//! an external URL. On every link-type change the non-matching link ids are
//! cleared so an item never carries a stale reference.

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
use crate::models::{CreateNewsInput, LinkType, News, ReorderRequest, UpdateNewsInput};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNewsQuery {
    pub include_inactive: Option<bool>,
}

/// Resolve the link target fields for a link type, validating that the
/// required id or URL is present.
fn resolve_link(
    link_type: LinkType,
    link_url: Option<String>,
    event_id: Option<i64>,
    project_id: Option<i64>,
    resource_id: Option<i64>,
) -> Result<(Option<String>, Option<i64>, Option<i64>, Option<i64>), ApiError> {
    match link_type {
        LinkType::Internal => Ok((None, None, None, None)),
        LinkType::Event => {
            let id = event_id
                .ok_or_else(|| ApiError::validation("Evenimentul asociat este obligatoriu"))?;
            Ok((None, Some(id), None, None))
        }
        LinkType::Project => {
            let id = project_id
                .ok_or_else(|| ApiError::validation("Proiectul asociat este obligatoriu"))?;
            Ok((None, None, Some(id), None))
        }
        LinkType::Resource => {
            let id = resource_id
                .ok_or_else(|| ApiError::validation("Resursa asociată este obligatorie"))?;
            Ok((None, None, None, Some(id)))
        }
        LinkType::External => {
            let url = link_url
                .filter(|u| !u.trim().is_empty())
                .ok_or_else(|| ApiError::validation("Link-ul extern este obligatoriu"))?;
            Ok((Some(url), None, None, None))
        }
    }
}

/// GET /api/news
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<ListNewsQuery>,
) -> Result<Json<Vec<News>>, ApiError> {
    let news = state
        .news_repo
        .list(query.include_inactive.unwrap_or(false))
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(news))
}

/// GET /api/news/{id}
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<News>, ApiError> {
    let news = state
        .news_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Noutatea nu a fost găsită"))?;

    Ok(Json(news))
}

/// POST /api/news
pub async fn create_news(
    State(state): State<AppState>,
    Json(input): Json<CreateNewsInput>,
) -> Result<impl IntoResponse, ApiError> {
    let title = required(input.title, "Titlul este obligatoriu")?;
    let link_type = match input.link_type {
        Some(ref s) => {
            LinkType::from_str(s).ok_or_else(|| ApiError::validation("Tip de link invalid"))?
        }
        None => LinkType::Internal,
    };

    let (link_url, event_id, project_id, resource_id) = resolve_link(
        link_type,
        input.link_url,
        input.event_id,
        input.project_id,
        input.resource_id,
    )?;

    let now = Utc::now();
    let news = News {
        id: 0,
        title,
        title_en: input.title_en.and_then(none_if_blank),
        excerpt: input.excerpt.and_then(none_if_blank),
        excerpt_en: input.excerpt_en.and_then(none_if_blank),
        content: input.content.and_then(none_if_blank),
        content_en: input.content_en.and_then(none_if_blank),
        link_type,
        link_url,
        event_id,
        project_id,
        resource_id,
        display_order: input.display_order.unwrap_or(0),
        is_active: input.is_active.unwrap_or(true),
        published_at: input.published_at.unwrap_or(now),
        created_at: now,
        updated_at: now,
    };

    let created = state
        .news_repo
        .create(&news)
        .await
        .map_err(ApiError::internal)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/news
pub async fn update_news(
    State(state): State<AppState>,
    Json(input): Json<UpdateNewsInput>,
) -> Result<Json<News>, ApiError> {
    let id = input
        .id
        .ok_or_else(|| ApiError::validation("Id-ul noutății este obligatoriu"))?;

    let mut news = state
        .news_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Noutatea nu a fost găsită"))?;

    if let Some(title) = input.title {
        news.title = title;
    }
    // Nullable text fields: an empty string clears the stored value
    if let Some(title_en) = input.title_en {
        news.title_en = none_if_blank(title_en);
    }
    if let Some(excerpt) = input.excerpt {
        news.excerpt = none_if_blank(excerpt);
    }
    if let Some(excerpt_en) = input.excerpt_en {
        news.excerpt_en = none_if_blank(excerpt_en);
    }
    if let Some(content) = input.content {
        news.content = none_if_blank(content);
    }
    if let Some(content_en) = input.content_en {
        news.content_en = none_if_blank(content_en);
    }
    if let Some(display_order) = input.display_order {
        news.display_order = display_order;
    }
    if let Some(is_active) = input.is_active {
        news.is_active = is_active;
    }
    if let Some(published_at) = input.published_at {
        news.published_at = published_at;
    }

    let link_type = match input.link_type {
        Some(ref s) => {
            LinkType::from_str(s).ok_or_else(|| ApiError::validation("Tip de link invalid"))?
        }
        None => news.link_type,
    };

    // Fall back to the stored target when the caller did not resend it
    let (link_url, event_id, project_id, resource_id) = resolve_link(
        link_type,
        input.link_url.or(news.link_url.take()),
        input.event_id.or(news.event_id),
        input.project_id.or(news.project_id),
        input.resource_id.or(news.resource_id),
    )?;

    news.link_type = link_type;
    news.link_url = link_url;
    news.event_id = event_id;
    news.project_id = project_id;
    news.resource_id = resource_id;

    state
        .news_repo
        .update(&news)
        .await
        .map_err(ApiError::internal)?;

    let updated = state
        .news_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Noutatea nu a fost găsită"))?;

    Ok(Json(updated))
}

/// PATCH /api/news — bulk reorder
pub async fn reorder_news(
    State(state): State<AppState>,
    Json(body): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .news_repo
        .reorder(&body.items)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/news?id=
pub async fn delete_news(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .news_repo
        .delete(query.id)
        .await
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::not_found("Noutatea nu a fost găsită"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
