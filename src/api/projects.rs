//! Project endpoints
//!
//! Create/update carry the full desired section list; the handler plans a
//! three-way diff against the stored sections and the repository executes
//! it in one transaction with the parent row.

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
use crate::models::{CreateProjectInput, Project, ReorderRequest, UpdateProjectInput};
use crate::services::sections;
use crate::services::slug::unique_slug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsQuery {
    pub include_inactive: Option<bool>,
    pub include_sections: Option<bool>,
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state
        .project_repo
        .list(
            query.include_inactive.unwrap_or(false),
            query.include_sections.unwrap_or(false),
        )
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(projects))
}

/// GET /api/projects/{slug}
pub async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project = state
        .project_repo
        .get_by_slug(&slug)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Proiectul nu a fost găsit"))?;

    Ok(Json(project))
}

/// POST /api/projects
pub async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectInput>,
) -> Result<impl IntoResponse, ApiError> {
    let title = required(input.title, "Titlul este obligatoriu")?;
    let short_description = required(
        input.short_description,
        "Descrierea scurtă este obligatorie",
    )?;

    let slug = unique_slug(state.project_repo.as_ref(), &title, None)
        .await
        .map_err(ApiError::internal)?;

    // Append after the current maximum when no explicit position is given
    let display_order = match input.display_order {
        Some(order) => order,
        None => {
            state
                .project_repo
                .max_display_order()
                .await
                .map_err(ApiError::internal)?
                + 1
        }
    };

    let now = Utc::now();
    let project = Project {
        id: 0,
        title,
        title_en: input.title_en.and_then(none_if_blank),
        slug,
        short_description,
        short_description_en: input.short_description_en.and_then(none_if_blank),
        detailed_description: input.detailed_description.and_then(none_if_blank),
        detailed_description_en: input.detailed_description_en.and_then(none_if_blank),
        status: input.status.and_then(none_if_blank),
        start_date: input.start_date,
        end_date: input.end_date,
        display_order,
        is_active: input.is_active.unwrap_or(true),
        created_at: now,
        updated_at: now,
        sections: None,
    };

    // Planning against an empty state turns the whole input into inserts,
    // renumbered contiguously
    let plan = sections::plan(&[], input.sections);

    let created = state
        .project_repo
        .create(&project, &plan.inserts)
        .await
        .map_err(ApiError::internal)?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/projects
pub async fn update_project(
    State(state): State<AppState>,
    Json(input): Json<UpdateProjectInput>,
) -> Result<Json<Project>, ApiError> {
    let id = input
        .id
        .ok_or_else(|| ApiError::validation("Id-ul proiectului este obligatoriu"))?;

    let mut project = state
        .project_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Proiectul nu a fost găsit"))?;

    if let Some(title) = input.title {
        if title != project.title {
            project.slug = unique_slug(state.project_repo.as_ref(), &title, Some(id))
                .await
                .map_err(ApiError::internal)?;
        }
        project.title = title;
    }
    // Nullable text fields: an empty string clears the stored value
    if let Some(title_en) = input.title_en {
        project.title_en = none_if_blank(title_en);
    }
    if let Some(short_description) = input.short_description {
        project.short_description = short_description;
    }
    if let Some(short_description_en) = input.short_description_en {
        project.short_description_en = none_if_blank(short_description_en);
    }
    if let Some(detailed_description) = input.detailed_description {
        project.detailed_description = none_if_blank(detailed_description);
    }
    if let Some(detailed_description_en) = input.detailed_description_en {
        project.detailed_description_en = none_if_blank(detailed_description_en);
    }
    if let Some(status) = input.status {
        project.status = none_if_blank(status);
    }
    if let Some(start_date) = input.start_date {
        project.start_date = Some(start_date);
    }
    if let Some(end_date) = input.end_date {
        project.end_date = Some(end_date);
    }
    if let Some(display_order) = input.display_order {
        project.display_order = display_order;
    }
    if let Some(is_active) = input.is_active {
        project.is_active = is_active;
    }

    // A present section list replaces the stored sections via reconciliation;
    // an absent one leaves them untouched
    let plan = match input.sections {
        Some(incoming) => {
            let existing = state
                .project_repo
                .get_sections(id)
                .await
                .map_err(ApiError::internal)?;
            Some(sections::plan(&existing, incoming))
        }
        None => None,
    };

    state
        .project_repo
        .update(&project, plan.as_ref())
        .await
        .map_err(ApiError::internal)?;

    let updated = state
        .project_repo
        .get_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("Proiectul nu a fost găsit"))?;

    Ok(Json(updated))
}

/// PATCH /api/projects — bulk reorder
pub async fn reorder_projects(
    State(state): State<AppState>,
    Json(body): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .project_repo
        .reorder(&body.items)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/projects?id=
pub async fn delete_project(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .project_repo
        .delete(query.id)
        .await
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::not_found("Proiectul nu a fost găsit"));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
