//! Project repository

use crate::models::{Project, Section};
use crate::services::sections::{SectionInsert, SectionPlan};
use crate::services::slug::SlugLookup;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use super::section_store::{self, PROJECT_SECTIONS};

/// Project repository trait
#[async_trait]
pub trait ProjectRepository: SlugLookup {
    /// List projects ordered by display_order, optionally with sections
    async fn list(&self, include_inactive: bool, include_sections: bool) -> Result<Vec<Project>>;

    /// Get project by ID, with sections
    async fn get_by_id(&self, id: i64) -> Result<Option<Project>>;

    /// Get project by slug, with sections
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>>;

    /// Load a project's current sections; the reconciliation planner diffs
    /// the incoming editor state against this
    async fn get_sections(&self, project_id: i64) -> Result<Vec<Section>>;

    /// Highest display_order, or -1 when the table is empty
    async fn max_display_order(&self) -> Result<i64>;

    /// Create a project and its initial sections in one transaction
    async fn create(&self, project: &Project, sections: &[SectionInsert]) -> Result<Project>;

    /// Update a project's scalars and, when a plan is given, reconcile its
    /// sections in the same transaction
    async fn update(&self, project: &Project, plan: Option<&SectionPlan>) -> Result<()>;

    /// Apply a bulk display_order change in one transaction
    async fn reorder(&self, items: &[crate::models::ReorderItem]) -> Result<()>;

    /// Delete a project; sections and files cascade
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based project repository
pub struct SqlxProjectRepository {
    pool: SqlitePool,
}

impl SqlxProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn ProjectRepository> {
        Arc::new(Self::new(pool))
    }
}

const PROJECT_COLUMNS: &str = "id, title, title_en, slug, short_description, \
     short_description_en, detailed_description, detailed_description_en, status, \
     start_date, end_date, display_order, is_active, created_at, updated_at";

#[async_trait]
impl SlugLookup for SqlxProjectRepository {
    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<i64>> {
        let row = sqlx::query("SELECT id FROM projects WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up project slug")?;

        Ok(row.map(|r| r.get("id")))
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    async fn list(&self, include_inactive: bool, include_sections: bool) -> Result<Vec<Project>> {
        let mut sql = format!("SELECT {} FROM projects", PROJECT_COLUMNS);
        if !include_inactive {
            sql.push_str(" WHERE is_active = 1");
        }
        sql.push_str(" ORDER BY display_order ASC, created_at DESC");

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list projects")?;

        let mut projects: Vec<Project> = rows.iter().map(row_to_project).collect();

        if include_sections {
            for project in &mut projects {
                project.sections = Some(
                    section_store::fetch_sections(&self.pool, PROJECT_SECTIONS, project.id)
                        .await?,
                );
            }
        }

        Ok(projects)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE id = ?",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get project by ID")?;

        match row {
            Some(row) => {
                let mut project = row_to_project(&row);
                project.sections = Some(
                    section_store::fetch_sections(&self.pool, PROJECT_SECTIONS, project.id)
                        .await?,
                );
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE slug = ?",
            PROJECT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get project by slug")?;

        match row {
            Some(row) => {
                let mut project = row_to_project(&row);
                project.sections = Some(
                    section_store::fetch_sections(&self.pool, PROJECT_SECTIONS, project.id)
                        .await?,
                );
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    async fn get_sections(&self, project_id: i64) -> Result<Vec<Section>> {
        section_store::fetch_sections(&self.pool, PROJECT_SECTIONS, project_id).await
    }

    async fn max_display_order(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COALESCE(MAX(display_order), -1) AS max_order FROM projects")
            .fetch_one(&self.pool)
            .await
            .context("Failed to read project order")?;

        Ok(row.get("max_order"))
    }

    async fn create(&self, project: &Project, sections: &[SectionInsert]) -> Result<Project> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO projects
                (title, title_en, slug, short_description, short_description_en,
                 detailed_description, detailed_description_en, status, start_date, end_date,
                 display_order, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.title)
        .bind(&project.title_en)
        .bind(&project.slug)
        .bind(&project.short_description)
        .bind(&project.short_description_en)
        .bind(&project.detailed_description)
        .bind(&project.detailed_description_en)
        .bind(&project.status)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.display_order)
        .bind(project.is_active)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("Failed to create project")?;

        let project_id = result.last_insert_rowid();
        for section in sections {
            section_store::insert_section(&mut tx, PROJECT_SECTIONS, project_id, section).await?;
        }

        tx.commit().await.context("Failed to commit project create")?;

        self.get_by_id(project_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Project vanished after create"))
    }

    async fn update(&self, project: &Project, plan: Option<&SectionPlan>) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            UPDATE projects
            SET title = ?, title_en = ?, slug = ?, short_description = ?,
                short_description_en = ?, detailed_description = ?, detailed_description_en = ?,
                status = ?, start_date = ?, end_date = ?, display_order = ?, is_active = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.title)
        .bind(&project.title_en)
        .bind(&project.slug)
        .bind(&project.short_description)
        .bind(&project.short_description_en)
        .bind(&project.detailed_description)
        .bind(&project.detailed_description_en)
        .bind(&project.status)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.display_order)
        .bind(project.is_active)
        .bind(Utc::now())
        .bind(project.id)
        .execute(&mut *tx)
        .await
        .context("Failed to update project")?;

        if let Some(plan) = plan {
            section_store::apply_plan(&mut tx, PROJECT_SECTIONS, project.id, plan).await?;
        }

        tx.commit().await.context("Failed to commit project update")?;
        Ok(())
    }

    async fn reorder(&self, items: &[crate::models::ReorderItem]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        for item in items {
            let result =
                sqlx::query("UPDATE projects SET display_order = ?, updated_at = ? WHERE id = ?")
                    .bind(item.display_order)
                    .bind(Utc::now())
                    .bind(item.id)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to reorder project")?;

            if result.rows_affected() == 0 {
                anyhow::bail!("Project {} not found", item.id);
            }
        }

        tx.commit().await.context("Failed to commit reorder")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete project")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Project {
    Project {
        id: row.get("id"),
        title: row.get("title"),
        title_en: row.get("title_en"),
        slug: row.get("slug"),
        short_description: row.get("short_description"),
        short_description_en: row.get("short_description_en"),
        detailed_description: row.get("detailed_description"),
        detailed_description_en: row.get("detailed_description_en"),
        status: row.get("status"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        sections: None,
    }
}
