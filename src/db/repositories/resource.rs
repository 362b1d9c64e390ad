//! Resource repository

use crate::models::{Resource, ResourceFile, ResourceFileInput};
use crate::services::slug::SlugLookup;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

/// Filters for resource listing
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub resource_type: Option<String>,
    pub include_inactive: bool,
}

/// Resource repository trait
#[async_trait]
pub trait ResourceRepository: SlugLookup {
    /// List resources with their files, newest first
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>>;

    /// Get resource by ID, with files
    async fn get_by_id(&self, id: i64) -> Result<Option<Resource>>;

    /// Get resource by slug, with files
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Resource>>;

    /// Create a resource and its files in one transaction
    async fn create(&self, resource: &Resource, files: &[ResourceFileInput]) -> Result<Resource>;

    /// Update a resource's scalars, delete the listed file ids and attach
    /// new files, all in one transaction
    async fn update(
        &self,
        resource: &Resource,
        new_files: &[ResourceFileInput],
        files_to_delete: &[i64],
    ) -> Result<()>;

    /// Delete a resource; files cascade. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based resource repository
pub struct SqlxResourceRepository {
    pool: SqlitePool,
}

impl SqlxResourceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn ResourceRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch_files(&self, resource_id: i64) -> Result<Vec<ResourceFile>> {
        let rows = sqlx::query(
            "SELECT id, file_name, file_url, file_size, mime_type, display_order \
             FROM resource_files WHERE resource_id = ? ORDER BY display_order ASC",
        )
        .bind(resource_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch resource files")?;

        Ok(rows.iter().map(row_to_file).collect())
    }
}

const RESOURCE_COLUMNS: &str =
    "id, title, slug, description, url, type, is_active, created_at, updated_at";

#[async_trait]
impl SlugLookup for SqlxResourceRepository {
    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<i64>> {
        let row = sqlx::query("SELECT id FROM resources WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up resource slug")?;

        Ok(row.map(|r| r.get("id")))
    }
}

#[async_trait]
impl ResourceRepository for SqlxResourceRepository {
    async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>> {
        let mut sql = format!("SELECT {} FROM resources WHERE 1=1", RESOURCE_COLUMNS);
        if !filter.include_inactive {
            sql.push_str(" AND is_active = 1");
        }
        if filter.resource_type.is_some() {
            sql.push_str(" AND type = ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(ref resource_type) = filter.resource_type {
            query = query.bind(resource_type);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list resources")?;

        let mut resources: Vec<Resource> = rows.iter().map(row_to_resource).collect();

        // Attach files in one pass
        let file_rows = sqlx::query(
            "SELECT resource_id, id, file_name, file_url, file_size, mime_type, display_order \
             FROM resource_files ORDER BY display_order ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch resource files")?;

        let mut by_resource: HashMap<i64, Vec<ResourceFile>> = HashMap::new();
        for row in &file_rows {
            by_resource
                .entry(row.get("resource_id"))
                .or_default()
                .push(row_to_file(row));
        }
        for resource in &mut resources {
            resource.files = by_resource.remove(&resource.id).unwrap_or_default();
        }

        Ok(resources)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Resource>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM resources WHERE id = ?",
            RESOURCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get resource by ID")?;

        match row {
            Some(row) => {
                let mut resource = row_to_resource(&row);
                resource.files = self.fetch_files(resource.id).await?;
                Ok(Some(resource))
            }
            None => Ok(None),
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Resource>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM resources WHERE slug = ?",
            RESOURCE_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get resource by slug")?;

        match row {
            Some(row) => {
                let mut resource = row_to_resource(&row);
                resource.files = self.fetch_files(resource.id).await?;
                Ok(Some(resource))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, resource: &Resource, files: &[ResourceFileInput]) -> Result<Resource> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO resources (title, slug, description, url, type, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&resource.title)
        .bind(&resource.slug)
        .bind(&resource.description)
        .bind(&resource.url)
        .bind(&resource.resource_type)
        .bind(resource.is_active)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("Failed to create resource")?;

        let resource_id = result.last_insert_rowid();

        for (order, file) in files.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO resource_files
                    (resource_id, file_name, file_url, file_size, mime_type, display_order, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(resource_id)
            .bind(&file.file_name)
            .bind(&file.file_url)
            .bind(file.file_size)
            .bind(&file.mime_type)
            .bind(order as i64)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("Failed to create resource file")?;
        }

        tx.commit().await.context("Failed to commit resource create")?;

        self.get_by_id(resource_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Resource vanished after create"))
    }

    async fn update(
        &self,
        resource: &Resource,
        new_files: &[ResourceFileInput],
        files_to_delete: &[i64],
    ) -> Result<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            UPDATE resources
            SET title = ?, slug = ?, description = ?, url = ?, type = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&resource.title)
        .bind(&resource.slug)
        .bind(&resource.description)
        .bind(&resource.url)
        .bind(&resource.resource_type)
        .bind(resource.is_active)
        .bind(now)
        .bind(resource.id)
        .execute(&mut *tx)
        .await
        .context("Failed to update resource")?;

        for file_id in files_to_delete {
            sqlx::query("DELETE FROM resource_files WHERE id = ? AND resource_id = ?")
                .bind(file_id)
                .bind(resource.id)
                .execute(&mut *tx)
                .await
                .context("Failed to delete resource file")?;
        }

        // New files append after the current maximum
        let row = sqlx::query(
            "SELECT COALESCE(MAX(display_order), -1) AS max_order \
             FROM resource_files WHERE resource_id = ?",
        )
        .bind(resource.id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to read file order")?;
        let mut next_order: i64 = row.get::<i64, _>("max_order") + 1;

        for file in new_files {
            sqlx::query(
                r#"
                INSERT INTO resource_files
                    (resource_id, file_name, file_url, file_size, mime_type, display_order, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(resource.id)
            .bind(&file.file_name)
            .bind(&file.file_url)
            .bind(file.file_size)
            .bind(&file.mime_type)
            .bind(next_order)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("Failed to create resource file")?;
            next_order += 1;
        }

        tx.commit().await.context("Failed to commit resource update")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete resource")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_resource(row: &sqlx::sqlite::SqliteRow) -> Resource {
    Resource {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        url: row.get("url"),
        resource_type: row.get("type"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        files: Vec::new(),
    }
}

fn row_to_file(row: &sqlx::sqlite::SqliteRow) -> ResourceFile {
    ResourceFile {
        id: row.get("id"),
        file_name: row.get("file_name"),
        file_url: row.get("file_url"),
        file_size: row.get("file_size"),
        mime_type: row.get("mime_type"),
        display_order: row.get("display_order"),
    }
}
