//! News repository

use crate::models::{LinkType, News, ReorderItem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// News repository trait
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// List news ordered by display_order, then newest published first
    async fn list(&self, include_inactive: bool) -> Result<Vec<News>>;

    /// Get news item by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<News>>;

    /// Create a news item; returns the created row
    async fn create(&self, news: &News) -> Result<News>;

    /// Update a news item
    async fn update(&self, news: &News) -> Result<()>;

    /// Apply a bulk display_order change in one transaction
    async fn reorder(&self, items: &[ReorderItem]) -> Result<()>;

    /// Delete a news item; returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based news repository
pub struct SqlxNewsRepository {
    pool: SqlitePool,
}

impl SqlxNewsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(pool))
    }
}

const NEWS_COLUMNS: &str = "id, title, title_en, excerpt, excerpt_en, content, content_en, \
     link_type, link_url, event_id, project_id, resource_id, display_order, is_active, \
     published_at, created_at, updated_at";

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn list(&self, include_inactive: bool) -> Result<Vec<News>> {
        let mut sql = format!("SELECT {} FROM news", NEWS_COLUMNS);
        if !include_inactive {
            sql.push_str(" WHERE is_active = 1");
        }
        sql.push_str(" ORDER BY display_order ASC, published_at DESC");

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list news")?;

        rows.iter().map(row_to_news).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<News>> {
        let row = sqlx::query(&format!("SELECT {} FROM news WHERE id = ?", NEWS_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get news by ID")?;

        row.as_ref().map(row_to_news).transpose()
    }

    async fn create(&self, news: &News) -> Result<News> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO news
                (title, title_en, excerpt, excerpt_en, content, content_en, link_type, link_url,
                 event_id, project_id, resource_id, display_order, is_active, published_at,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&news.title)
        .bind(&news.title_en)
        .bind(&news.excerpt)
        .bind(&news.excerpt_en)
        .bind(&news.content)
        .bind(&news.content_en)
        .bind(news.link_type.as_str())
        .bind(&news.link_url)
        .bind(news.event_id)
        .bind(news.project_id)
        .bind(news.resource_id)
        .bind(news.display_order)
        .bind(news.is_active)
        .bind(news.published_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create news")?;

        Ok(News {
            id: result.last_insert_rowid(),
            created_at: now,
            updated_at: now,
            ..news.clone()
        })
    }

    async fn update(&self, news: &News) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE news
            SET title = ?, title_en = ?, excerpt = ?, excerpt_en = ?, content = ?, content_en = ?,
                link_type = ?, link_url = ?, event_id = ?, project_id = ?, resource_id = ?,
                display_order = ?, is_active = ?, published_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&news.title)
        .bind(&news.title_en)
        .bind(&news.excerpt)
        .bind(&news.excerpt_en)
        .bind(&news.content)
        .bind(&news.content_en)
        .bind(news.link_type.as_str())
        .bind(&news.link_url)
        .bind(news.event_id)
        .bind(news.project_id)
        .bind(news.resource_id)
        .bind(news.display_order)
        .bind(news.is_active)
        .bind(news.published_at)
        .bind(Utc::now())
        .bind(news.id)
        .execute(&self.pool)
        .await
        .context("Failed to update news")?;

        Ok(())
    }

    async fn reorder(&self, items: &[ReorderItem]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        for item in items {
            let result =
                sqlx::query("UPDATE news SET display_order = ?, updated_at = ? WHERE id = ?")
                    .bind(item.display_order)
                    .bind(Utc::now())
                    .bind(item.id)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to reorder news")?;

            if result.rows_affected() == 0 {
                anyhow::bail!("News item {} not found", item.id);
            }
        }

        tx.commit().await.context("Failed to commit reorder")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete news")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_news(row: &sqlx::sqlite::SqliteRow) -> Result<News> {
    let link_type: String = row.get("link_type");
    let link_type = LinkType::from_str(&link_type)
        .ok_or_else(|| anyhow::anyhow!("Unknown link type: {}", link_type))?;

    Ok(News {
        id: row.get("id"),
        title: row.get("title"),
        title_en: row.get("title_en"),
        excerpt: row.get("excerpt"),
        excerpt_en: row.get("excerpt_en"),
        content: row.get("content"),
        content_en: row.get("content_en"),
        link_type,
        link_url: row.get("link_url"),
        event_id: row.get("event_id"),
        project_id: row.get("project_id"),
        resource_id: row.get("resource_id"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (SqlitePool, SqlxNewsRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        (pool.clone(), SqlxNewsRepository::new(pool))
    }

    fn test_news(title: &str, order: i64) -> News {
        let now = Utc::now();
        News {
            id: 0,
            title: title.to_string(),
            title_en: None,
            excerpt: None,
            excerpt_en: None,
            content: None,
            content_en: None,
            link_type: LinkType::Internal,
            link_url: None,
            event_id: None,
            project_id: None,
            resource_id: None,
            display_order: order,
            is_active: true,
            published_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_order() {
        let (_pool, repo) = setup().await;
        repo.create(&test_news("Second", 1)).await.unwrap();
        repo.create(&test_news("First", 0)).await.unwrap();

        let news = repo.list(false).await.unwrap();
        assert_eq!(news.len(), 2);
        assert_eq!(news[0].title, "First");
    }

    #[tokio::test]
    async fn test_event_link_nulled_when_event_deleted() {
        let (pool, repo) = setup().await;

        sqlx::query(
            "INSERT INTO events (title, slug, type, short_description) VALUES ('E', 'e', 'conference', 'd')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let mut news = test_news("Linked", 0);
        news.link_type = LinkType::Event;
        news.event_id = Some(1);
        let created = repo.create(&news).await.unwrap();

        sqlx::query("DELETE FROM events WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        // FK is SET NULL: the news item survives with a cleared link
        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert!(found.event_id.is_none());
    }

    #[tokio::test]
    async fn test_update_changes_link_type() {
        let (_pool, repo) = setup().await;
        let mut news = repo.create(&test_news("N", 0)).await.unwrap();

        news.link_type = LinkType::External;
        news.link_url = Some("https://example.com".to_string());
        repo.update(&news).await.unwrap();

        let found = repo.get_by_id(news.id).await.unwrap().unwrap();
        assert_eq!(found.link_type, LinkType::External);
        assert_eq!(found.link_url.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn test_reorder_all_or_nothing() {
        let (_pool, repo) = setup().await;
        let a = repo.create(&test_news("A", 0)).await.unwrap();

        let items = vec![
            ReorderItem {
                id: a.id,
                display_order: 2,
            },
            ReorderItem {
                id: 777,
                display_order: 3,
            },
        ];
        assert!(repo.reorder(&items).await.is_err());
        assert_eq!(repo.get_by_id(a.id).await.unwrap().unwrap().display_order, 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let (_pool, repo) = setup().await;
        let created = repo.create(&test_news("N", 0)).await.unwrap();
        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
