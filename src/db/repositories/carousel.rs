//! Carousel repository

use crate::models::{CarouselImage, ReorderItem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Carousel repository trait
#[async_trait]
pub trait CarouselRepository: Send + Sync {
    /// List images ordered by display_order
    async fn list(&self, include_inactive: bool) -> Result<Vec<CarouselImage>>;

    /// Get image by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<CarouselImage>>;

    /// Create an image; returns the created row
    async fn create(&self, image: &CarouselImage) -> Result<CarouselImage>;

    /// Update an image
    async fn update(&self, image: &CarouselImage) -> Result<()>;

    /// Apply a bulk display_order change in one transaction
    async fn reorder(&self, items: &[ReorderItem]) -> Result<()>;

    /// Delete an image; returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based carousel repository
pub struct SqlxCarouselRepository {
    pool: SqlitePool,
}

impl SqlxCarouselRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn CarouselRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CarouselRepository for SqlxCarouselRepository {
    async fn list(&self, include_inactive: bool) -> Result<Vec<CarouselImage>> {
        let sql = if include_inactive {
            "SELECT id, image_url, alt, display_order, is_active, created_at, updated_at \
             FROM carousel_images ORDER BY display_order ASC, created_at DESC"
        } else {
            "SELECT id, image_url, alt, display_order, is_active, created_at, updated_at \
             FROM carousel_images WHERE is_active = 1 \
             ORDER BY display_order ASC, created_at DESC"
        };

        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list carousel images")?;

        Ok(rows.iter().map(row_to_image).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<CarouselImage>> {
        let row = sqlx::query(
            "SELECT id, image_url, alt, display_order, is_active, created_at, updated_at \
             FROM carousel_images WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get carousel image by ID")?;

        Ok(row.as_ref().map(row_to_image))
    }

    async fn create(&self, image: &CarouselImage) -> Result<CarouselImage> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO carousel_images (image_url, alt, display_order, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&image.image_url)
        .bind(&image.alt)
        .bind(image.display_order)
        .bind(image.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create carousel image")?;

        Ok(CarouselImage {
            id: result.last_insert_rowid(),
            created_at: now,
            updated_at: now,
            ..image.clone()
        })
    }

    async fn update(&self, image: &CarouselImage) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE carousel_images
            SET image_url = ?, alt = ?, display_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&image.image_url)
        .bind(&image.alt)
        .bind(image.display_order)
        .bind(image.is_active)
        .bind(Utc::now())
        .bind(image.id)
        .execute(&self.pool)
        .await
        .context("Failed to update carousel image")?;

        Ok(())
    }

    async fn reorder(&self, items: &[ReorderItem]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        for item in items {
            let result = sqlx::query(
                "UPDATE carousel_images SET display_order = ?, updated_at = ? WHERE id = ?",
            )
            .bind(item.display_order)
            .bind(Utc::now())
            .bind(item.id)
            .execute(&mut *tx)
            .await
            .context("Failed to reorder carousel image")?;

            if result.rows_affected() == 0 {
                anyhow::bail!("Carousel image {} not found", item.id);
            }
        }

        tx.commit().await.context("Failed to commit reorder")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM carousel_images WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete carousel image")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_image(row: &sqlx::sqlite::SqliteRow) -> CarouselImage {
    CarouselImage {
        id: row.get("id"),
        image_url: row.get("image_url"),
        alt: row.get("alt"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxCarouselRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxCarouselRepository::new(pool)
    }

    fn test_image(alt: &str, order: i64) -> CarouselImage {
        let now = Utc::now();
        CarouselImage {
            id: 0,
            image_url: "/uploads/general/img.jpg".to_string(),
            alt: alt.to_string(),
            display_order: order,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_list_ordering() {
        let repo = setup().await;
        repo.create(&test_image("second", 1)).await.unwrap();
        repo.create(&test_image("first", 0)).await.unwrap();

        let images = repo.list(false).await.unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].alt, "first");
    }

    #[tokio::test]
    async fn test_inactive_hidden_from_public_list() {
        let repo = setup().await;
        let mut image = test_image("hidden", 0);
        image.is_active = false;
        repo.create(&image).await.unwrap();

        assert!(repo.list(false).await.unwrap().is_empty());
        assert_eq!(repo.list(true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup().await;
        let mut image = repo.create(&test_image("alt", 0)).await.unwrap();

        image.alt = "updated".to_string();
        repo.update(&image).await.unwrap();
        assert_eq!(repo.get_by_id(image.id).await.unwrap().unwrap().alt, "updated");

        assert!(repo.delete(image.id).await.unwrap());
        assert!(repo.get_by_id(image.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reorder_rolls_back_on_missing_id() {
        let repo = setup().await;
        let image = repo.create(&test_image("alt", 0)).await.unwrap();

        let items = vec![
            ReorderItem {
                id: image.id,
                display_order: 3,
            },
            ReorderItem {
                id: 555,
                display_order: 4,
            },
        ];
        assert!(repo.reorder(&items).await.is_err());
        assert_eq!(
            repo.get_by_id(image.id).await.unwrap().unwrap().display_order,
            0
        );
    }
}
