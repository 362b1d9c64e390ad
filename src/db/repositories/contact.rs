//! Contact submission repository

use crate::models::ContactSubmission;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Contact repository trait
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// List submissions, newest first, optionally filtered by read state
    async fn list(&self, is_read: Option<bool>) -> Result<Vec<ContactSubmission>>;

    /// Get submission by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<ContactSubmission>>;

    /// Store a new submission
    async fn create(&self, submission: &ContactSubmission) -> Result<ContactSubmission>;

    /// Set the read flag; returns whether the row exists
    async fn set_read(&self, id: i64, is_read: bool) -> Result<bool>;

    /// Delete a submission; returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based contact repository
pub struct SqlxContactRepository {
    pool: SqlitePool,
}

impl SqlxContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn list(&self, is_read: Option<bool>) -> Result<Vec<ContactSubmission>> {
        let mut sql = String::from(
            "SELECT id, name, email, subject, message, is_read, created_at \
             FROM contact_submissions WHERE 1=1",
        );
        if is_read.is_some() {
            sql.push_str(" AND is_read = ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(is_read) = is_read {
            query = query.bind(is_read);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list contact submissions")?;

        Ok(rows.iter().map(row_to_submission).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ContactSubmission>> {
        let row = sqlx::query(
            "SELECT id, name, email, subject, message, is_read, created_at \
             FROM contact_submissions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get contact submission by ID")?;

        Ok(row.as_ref().map(row_to_submission))
    }

    async fn create(&self, submission: &ContactSubmission) -> Result<ContactSubmission> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO contact_submissions (name, email, subject, message, is_read, created_at)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.subject)
        .bind(&submission.message)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create contact submission")?;

        Ok(ContactSubmission {
            id: result.last_insert_rowid(),
            is_read: false,
            created_at: now,
            ..submission.clone()
        })
    }

    async fn set_read(&self, id: i64, is_read: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE contact_submissions SET is_read = ? WHERE id = ?")
            .bind(is_read)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update contact submission")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contact_submissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete contact submission")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_submission(row: &sqlx::sqlite::SqliteRow) -> ContactSubmission {
    ContactSubmission {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        subject: row.get("subject"),
        message: row.get("message"),
        is_read: row.get("is_read"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxContactRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxContactRepository::new(pool)
    }

    fn test_submission(subject: &str) -> ContactSubmission {
        ContactSubmission {
            id: 0,
            name: "Ion Popescu".to_string(),
            email: "ion@example.com".to_string(),
            subject: subject.to_string(),
            message: "Bună ziua".to_string(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_unread() {
        let repo = setup().await;
        let created = repo.create(&test_submission("Întrebare")).await.unwrap();
        assert!(!created.is_read);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.subject, "Întrebare");
        assert!(!found.is_read);
    }

    #[tokio::test]
    async fn test_set_read_and_filter() {
        let repo = setup().await;
        let first = repo.create(&test_submission("One")).await.unwrap();
        repo.create(&test_submission("Two")).await.unwrap();

        assert!(repo.set_read(first.id, true).await.unwrap());

        let unread = repo.list(Some(false)).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].subject, "Two");

        let read = repo.list(Some(true)).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].subject, "One");
    }

    #[tokio::test]
    async fn test_set_read_missing_row() {
        let repo = setup().await;
        assert!(!repo.set_read(42, true).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let created = repo.create(&test_submission("Subiect")).await.unwrap();
        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
