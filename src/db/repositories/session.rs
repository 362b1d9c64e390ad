//! Session repository

use crate::models::Session;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a new session
    async fn create(&self, session: &Session) -> Result<Session>;

    /// Get session by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<Session>>;

    /// Delete a session
    async fn delete(&self, id: &str) -> Result<()>;

    /// Delete all sessions for an admin
    async fn delete_by_admin(&self, admin_id: i64) -> Result<()>;

    /// Delete expired sessions
    async fn delete_expired(&self) -> Result<i64>;
}

/// SQLx-based session repository
pub struct SqlxSessionRepository {
    pool: SqlitePool,
}

impl SqlxSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn SessionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepository {
    async fn create(&self, session: &Session) -> Result<Session> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, admin_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(session.admin_id)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await
        .context("Failed to create session")?;

        Ok(session.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Session>> {
        let row = sqlx::query(
            "SELECT id, admin_id, expires_at, created_at FROM sessions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get session by ID")?;

        Ok(row.map(|row| Session {
            id: row.get("id"),
            admin_id: row.get("admin_id"),
            expires_at: row.get("expires_at"),
            created_at: row.get("created_at"),
        }))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete session")?;

        Ok(())
    }

    async fn delete_by_admin(&self, admin_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE admin_id = ?")
            .bind(admin_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete sessions by admin")?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<i64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .context("Failed to delete expired sessions")?;

        Ok(result.rows_affected() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::Duration;
    use uuid::Uuid;

    async fn setup() -> (SqlitePool, SqlxSessionRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxSessionRepository::new(pool.clone());
        (pool, repo)
    }

    async fn create_test_admin(pool: &SqlitePool) -> i64 {
        let result =
            sqlx::query("INSERT INTO admins (email, password_hash, name) VALUES (?, 'h', 'A')")
                .bind(format!("{}@scipi.ro", Uuid::new_v4()))
                .execute(pool)
                .await
                .expect("Failed to create test admin");
        result.last_insert_rowid()
    }

    fn test_session(admin_id: i64, expires_in_days: i64) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4().to_string(),
            admin_id,
            expires_at: now + Duration::days(expires_in_days),
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (pool, repo) = setup().await;
        let admin_id = create_test_admin(&pool).await;

        let session = test_session(admin_id, 7);
        repo.create(&session).await.expect("Failed to create");

        let found = repo
            .get_by_id(&session.id)
            .await
            .expect("Failed to get")
            .expect("Session not found");
        assert_eq!(found.admin_id, admin_id);
        assert!(!found.is_expired());
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let (_pool, repo) = setup().await;
        let found = repo.get_by_id("missing").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let (pool, repo) = setup().await;
        let admin_id = create_test_admin(&pool).await;

        let session = test_session(admin_id, 7);
        repo.create(&session).await.unwrap();
        repo.delete(&session.id).await.unwrap();

        assert!(repo.get_by_id(&session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_admin() {
        let (pool, repo) = setup().await;
        let admin1 = create_test_admin(&pool).await;
        let admin2 = create_test_admin(&pool).await;

        let s1 = test_session(admin1, 7);
        let s2 = test_session(admin1, 7);
        let s3 = test_session(admin2, 7);
        repo.create(&s1).await.unwrap();
        repo.create(&s2).await.unwrap();
        repo.create(&s3).await.unwrap();

        repo.delete_by_admin(admin1).await.unwrap();

        assert!(repo.get_by_id(&s1.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&s2.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&s3.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_expired() {
        let (pool, repo) = setup().await;
        let admin_id = create_test_admin(&pool).await;

        let expired = test_session(admin_id, -1);
        let valid = test_session(admin_id, 7);
        repo.create(&expired).await.unwrap();
        repo.create(&valid).await.unwrap();

        let deleted = repo.delete_expired().await.unwrap();
        assert_eq!(deleted, 1);

        assert!(repo.get_by_id(&expired.id).await.unwrap().is_none());
        assert!(repo.get_by_id(&valid.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sessions_cascade_with_admin() {
        let (pool, repo) = setup().await;
        let admin_id = create_test_admin(&pool).await;

        let session = test_session(admin_id, 7);
        repo.create(&session).await.unwrap();

        sqlx::query("DELETE FROM admins WHERE id = ?")
            .bind(admin_id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(repo.get_by_id(&session.id).await.unwrap().is_none());
    }
}
