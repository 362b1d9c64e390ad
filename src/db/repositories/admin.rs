//! Admin repository

use crate::models::Admin;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Admin repository trait
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Create a new admin; returns the created row
    async fn create(&self, email: &str, password_hash: &str, name: &str) -> Result<Admin>;

    /// Get admin by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Admin>>;

    /// Get admin by email
    async fn get_by_email(&self, email: &str) -> Result<Option<Admin>>;

    /// Count admins
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based admin repository
pub struct SqlxAdminRepository {
    pool: SqlitePool,
}

impl SqlxAdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn AdminRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl AdminRepository for SqlxAdminRepository {
    async fn create(&self, email: &str, password_hash: &str, name: &str) -> Result<Admin> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO admins (email, password_hash, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create admin")?;

        Ok(Admin {
            id: result.last_insert_rowid(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Admin>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, name, created_at, updated_at FROM admins WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get admin by ID")?;

        Ok(row.map(|row| row_to_admin(&row)))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, name, created_at, updated_at FROM admins WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get admin by email")?;

        Ok(row.map(|row| row_to_admin(&row)))
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM admins")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count admins")?;

        Ok(row.get("count"))
    }
}

fn row_to_admin(row: &sqlx::sqlite::SqliteRow) -> Admin {
    Admin {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
