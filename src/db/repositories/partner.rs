//! Partner repository

use crate::models::{Partner, ReorderItem};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Filters for partner listing
#[derive(Debug, Clone, Default)]
pub struct PartnerFilter {
    /// Restrict to one partner type
    pub partner_type: Option<String>,
    /// Include inactive partners (admin views)
    pub include_inactive: bool,
}

/// Partner repository trait
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// List partners ordered by display_order, then newest first
    async fn list(&self, filter: &PartnerFilter) -> Result<Vec<Partner>>;

    /// Get partner by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Partner>>;

    /// Create a partner; returns the created row
    async fn create(&self, partner: &Partner) -> Result<Partner>;

    /// Update a partner's scalar columns
    async fn update(&self, partner: &Partner) -> Result<()>;

    /// Apply a bulk display_order change in one transaction.
    /// Fails (and rolls back) if any id does not exist.
    async fn reorder(&self, items: &[ReorderItem]) -> Result<()>;

    /// Delete a partner; returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based partner repository
pub struct SqlxPartnerRepository {
    pool: SqlitePool,
}

impl SqlxPartnerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn PartnerRepository> {
        Arc::new(Self::new(pool))
    }
}

const PARTNER_COLUMNS: &str = "id, name, description, logo_url, type, website_url, \
     display_order, is_active, created_at, updated_at";

#[async_trait]
impl PartnerRepository for SqlxPartnerRepository {
    async fn list(&self, filter: &PartnerFilter) -> Result<Vec<Partner>> {
        let mut sql = format!("SELECT {} FROM partners WHERE 1=1", PARTNER_COLUMNS);
        if !filter.include_inactive {
            sql.push_str(" AND is_active = 1");
        }
        if filter.partner_type.is_some() {
            sql.push_str(" AND type = ?");
        }
        sql.push_str(" ORDER BY display_order ASC, created_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(ref partner_type) = filter.partner_type {
            query = query.bind(partner_type);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list partners")?;

        Ok(rows.iter().map(row_to_partner).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Partner>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM partners WHERE id = ?",
            PARTNER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get partner by ID")?;

        Ok(row.as_ref().map(row_to_partner))
    }

    async fn create(&self, partner: &Partner) -> Result<Partner> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO partners
                (name, description, logo_url, type, website_url, display_order, is_active,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&partner.name)
        .bind(&partner.description)
        .bind(&partner.logo_url)
        .bind(&partner.partner_type)
        .bind(&partner.website_url)
        .bind(partner.display_order)
        .bind(partner.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create partner")?;

        Ok(Partner {
            id: result.last_insert_rowid(),
            created_at: now,
            updated_at: now,
            ..partner.clone()
        })
    }

    async fn update(&self, partner: &Partner) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE partners
            SET name = ?, description = ?, logo_url = ?, type = ?, website_url = ?,
                display_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&partner.name)
        .bind(&partner.description)
        .bind(&partner.logo_url)
        .bind(&partner.partner_type)
        .bind(&partner.website_url)
        .bind(partner.display_order)
        .bind(partner.is_active)
        .bind(Utc::now())
        .bind(partner.id)
        .execute(&self.pool)
        .await
        .context("Failed to update partner")?;

        Ok(())
    }

    async fn reorder(&self, items: &[ReorderItem]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        for item in items {
            let result =
                sqlx::query("UPDATE partners SET display_order = ?, updated_at = ? WHERE id = ?")
                    .bind(item.display_order)
                    .bind(Utc::now())
                    .bind(item.id)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to reorder partner")?;

            if result.rows_affected() == 0 {
                anyhow::bail!("Partner {} not found", item.id);
            }
        }

        tx.commit().await.context("Failed to commit reorder")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM partners WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete partner")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_partner(row: &sqlx::sqlite::SqliteRow) -> Partner {
    Partner {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        logo_url: row.get("logo_url"),
        partner_type: row.get("type"),
        website_url: row.get("website_url"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
