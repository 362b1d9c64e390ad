//! Event repository

use crate::models::{Event, Section};
use crate::services::sections::{SectionInsert, SectionPlan};
use crate::services::slug::SlugLookup;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use super::section_store::{self, EVENT_SECTIONS};

/// Filters for event listing
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub event_type: Option<String>,
    pub include_inactive: bool,
    pub include_sections: bool,
}

/// Event repository trait
#[async_trait]
pub trait EventRepository: SlugLookup {
    /// List events ordered by display_order, then newest first
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>>;

    /// Get event by ID, with sections
    async fn get_by_id(&self, id: i64) -> Result<Option<Event>>;

    /// Get event by slug, with sections
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>>;

    /// Load an event's current sections for reconciliation
    async fn get_sections(&self, event_id: i64) -> Result<Vec<Section>>;

    /// Highest display_order, or -1 when the table is empty
    async fn max_display_order(&self) -> Result<i64>;

    /// Create an event and its initial sections in one transaction
    async fn create(&self, event: &Event, sections: &[SectionInsert]) -> Result<Event>;

    /// Update an event's scalars and, when a plan is given, reconcile its
    /// sections in the same transaction
    async fn update(&self, event: &Event, plan: Option<&SectionPlan>) -> Result<()>;

    /// Apply a bulk display_order change in one transaction
    async fn reorder(&self, items: &[crate::models::ReorderItem]) -> Result<()>;

    /// Delete an event; sections and files cascade
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based event repository
pub struct SqlxEventRepository {
    pool: SqlitePool,
}

impl SqlxEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn EventRepository> {
        Arc::new(Self::new(pool))
    }
}

const EVENT_COLUMNS: &str = "id, title, title_en, slug, type, short_description, \
     short_description_en, detailed_description, detailed_description_en, image_url, \
     event_date, date_text, date_text_en, location, location_en, display_order, is_active, \
     created_at, updated_at";

#[async_trait]
impl SlugLookup for SqlxEventRepository {
    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<i64>> {
        let row = sqlx::query("SELECT id FROM events WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up event slug")?;

        Ok(row.map(|r| r.get("id")))
    }
}

#[async_trait]
impl EventRepository for SqlxEventRepository {
    async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let mut sql = format!("SELECT {} FROM events WHERE 1=1", EVENT_COLUMNS);
        if !filter.include_inactive {
            sql.push_str(" AND is_active = 1");
        }
        if filter.event_type.is_some() {
            sql.push_str(" AND type = ?");
        }
        sql.push_str(" ORDER BY display_order ASC, created_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(ref event_type) = filter.event_type {
            query = query.bind(event_type);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list events")?;

        let mut events: Vec<Event> = rows.iter().map(row_to_event).collect();

        if filter.include_sections {
            for event in &mut events {
                event.sections = Some(
                    section_store::fetch_sections(&self.pool, EVENT_SECTIONS, event.id).await?,
                );
            }
        }

        Ok(events)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Event>> {
        let row = sqlx::query(&format!("SELECT {} FROM events WHERE id = ?", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get event by ID")?;

        match row {
            Some(row) => {
                let mut event = row_to_event(&row);
                event.sections = Some(
                    section_store::fetch_sections(&self.pool, EVENT_SECTIONS, event.id).await?,
                );
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM events WHERE slug = ?",
            EVENT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get event by slug")?;

        match row {
            Some(row) => {
                let mut event = row_to_event(&row);
                event.sections = Some(
                    section_store::fetch_sections(&self.pool, EVENT_SECTIONS, event.id).await?,
                );
                Ok(Some(event))
            }
            None => Ok(None),
        }
    }

    async fn get_sections(&self, event_id: i64) -> Result<Vec<Section>> {
        section_store::fetch_sections(&self.pool, EVENT_SECTIONS, event_id).await
    }

    async fn max_display_order(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COALESCE(MAX(display_order), -1) AS max_order FROM events")
            .fetch_one(&self.pool)
            .await
            .context("Failed to read event order")?;

        Ok(row.get("max_order"))
    }

    async fn create(&self, event: &Event, sections: &[SectionInsert]) -> Result<Event> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO events
                (title, title_en, slug, type, short_description, short_description_en,
                 detailed_description, detailed_description_en, image_url, event_date,
                 date_text, date_text_en, location, location_en, display_order, is_active,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.title)
        .bind(&event.title_en)
        .bind(&event.slug)
        .bind(&event.event_type)
        .bind(&event.short_description)
        .bind(&event.short_description_en)
        .bind(&event.detailed_description)
        .bind(&event.detailed_description_en)
        .bind(&event.image_url)
        .bind(event.event_date)
        .bind(&event.date_text)
        .bind(&event.date_text_en)
        .bind(&event.location)
        .bind(&event.location_en)
        .bind(event.display_order)
        .bind(event.is_active)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("Failed to create event")?;

        let event_id = result.last_insert_rowid();
        for section in sections {
            section_store::insert_section(&mut tx, EVENT_SECTIONS, event_id, section).await?;
        }

        tx.commit().await.context("Failed to commit event create")?;

        self.get_by_id(event_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Event vanished after create"))
    }

    async fn update(&self, event: &Event, plan: Option<&SectionPlan>) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            UPDATE events
            SET title = ?, title_en = ?, slug = ?, type = ?, short_description = ?,
                short_description_en = ?, detailed_description = ?, detailed_description_en = ?,
                image_url = ?, event_date = ?, date_text = ?, date_text_en = ?, location = ?,
                location_en = ?, display_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&event.title)
        .bind(&event.title_en)
        .bind(&event.slug)
        .bind(&event.event_type)
        .bind(&event.short_description)
        .bind(&event.short_description_en)
        .bind(&event.detailed_description)
        .bind(&event.detailed_description_en)
        .bind(&event.image_url)
        .bind(event.event_date)
        .bind(&event.date_text)
        .bind(&event.date_text_en)
        .bind(&event.location)
        .bind(&event.location_en)
        .bind(event.display_order)
        .bind(event.is_active)
        .bind(Utc::now())
        .bind(event.id)
        .execute(&mut *tx)
        .await
        .context("Failed to update event")?;

        if let Some(plan) = plan {
            section_store::apply_plan(&mut tx, EVENT_SECTIONS, event.id, plan).await?;
        }

        tx.commit().await.context("Failed to commit event update")?;
        Ok(())
    }

    async fn reorder(&self, items: &[crate::models::ReorderItem]) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        for item in items {
            let result =
                sqlx::query("UPDATE events SET display_order = ?, updated_at = ? WHERE id = ?")
                    .bind(item.display_order)
                    .bind(Utc::now())
                    .bind(item.id)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to reorder event")?;

            if result.rows_affected() == 0 {
                anyhow::bail!("Event {} not found", item.id);
            }
        }

        tx.commit().await.context("Failed to commit reorder")?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete event")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_event(row: &sqlx::sqlite::SqliteRow) -> Event {
    Event {
        id: row.get("id"),
        title: row.get("title"),
        title_en: row.get("title_en"),
        slug: row.get("slug"),
        event_type: row.get("type"),
        short_description: row.get("short_description"),
        short_description_en: row.get("short_description_en"),
        detailed_description: row.get("detailed_description"),
        detailed_description_en: row.get("detailed_description_en"),
        image_url: row.get("image_url"),
        event_date: row.get("event_date"),
        date_text: row.get("date_text"),
        date_text_en: row.get("date_text_en"),
        location: row.get("location"),
        location_en: row.get("location_en"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        sections: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::models::section::SectionInput;
    use crate::services::sections::{self, SectionScalars};

    async fn setup() -> SqlxEventRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxEventRepository::new(pool)
    }

    fn test_event(title: &str, slug: &str, event_type: &str) -> Event {
        let now = Utc::now();
        Event {
            id: 0,
            title: title.to_string(),
            title_en: None,
            slug: slug.to_string(),
            event_type: event_type.to_string(),
            short_description: "descriere".to_string(),
            short_description_en: None,
            detailed_description: None,
            detailed_description_en: None,
            image_url: None,
            event_date: None,
            date_text: Some("12-14 mai 2026".to_string()),
            date_text_en: None,
            location: Some("București".to_string()),
            location_en: None,
            display_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
            sections: None,
        }
    }

    fn section_insert(title: &str, order: i64) -> SectionInsert {
        SectionInsert {
            scalars: SectionScalars {
                title: Some(title.to_string()),
                title_en: None,
                content: Some("program".to_string()),
                content_en: None,
                background_color: None,
                display_order: order,
            },
            files: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_with_sections() {
        let repo = setup().await;
        let created = repo
            .create(
                &test_event("Conferință", "conferinta", "conference"),
                &[section_insert("Program", 0), section_insert("Speakeri", 1)],
            )
            .await
            .unwrap();

        let sections = created.sections.unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title.as_deref(), Some("Program"));
    }

    #[tokio::test]
    async fn test_list_filters_by_type() {
        let repo = setup().await;
        repo.create(&test_event("C", "c", "conference"), &[]).await.unwrap();
        repo.create(&test_event("W", "w", "workshop"), &[]).await.unwrap();

        let workshops = repo
            .list(&EventFilter {
                event_type: Some("workshop".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(workshops.len(), 1);
        assert_eq!(workshops[0].slug, "w");
    }

    #[tokio::test]
    async fn test_inactive_hidden_from_public_list() {
        let repo = setup().await;
        let mut event = test_event("E", "e", "conference");
        event.is_active = false;
        repo.create(&event, &[]).await.unwrap();

        assert!(repo.list(&EventFilter::default()).await.unwrap().is_empty());
        assert_eq!(
            repo.list(&EventFilter {
                include_inactive: true,
                ..Default::default()
            })
            .await
            .unwrap()
            .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_list_ties_broken_by_newest_created() {
        let repo = setup().await;

        // The older row carries the later event_date, so ordering by date
        // would put it first
        let mut older = test_event("Vechi", "vechi", "conference");
        older.event_date = Some(Utc::now() + chrono::Duration::days(30));
        let older = repo.create(&older, &[]).await.unwrap();

        let mut newer = test_event("Nou", "nou", "conference");
        newer.event_date = Some(Utc::now() + chrono::Duration::days(1));
        repo.create(&newer, &[]).await.unwrap();

        sqlx::query("UPDATE events SET created_at = ? WHERE id = ?")
            .bind(Utc::now() - chrono::Duration::days(1))
            .bind(older.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        let events = repo.list(&EventFilter::default()).await.unwrap();
        assert_eq!(events[0].slug, "nou");
        assert_eq!(events[1].slug, "vechi");
    }

    #[tokio::test]
    async fn test_update_reconciles_sections() {
        let repo = setup().await;
        let created = repo
            .create(
                &test_event("E", "e", "conference"),
                &[section_insert("Veche", 0)],
            )
            .await
            .unwrap();

        let existing = repo.get_sections(created.id).await.unwrap();
        let incoming = vec![SectionInput {
            id: None,
            title: Some("Nouă".to_string()),
            title_en: None,
            content: None,
            content_en: None,
            background_color: None,
            display_order: 0,
            files: vec![],
        }];
        let plan = sections::plan(&existing, incoming);
        repo.update(&created, Some(&plan)).await.unwrap();

        let after = repo.get_sections(created.id).await.unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].title.as_deref(), Some("Nouă"));
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let repo = setup().await;
        repo.create(&test_event("E", "eveniment", "course"), &[])
            .await
            .unwrap();

        let found = repo.get_by_slug("eveniment").await.unwrap().unwrap();
        assert_eq!(found.event_type, "course");
        assert!(repo.get_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reorder_all_or_nothing() {
        let repo = setup().await;
        let event = repo.create(&test_event("E", "e", "conference"), &[]).await.unwrap();

        let items = vec![
            crate::models::ReorderItem {
                id: event.id,
                display_order: 4,
            },
            crate::models::ReorderItem {
                id: 999,
                display_order: 5,
            },
        ];
        assert!(repo.reorder(&items).await.is_err());
        assert_eq!(
            repo.get_by_id(event.id).await.unwrap().unwrap().display_order,
            0
        );
    }

    #[tokio::test]
    async fn test_delete_cascades_sections() {
        let repo = setup().await;
        let created = repo
            .create(&test_event("E", "e", "conference"), &[section_insert("S", 0)])
            .await
            .unwrap();

        assert!(repo.delete(created.id).await.unwrap());

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM event_sections")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }
}
