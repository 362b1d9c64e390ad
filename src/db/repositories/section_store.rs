//! Shared section storage
//!
//! Projects and events carry the same nested section/file structure in
//! parallel table sets. This module holds the SQL for loading sections and
//! for executing a [`SectionPlan`], parameterized by the table names so both
//! repositories share one implementation. Plan execution always runs on a
//! caller-provided transaction.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

use crate::models::section::{Section, SectionFile};
use crate::services::sections::{SectionInsert, SectionPlan};

/// Table names for one entity's section storage
#[derive(Debug, Clone, Copy)]
pub(crate) struct SectionTables {
    /// Section table (e.g. `project_sections`)
    pub sections: &'static str,
    /// File table (e.g. `project_section_files`)
    pub files: &'static str,
    /// Parent FK column on the section table (e.g. `project_id`)
    pub parent_fk: &'static str,
}

pub(crate) const PROJECT_SECTIONS: SectionTables = SectionTables {
    sections: "project_sections",
    files: "project_section_files",
    parent_fk: "project_id",
};

pub(crate) const EVENT_SECTIONS: SectionTables = SectionTables {
    sections: "event_sections",
    files: "event_section_files",
    parent_fk: "event_id",
};

/// Load a parent's sections with their files, both ordered by display_order.
pub(crate) async fn fetch_sections(
    pool: &SqlitePool,
    tables: SectionTables,
    parent_id: i64,
) -> Result<Vec<Section>> {
    let rows = sqlx::query(&format!(
        "SELECT id, title, title_en, content, content_en, background_color, display_order \
         FROM {} WHERE {} = ? ORDER BY display_order ASC",
        tables.sections, tables.parent_fk
    ))
    .bind(parent_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch sections")?;

    let mut sections: Vec<Section> = rows
        .iter()
        .map(|row| Section {
            id: row.get("id"),
            title: row.get("title"),
            title_en: row.get("title_en"),
            content: row.get("content"),
            content_en: row.get("content_en"),
            background_color: row.get("background_color"),
            display_order: row.get("display_order"),
            files: Vec::new(),
        })
        .collect();

    let file_rows = sqlx::query(&format!(
        "SELECT f.section_id, f.id, f.file_name, f.file_url, f.file_size, f.mime_type, \
                f.display_order \
         FROM {} f JOIN {} s ON f.section_id = s.id \
         WHERE s.{} = ? ORDER BY f.display_order ASC",
        tables.files, tables.sections, tables.parent_fk
    ))
    .bind(parent_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch section files")?;

    let mut by_section: HashMap<i64, Vec<SectionFile>> = HashMap::new();
    for row in &file_rows {
        by_section
            .entry(row.get("section_id"))
            .or_default()
            .push(SectionFile {
                id: row.get("id"),
                file_name: row.get("file_name"),
                file_url: row.get("file_url"),
                file_size: row.get("file_size"),
                mime_type: row.get("mime_type"),
                display_order: row.get("display_order"),
            });
    }
    for section in &mut sections {
        section.files = by_section.remove(&section.id).unwrap_or_default();
    }

    Ok(sections)
}

/// Insert one new section with its files.
pub(crate) async fn insert_section(
    tx: &mut Transaction<'_, Sqlite>,
    tables: SectionTables,
    parent_id: i64,
    section: &SectionInsert,
) -> Result<()> {
    let now = Utc::now();
    let result = sqlx::query(&format!(
        "INSERT INTO {} ({}, title, title_en, content, content_en, background_color, \
                         display_order, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        tables.sections, tables.parent_fk
    ))
    .bind(parent_id)
    .bind(&section.scalars.title)
    .bind(&section.scalars.title_en)
    .bind(&section.scalars.content)
    .bind(&section.scalars.content_en)
    .bind(&section.scalars.background_color)
    .bind(section.scalars.display_order)
    .bind(now)
    .bind(now)
    .execute(&mut **tx)
    .await
    .context("Failed to insert section")?;

    let section_id = result.last_insert_rowid();
    for file in &section.files {
        sqlx::query(&format!(
            "INSERT INTO {} (section_id, file_name, file_url, file_size, mime_type, \
                             display_order, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            tables.files
        ))
        .bind(section_id)
        .bind(&file.file_name)
        .bind(&file.file_url)
        .bind(file.file_size)
        .bind(&file.mime_type)
        .bind(file.display_order)
        .bind(now)
        .execute(&mut **tx)
        .await
        .context("Failed to insert section file")?;
    }

    Ok(())
}

/// Execute a reconciliation plan against one parent's sections.
///
/// Deletes are scoped to the parent so a stale id from another entity cannot
/// touch foreign rows. File deletes cascade with their sections.
pub(crate) async fn apply_plan(
    tx: &mut Transaction<'_, Sqlite>,
    tables: SectionTables,
    parent_id: i64,
    plan: &SectionPlan,
) -> Result<()> {
    let now = Utc::now();

    for section_id in &plan.delete_ids {
        sqlx::query(&format!(
            "DELETE FROM {} WHERE id = ? AND {} = ?",
            tables.sections, tables.parent_fk
        ))
        .bind(section_id)
        .bind(parent_id)
        .execute(&mut **tx)
        .await
        .context("Failed to delete section")?;
    }

    for update in &plan.updates {
        sqlx::query(&format!(
            "UPDATE {} SET title = ?, title_en = ?, content = ?, content_en = ?, \
                 background_color = ?, display_order = ?, updated_at = ? \
             WHERE id = ? AND {} = ?",
            tables.sections, tables.parent_fk
        ))
        .bind(&update.scalars.title)
        .bind(&update.scalars.title_en)
        .bind(&update.scalars.content)
        .bind(&update.scalars.content_en)
        .bind(&update.scalars.background_color)
        .bind(update.scalars.display_order)
        .bind(now)
        .bind(update.id)
        .bind(parent_id)
        .execute(&mut **tx)
        .await
        .context("Failed to update section")?;

        for file_id in &update.files.delete_ids {
            sqlx::query(&format!(
                "DELETE FROM {} WHERE id = ? AND section_id = ?",
                tables.files
            ))
            .bind(file_id)
            .bind(update.id)
            .execute(&mut **tx)
            .await
            .context("Failed to delete section file")?;
        }

        for file in &update.files.inserts {
            sqlx::query(&format!(
                "INSERT INTO {} (section_id, file_name, file_url, file_size, mime_type, \
                                 display_order, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                tables.files
            ))
            .bind(update.id)
            .bind(&file.file_name)
            .bind(&file.file_url)
            .bind(file.file_size)
            .bind(&file.mime_type)
            .bind(file.display_order)
            .bind(now)
            .execute(&mut **tx)
            .await
            .context("Failed to insert section file")?;
        }

        for (file_id, new_order) in &update.files.reorders {
            sqlx::query(&format!(
                "UPDATE {} SET display_order = ? WHERE id = ? AND section_id = ?",
                tables.files
            ))
            .bind(new_order)
            .bind(file_id)
            .bind(update.id)
            .execute(&mut **tx)
            .await
            .context("Failed to reorder section file")?;
        }
    }

    for insert in &plan.inserts {
        insert_section(tx, tables, parent_id, insert).await?;
    }

    Ok(())
}
