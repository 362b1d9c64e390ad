//! Membership application repository

use crate::models::{ApplicationStatus, MembershipApplication};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Membership repository trait
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// List applications, newest first, optionally filtered by status
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<MembershipApplication>>;

    /// Get application by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<MembershipApplication>>;

    /// Find a pending or approved application for an email address.
    /// Used to enforce the one-active-application-per-email rule.
    async fn find_active_by_email(&self, email: &str) -> Result<Option<MembershipApplication>>;

    /// Store a new application (always created pending)
    async fn create(&self, application: &MembershipApplication) -> Result<MembershipApplication>;

    /// Record a review decision; returns whether the row exists
    async fn review(
        &self,
        id: i64,
        status: ApplicationStatus,
        review_notes: Option<&str>,
    ) -> Result<bool>;

    /// Delete an application; returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// SQLx-based membership repository
pub struct SqlxMembershipRepository {
    pool: SqlitePool,
}

impl SqlxMembershipRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn MembershipRepository> {
        Arc::new(Self::new(pool))
    }
}

const APPLICATION_COLUMNS: &str = "id, first_name, last_name, email, professional_grade, \
     other_professional_grade, medical_specialty, academic_degree, institutional_affiliation, \
     membership_type, research_interests, gdpr_consent, fee_consent, newsletter_consent, \
     status, review_notes, reviewed_at, created_at, updated_at";

#[async_trait]
impl MembershipRepository for SqlxMembershipRepository {
    async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<MembershipApplication>> {
        let mut sql = format!(
            "SELECT {} FROM membership_applications WHERE 1=1",
            APPLICATION_COLUMNS
        );
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to list membership applications")?;

        rows.iter().map(row_to_application).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<MembershipApplication>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM membership_applications WHERE id = ?",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get membership application by ID")?;

        row.as_ref().map(row_to_application).transpose()
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<MembershipApplication>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM membership_applications \
             WHERE email = ? AND status IN ('pending', 'approved') \
             LIMIT 1",
            APPLICATION_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to look up membership application by email")?;

        row.as_ref().map(row_to_application).transpose()
    }

    async fn create(&self, application: &MembershipApplication) -> Result<MembershipApplication> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO membership_applications
                (first_name, last_name, email, professional_grade, other_professional_grade,
                 medical_specialty, academic_degree, institutional_affiliation, membership_type,
                 research_interests, gdpr_consent, fee_consent, newsletter_consent, status,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending', ?, ?)
            "#,
        )
        .bind(&application.first_name)
        .bind(&application.last_name)
        .bind(&application.email)
        .bind(&application.professional_grade)
        .bind(&application.other_professional_grade)
        .bind(&application.medical_specialty)
        .bind(&application.academic_degree)
        .bind(&application.institutional_affiliation)
        .bind(&application.membership_type)
        .bind(&application.research_interests)
        .bind(application.gdpr_consent)
        .bind(application.fee_consent)
        .bind(application.newsletter_consent)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create membership application")?;

        Ok(MembershipApplication {
            id: result.last_insert_rowid(),
            status: ApplicationStatus::Pending,
            review_notes: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
            ..application.clone()
        })
    }

    async fn review(
        &self,
        id: i64,
        status: ApplicationStatus,
        review_notes: Option<&str>,
    ) -> Result<bool> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE membership_applications
            SET status = ?, review_notes = ?, reviewed_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(review_notes)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to review membership application")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM membership_applications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete membership application")?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_application(row: &sqlx::sqlite::SqliteRow) -> Result<MembershipApplication> {
    let status: String = row.get("status");
    let status = ApplicationStatus::from_str(&status)
        .ok_or_else(|| anyhow::anyhow!("Unknown application status: {}", status))?;

    Ok(MembershipApplication {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        professional_grade: row.get("professional_grade"),
        other_professional_grade: row.get("other_professional_grade"),
        medical_specialty: row.get("medical_specialty"),
        academic_degree: row.get("academic_degree"),
        institutional_affiliation: row.get("institutional_affiliation"),
        membership_type: row.get("membership_type"),
        research_interests: row.get("research_interests"),
        gdpr_consent: row.get("gdpr_consent"),
        fee_consent: row.get("fee_consent"),
        newsletter_consent: row.get("newsletter_consent"),
        status,
        review_notes: row.get("review_notes"),
        reviewed_at: row.get("reviewed_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxMembershipRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxMembershipRepository::new(pool)
    }

    fn test_application(email: &str) -> MembershipApplication {
        let now = Utc::now();
        MembershipApplication {
            id: 0,
            first_name: "Maria".to_string(),
            last_name: "Ionescu".to_string(),
            email: email.to_string(),
            professional_grade: "medic primar".to_string(),
            other_professional_grade: None,
            medical_specialty: "pediatrie".to_string(),
            academic_degree: None,
            institutional_affiliation: "Spitalul Clinic".to_string(),
            membership_type: "titular".to_string(),
            research_interests: "imunologie".to_string(),
            gdpr_consent: true,
            fee_consent: true,
            newsletter_consent: false,
            status: ApplicationStatus::Pending,
            review_notes: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_is_pending() {
        let repo = setup().await;
        let created = repo.create(&test_application("maria@example.com")).await.unwrap();
        assert_eq!(created.status, ApplicationStatus::Pending);
        assert!(created.reviewed_at.is_none());
    }

    #[tokio::test]
    async fn test_find_active_by_email() {
        let repo = setup().await;
        let created = repo.create(&test_application("maria@example.com")).await.unwrap();

        // Pending counts as active
        assert!(repo
            .find_active_by_email("maria@example.com")
            .await
            .unwrap()
            .is_some());

        // Approved still counts as active
        repo.review(created.id, ApplicationStatus::Approved, None)
            .await
            .unwrap();
        assert!(repo
            .find_active_by_email("maria@example.com")
            .await
            .unwrap()
            .is_some());

        // Rejected frees the email
        repo.review(created.id, ApplicationStatus::Rejected, Some("incomplet"))
            .await
            .unwrap();
        assert!(repo
            .find_active_by_email("maria@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_review_stamps_reviewed_at() {
        let repo = setup().await;
        let created = repo.create(&test_application("maria@example.com")).await.unwrap();

        assert!(repo
            .review(created.id, ApplicationStatus::Approved, Some("ok"))
            .await
            .unwrap());

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.status, ApplicationStatus::Approved);
        assert_eq!(found.review_notes.as_deref(), Some("ok"));
        assert!(found.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let repo = setup().await;
        let a = repo.create(&test_application("a@example.com")).await.unwrap();
        repo.create(&test_application("b@example.com")).await.unwrap();
        repo.review(a.id, ApplicationStatus::Rejected, None).await.unwrap();

        let pending = repo.list(Some(ApplicationStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].email, "b@example.com");

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = setup().await;
        let created = repo.create(&test_application("maria@example.com")).await.unwrap();
        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
