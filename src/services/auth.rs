//! Authentication service
//!
//! Admin login/logout and session validation. A login creates a session row
//! (uuid id, configurable expiry) and returns a signed token:
//!
//! ```text
//! base64url(session_id).expires_unix.base64url(hmac_sha256(secret, payload))
//! ```
//!
//! where `payload` is the first two segments. The HMAC makes the token
//! tamper-proof; the session row makes it revocable. Validation requires
//! both: a valid signature on a deleted session still fails.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::repositories::{AdminRepository, SessionRepository};
use crate::models::{Admin, Session};
use crate::services::password::verify_password;

type HmacSha256 = Hmac<Sha256>;

/// Error types for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Invalid credentials or token
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Authentication service
pub struct AuthService {
    admin_repo: Arc<dyn AdminRepository>,
    session_repo: Arc<dyn SessionRepository>,
    token_secret: String,
    session_days: i64,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(
        admin_repo: Arc<dyn AdminRepository>,
        session_repo: Arc<dyn SessionRepository>,
        token_secret: String,
        session_days: i64,
    ) -> Self {
        Self {
            admin_repo,
            session_repo,
            token_secret,
            session_days,
        }
    }

    /// Login with email and password.
    ///
    /// On success, creates a session row and returns the admin together with
    /// the signed token to set as the auth cookie.
    ///
    /// # Errors
    ///
    /// - `AuthenticationError` for unknown email or wrong password, with the
    ///   same message for both
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Admin, String), AuthServiceError> {
        let admin = self
            .admin_repo
            .get_by_email(email)
            .await
            .context("Failed to look up admin")?
            .ok_or_else(|| {
                AuthServiceError::AuthenticationError("Invalid email or password".to_string())
            })?;

        let password_valid = verify_password(password, &admin.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(AuthServiceError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            admin_id: admin.id,
            expires_at: now + Duration::days(self.session_days),
            created_at: now,
        };

        let session = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        let token = self.sign_token(&session.id, session.expires_at)?;

        Ok((admin, token))
    }

    /// Logout: delete the session behind the token.
    ///
    /// Tokens that fail verification are ignored; logout never errors on
    /// bad input.
    pub async fn logout(&self, token: &str) -> Result<(), AuthServiceError> {
        if let Some((session_id, _)) = self.verify_token(token) {
            self.session_repo
                .delete(&session_id)
                .await
                .context("Failed to delete session")?;
        }
        Ok(())
    }

    /// Validate a token and return the associated admin.
    ///
    /// Steps: verify the HMAC and embedded expiry, load the session row
    /// (revocation check), delete it lazily if past its stored expiry, then
    /// load the admin. Any failure yields `None`.
    pub async fn validate_token(&self, token: &str) -> Result<Option<Admin>, AuthServiceError> {
        let (session_id, _expires_at) = match self.verify_token(token) {
            Some(parts) => parts,
            None => return Ok(None),
        };

        let session = match self
            .session_repo
            .get_by_id(&session_id)
            .await
            .context("Failed to get session")?
        {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            // Lazy cleanup of the expired row
            let _ = self.session_repo.delete(&session_id).await;
            return Ok(None);
        }

        let admin = self
            .admin_repo
            .get_by_id(session.admin_id)
            .await
            .context("Failed to get admin")?;

        Ok(admin)
    }

    /// Delete all expired sessions. Maintenance operation.
    pub async fn cleanup_expired_sessions(&self) -> Result<i64, AuthServiceError> {
        let count = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to delete expired sessions")?;

        Ok(count)
    }

    /// Sign a token for a session id and expiry.
    fn sign_token(
        &self,
        session_id: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthServiceError> {
        let sid = BASE64URL_NOPAD.encode(session_id.as_bytes());
        let payload = format!("{}.{}", sid, expires_at.timestamp());

        let mut mac = HmacSha256::new_from_slice(self.token_secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to build HMAC: {}", e))?;
        mac.update(payload.as_bytes());
        let tag = BASE64URL_NOPAD.encode(&mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, tag))
    }

    /// Verify a token's signature and embedded expiry.
    ///
    /// Returns the session id and expiry on success.
    fn verify_token(&self, token: &str) -> Option<(String, DateTime<Utc>)> {
        let mut parts = token.splitn(3, '.');
        let sid_b64 = parts.next()?;
        let expires_str = parts.next()?;
        let tag_b64 = parts.next()?;

        let payload = format!("{}.{}", sid_b64, expires_str);
        let mut mac = HmacSha256::new_from_slice(self.token_secret.as_bytes()).ok()?;
        mac.update(payload.as_bytes());
        let tag = BASE64URL_NOPAD.decode(tag_b64.as_bytes()).ok()?;
        // Constant-time comparison
        mac.verify_slice(&tag).ok()?;

        let expires_unix: i64 = expires_str.parse().ok()?;
        let expires_at = Utc.timestamp_opt(expires_unix, 0).single()?;
        if expires_at < Utc::now() {
            return None;
        }

        let sid_bytes = BASE64URL_NOPAD.decode(sid_b64.as_bytes()).ok()?;
        let session_id = String::from_utf8(sid_bytes).ok()?;

        Some((session_id, expires_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxAdminRepository, SqlxSessionRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::services::password::hash_password;
    use sqlx::SqlitePool;

    async fn setup(session_days: i64) -> (SqlitePool, AuthService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let admin_repo = SqlxAdminRepository::boxed(pool.clone());
        let session_repo = SqlxSessionRepository::boxed(pool.clone());
        let service = AuthService::new(
            admin_repo,
            session_repo,
            "test-secret".to_string(),
            session_days,
        );

        (pool, service)
    }

    async fn insert_admin(pool: &SqlitePool, email: &str, password: &str) {
        let hash = hash_password(password).unwrap();
        sqlx::query("INSERT INTO admins (email, password_hash, name) VALUES (?, ?, ?)")
            .bind(email)
            .bind(hash)
            .bind("Test Admin")
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_login_returns_valid_token() {
        let (pool, service) = setup(7).await;
        insert_admin(&pool, "admin@scipi.ro", "parola123").await;

        let (admin, token) = service.login("admin@scipi.ro", "parola123").await.unwrap();
        assert_eq!(admin.email, "admin@scipi.ro");

        let validated = service
            .validate_token(&token)
            .await
            .unwrap()
            .expect("Token should validate");
        assert_eq!(validated.id, admin.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password_fails() {
        let (pool, service) = setup(7).await;
        insert_admin(&pool, "admin@scipi.ro", "parola123").await;

        let result = service.login("admin@scipi.ro", "gresita").await;
        assert!(matches!(
            result,
            Err(AuthServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_email_fails() {
        let (_pool, service) = setup(7).await;

        let result = service.login("necunoscut@scipi.ro", "parola123").await;
        assert!(matches!(
            result,
            Err(AuthServiceError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let (pool, service) = setup(7).await;
        insert_admin(&pool, "admin@scipi.ro", "parola123").await;

        let (_, token) = service.login("admin@scipi.ro", "parola123").await.unwrap();

        // Flip a character in the signature segment
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let result = service.validate_token(&tampered).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let (_pool, service) = setup(7).await;

        assert!(service.validate_token("").await.unwrap().is_none());
        assert!(service.validate_token("abc").await.unwrap().is_none());
        assert!(service
            .validate_token("a.b.c.d.e")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_revoked_session_fails_despite_valid_signature() {
        let (pool, service) = setup(7).await;
        insert_admin(&pool, "admin@scipi.ro", "parola123").await;

        let (_, token) = service.login("admin@scipi.ro", "parola123").await.unwrap();
        service.logout(&token).await.unwrap();

        // Signature is still valid, but the session row is gone
        let result = service.validate_token(&token).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        // Negative lifetime: the embedded expiry is already in the past
        let (pool, service) = setup(-1).await;
        insert_admin(&pool, "admin@scipi.ro", "parola123").await;

        let (_, token) = service.login("admin@scipi.ro", "parola123").await.unwrap();

        let result = service.validate_token(&token).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_row_deleted_lazily() {
        let (pool, service) = setup(7).await;
        insert_admin(&pool, "admin@scipi.ro", "parola123").await;

        let (_, token) = service.login("admin@scipi.ro", "parola123").await.unwrap();

        // Expire the stored row while the token's embedded expiry stays valid
        sqlx::query("UPDATE sessions SET expires_at = datetime('now', '-1 day')")
            .execute(&pool)
            .await
            .unwrap();

        let result = service.validate_token(&token).await.unwrap();
        assert!(result.is_none());

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.0, 0, "expired row should be deleted on lookup");
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let (pool, service) = setup(7).await;
        insert_admin(&pool, "admin@scipi.ro", "parola123").await;
        let (_, token) = service.login("admin@scipi.ro", "parola123").await.unwrap();

        let other = {
            let admin_repo = SqlxAdminRepository::boxed(pool.clone());
            let session_repo = SqlxSessionRepository::boxed(pool.clone());
            AuthService::new(admin_repo, session_repo, "other-secret".to_string(), 7)
        };

        let result = other.validate_token(&token).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_logout_with_garbage_token_is_ok() {
        let (_pool, service) = setup(7).await;
        assert!(service.logout("not-a-token").await.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_expired_sessions() {
        let (pool, service) = setup(-1).await;
        insert_admin(&pool, "admin@scipi.ro", "parola123").await;
        service.login("admin@scipi.ro", "parola123").await.unwrap();

        let count = service.cleanup_expired_sessions().await.unwrap();
        assert_eq!(count, 1);
    }
}
