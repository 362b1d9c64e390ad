//! SCIPI CMS - content management backend for the society's website

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scipi_cms::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            AdminRepository, SqlxAdminRepository, SqlxCarouselRepository, SqlxContactRepository,
            SqlxEventRepository, SqlxMembershipRepository, SqlxNewsRepository,
            SqlxPartnerRepository, SqlxProjectRepository, SqlxResourceRepository,
            SqlxSessionRepository,
        },
    },
    services::{password::hash_password, AuthService},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scipi_cms=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting SCIPI CMS...");

    let config = Arc::new(Config::load_with_env(Path::new("config.yml"))?);
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    let admin_repo = SqlxAdminRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());

    bootstrap_admin(&config, admin_repo.as_ref()).await?;

    let auth_service = Arc::new(AuthService::new(
        admin_repo,
        session_repo,
        config.auth.token_secret.clone(),
        config.auth.session_days,
    ));

    let state = AppState {
        config: config.clone(),
        auth_service,
        partner_repo: SqlxPartnerRepository::boxed(pool.clone()),
        project_repo: SqlxProjectRepository::boxed(pool.clone()),
        event_repo: SqlxEventRepository::boxed(pool.clone()),
        resource_repo: SqlxResourceRepository::boxed(pool.clone()),
        news_repo: SqlxNewsRepository::boxed(pool.clone()),
        carousel_repo: SqlxCarouselRepository::boxed(pool.clone()),
        contact_repo: SqlxContactRepository::boxed(pool.clone()),
        membership_repo: SqlxMembershipRepository::boxed(pool.clone()),
    };

    let router = api::build_router(state)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}

/// Create the configured bootstrap admin when none with that email exists.
/// Skipped entirely when the credentials are not configured.
async fn bootstrap_admin(config: &Config, admin_repo: &dyn AdminRepository) -> Result<()> {
    let (email, password) = match (&config.auth.bootstrap_email, &config.auth.bootstrap_password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Ok(()),
    };

    if admin_repo.get_by_email(email).await?.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password).context("Failed to hash bootstrap password")?;
    admin_repo
        .create(email, &password_hash, "Administrator")
        .await?;
    tracing::info!("Bootstrap admin created: {}", email);

    Ok(())
}
