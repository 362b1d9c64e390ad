//! Database layer
//!
//! SQLite persistence for the SCIPI website: pool creation, code-based
//! migrations, and per-entity repositories.
//!
//! # Usage
//!
//! ```ignore
//! use scipi_cms::config::DatabaseConfig;
//! use scipi_cms::db::{create_pool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool};
