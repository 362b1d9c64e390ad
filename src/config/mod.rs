//! Configuration management
//!
//! Configuration is loaded from a `config.yml` file; every field has a
//! default so a missing or partial file still yields a runnable setup.
//! `SCIPI_*` environment variables override file values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin (cookie-based auth needs an explicit origin)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/scipi.db".to_string()
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Upload directory path
    #[serde(default = "default_upload_path")]
    pub path: PathBuf,
    /// Maximum image size in bytes (default: 5MB)
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u64,
    /// Maximum document size in bytes (default: 10MB)
    #[serde(default = "default_max_document_size")]
    pub max_document_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_upload_path(),
            max_image_size: default_max_image_size(),
            max_document_size: default_max_document_size(),
        }
    }
}

fn default_upload_path() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_image_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_max_document_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign session tokens
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Session lifetime in days
    #[serde(default = "default_session_days")]
    pub session_days: i64,
    /// Bootstrap admin email, created at startup if missing
    #[serde(default)]
    pub bootstrap_email: Option<String>,
    /// Bootstrap admin password
    #[serde(default)]
    pub bootstrap_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            session_days: default_session_days(),
            bootstrap_email: None,
            bootstrap_password: None,
        }
    }
}

fn default_token_secret() -> String {
    // Development placeholder. Override via config.yml or SCIPI_AUTH_TOKEN_SECRET.
    "change-me-in-production".to_string()
}

fn default_session_days() -> i64 {
    7
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - `SCIPI_SERVER_HOST` / `SCIPI_SERVER_PORT` / `SCIPI_SERVER_CORS_ORIGIN`
    /// - `SCIPI_DATABASE_URL`
    /// - `SCIPI_UPLOAD_PATH`
    /// - `SCIPI_AUTH_TOKEN_SECRET` / `SCIPI_AUTH_SESSION_DAYS`
    /// - `SCIPI_AUTH_BOOTSTRAP_EMAIL` / `SCIPI_AUTH_BOOTSTRAP_PASSWORD`
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SCIPI_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SCIPI_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("SCIPI_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }

        if let Ok(url) = std::env::var("SCIPI_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(path) = std::env::var("SCIPI_UPLOAD_PATH") {
            self.upload.path = PathBuf::from(path);
        }

        if let Ok(secret) = std::env::var("SCIPI_AUTH_TOKEN_SECRET") {
            self.auth.token_secret = secret;
        }
        if let Ok(days) = std::env::var("SCIPI_AUTH_SESSION_DAYS") {
            if let Ok(days) = days.parse::<i64>() {
                self.auth.session_days = days;
            }
        }
        if let Ok(email) = std::env::var("SCIPI_AUTH_BOOTSTRAP_EMAIL") {
            self.auth.bootstrap_email = Some(email);
        }
        if let Ok(password) = std::env::var("SCIPI_AUTH_BOOTSTRAP_PASSWORD") {
            self.auth.bootstrap_password = Some(password);
        }
    }
}

/// Format YAML parsing error with location information
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Tests that touch environment variables serialize on this mutex.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        super::CONFIG_ENV_MUTEX
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn clear_env() {
        for var in [
            "SCIPI_SERVER_HOST",
            "SCIPI_SERVER_PORT",
            "SCIPI_SERVER_CORS_ORIGIN",
            "SCIPI_DATABASE_URL",
            "SCIPI_UPLOAD_PATH",
            "SCIPI_AUTH_TOKEN_SECRET",
            "SCIPI_AUTH_SESSION_DAYS",
            "SCIPI_AUTH_BOOTSTRAP_EMAIL",
            "SCIPI_AUTH_BOOTSTRAP_PASSWORD",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = std::path::Path::new("nonexistent_config.yml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "data/scipi.db");
        assert_eq!(config.upload.path, PathBuf::from("uploads"));
        assert_eq!(config.auth.session_days, 7);
        assert!(config.auth.bootstrap_email.is_none());
    }

    #[test]
    fn test_load_empty_file_returns_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upload.max_image_size, 5 * 1024 * 1024);
        assert_eq!(config.upload.max_document_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 3000\n").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "data/scipi.db");
    }

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
server:
  host: "127.0.0.1"
  port: 9000
  cors_origin: "https://scipi.ro"
database:
  url: "data/site.db"
upload:
  path: "storage"
  max_image_size: 1048576
auth:
  token_secret: "s3cret"
  session_days: 14
  bootstrap_email: "admin@scipi.ro"
  bootstrap_password: "admin123"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origin, "https://scipi.ro");
        assert_eq!(config.database.url, "data/site.db");
        assert_eq!(config.upload.path, PathBuf::from("storage"));
        assert_eq!(config.upload.max_image_size, 1048576);
        assert_eq!(config.auth.token_secret, "s3cret");
        assert_eq!(config.auth.session_days, 14);
        assert_eq!(
            config.auth.bootstrap_email.as_deref(),
            Some("admin@scipi.ro")
        );
    }

    #[test]
    fn test_load_invalid_yaml_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: not_a_number\n").unwrap();

        let result = Config::load(file.path());

        assert!(result.is_err());
    }

    #[test]
    fn test_env_override() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 8080\n").unwrap();

        std::env::set_var("SCIPI_SERVER_PORT", "4000");
        std::env::set_var("SCIPI_DATABASE_URL", "data/other.db");
        std::env::set_var("SCIPI_AUTH_TOKEN_SECRET", "env-secret");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.database.url, "data/other.db");
        assert_eq!(config.auth.token_secret, "env-secret");

        clear_env();
    }

    #[test]
    fn test_env_override_invalid_port_ignored() {
        let _guard = lock_env();
        clear_env();

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "server:\n  port: 8080\n").unwrap();

        std::env::set_var("SCIPI_SERVER_PORT", "not_a_number");

        let config = Config::load_with_env(file.path()).unwrap();

        assert_eq!(config.server.port, 8080);

        clear_env();
    }
}
