use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use axum::http::HeaderValue;
use pressgrid_core::category::{DeletePolicy, DEFAULT_MAX_DEPTH};
use pressgrid_core::locale::DEFAULT_LOCALE;
use pressgrid_core::upload::{DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_TEMP_FILE_MAX_AGE_SECS};
use pressgrid_grid::GridSettings;

use crate::auth::jwt::JwtConfig;

/// A configuration value that is missing or cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be set in the environment")]
    Missing { key: &'static str },

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Read `key` from the environment, falling back to `default` when unset.
pub(crate) fn env_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration.
    pub jwt: JwtConfig,
    /// Postgres connection string; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Root directory of the file store (default: `storage/uploads`).
    pub upload_dir: PathBuf,
    /// Largest accepted upload in bytes (default: 5 MiB).
    pub max_upload_bytes: usize,
    /// Age after which unused temporary uploads are purged (default: 1 day).
    pub temp_file_max_age_secs: u64,
    /// How often the purge runs (default: `900`).
    pub upload_purge_interval_secs: u64,
    /// Locale, delete policy and depth limit for the category grid.
    pub grid: GridSettings,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `30`                    |
    /// | `DATABASE_URL`               | unset (in-memory store) |
    /// | `UPLOAD_DIR`                 | `storage/uploads`       |
    /// | `MAX_UPLOAD_BYTES`           | `5242880`               |
    /// | `TEMP_FILE_MAX_AGE_SECS`     | `86400`                 |
    /// | `UPLOAD_PURGE_INTERVAL_SECS` | `900`                   |
    /// | `PRIMARY_LOCALE`             | `en_US`                 |
    /// | `CATEGORY_DELETE_POLICY`     | `reject`                |
    /// | `CATEGORY_MAX_DEPTH`         | `64`                    |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                key: "CORS_ORIGINS",
                reason: format!("'{origin}': {e}"),
            })?;
        }

        let delete_policy = match std::env::var("CATEGORY_DELETE_POLICY") {
            Ok(name) => DeletePolicy::from_name(name.trim()).map_err(|e| ConfigError::Invalid {
                key: "CATEGORY_DELETE_POLICY",
                reason: e.to_string(),
            })?,
            Err(_) => DeletePolicy::default(),
        };

        let max_depth: usize = env_or("CATEGORY_MAX_DEPTH", DEFAULT_MAX_DEPTH)?;
        if max_depth == 0 {
            return Err(ConfigError::Invalid {
                key: "CATEGORY_MAX_DEPTH",
                reason: "must be at least 1".into(),
            });
        }

        let grid = GridSettings {
            primary_locale: std::env::var("PRIMARY_LOCALE")
                .unwrap_or_else(|_| DEFAULT_LOCALE.into()),
            delete_policy,
            max_depth,
        };

        Ok(Self {
            host,
            port: env_or("PORT", 3000)?,
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30)?,
            jwt: JwtConfig::from_env()?,
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "storage/uploads".into())
                .into(),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            temp_file_max_age_secs: env_or(
                "TEMP_FILE_MAX_AGE_SECS",
                DEFAULT_TEMP_FILE_MAX_AGE_SECS,
            )?,
            upload_purge_interval_secs: env_or("UPLOAD_PURGE_INTERVAL_SECS", 900)?,
            grid,
        })
    }
}
