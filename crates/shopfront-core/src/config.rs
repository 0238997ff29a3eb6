//! Configuration module
//!
//! This module provides configuration structures for the API and services,
//! including server, database, storage, upload limits and temporary asset staging.

use std::env;
use std::time::Duration;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_FILE_SIZE_MB: usize = 5;
const SWEEP_INTERVAL_SECS: u64 = 300;
const MAX_IDLE_SECS: u64 = 1800;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
// Upper bounds keep byte and timer arithmetic from overflowing
const MAX_FILE_SIZE_MB_LIMIT: usize = 1024;
const MAX_SWEEP_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

/// Console log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn from_value(value: Option<String>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// HTTP server and database settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Maximum number of requests processed at once
    pub http_concurrency_limit: usize,
    pub log_format: LogFormat,
}

/// Object storage settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    // Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

/// Limits applied to temporary image uploads
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_extensions: split_list("jpg,jpeg,png,gif,webp"),
            allowed_content_types: split_list("image/jpeg,image/png,image/gif,image/webp"),
        }
    }
}

/// Timing of the background sweep over abandoned upload sessions
#[derive(Clone, Debug)]
pub struct StagingConfig {
    pub sweep_interval_secs: u64,
    /// Sessions idle for longer than this (and not active) are swept.
    pub max_idle_secs: u64,
}

impl StagingConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn max_idle(&self) -> Duration {
        Duration::from_secs(self.max_idle_secs)
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: SWEEP_INTERVAL_SECS,
            max_idle_secs: MAX_IDLE_SECS,
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub uploads: UploadLimits,
    pub staging: StagingConfig,
}

impl Config {
    /// Load configuration from the process environment (and `.env` when present)
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = split_list_raw(&lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string()));

        let server = ServerConfig {
            port: lookup("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            database_url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), MAX_CONNECTIONS),
            db_timeout_seconds: parse_or(lookup("DB_TIMEOUT_SECONDS"), CONNECTION_TIMEOUT_SECS),
            http_concurrency_limit: parse_or(
                lookup("HTTP_CONCURRENCY_LIMIT"),
                HTTP_CONCURRENCY_LIMIT,
            ),
            log_format: LogFormat::from_value(lookup("LOG_FORMAT")),
        };

        let backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let storage = StorageConfig {
            backend,
            s3_bucket: non_empty(lookup("S3_BUCKET")),
            s3_region: non_empty(lookup("S3_REGION")).or_else(|| non_empty(lookup("AWS_REGION"))),
            s3_endpoint: non_empty(lookup("S3_ENDPOINT")),
            local_storage_path: non_empty(lookup("LOCAL_STORAGE_PATH")),
            local_storage_base_url: non_empty(lookup("LOCAL_STORAGE_BASE_URL")),
        };

        let max_file_size_mb = parse_or(lookup("MAX_FILE_SIZE_MB"), MAX_FILE_SIZE_MB);
        if max_file_size_mb > MAX_FILE_SIZE_MB_LIMIT {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB must be at most {}",
                MAX_FILE_SIZE_MB_LIMIT
            ));
        }

        let defaults = UploadLimits::default();
        let uploads = UploadLimits {
            max_file_size_bytes: max_file_size_mb
                .checked_mul(1024 * 1024)
                .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?,
            allowed_extensions: lookup("ALLOWED_EXTENSIONS")
                .map(|s| split_list(&s))
                .unwrap_or(defaults.allowed_extensions),
            allowed_content_types: lookup("ALLOWED_CONTENT_TYPES")
                .map(|s| split_list(&s))
                .unwrap_or(defaults.allowed_content_types),
        };

        let staging = StagingConfig {
            sweep_interval_secs: parse_or(
                lookup("TEMP_SESSION_SWEEP_INTERVAL_SECS"),
                SWEEP_INTERVAL_SECS,
            ),
            max_idle_secs: parse_or(lookup("TEMP_SESSION_MAX_IDLE_SECS"), MAX_IDLE_SECS),
        };

        let config = Config {
            server,
            storage,
            uploads,
            staging,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.server.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if !self.server.database_url.starts_with("postgres://")
            && !self.server.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.storage.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.storage.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.uploads.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than zero"));
        }
        if self.uploads.max_file_size_bytes > MAX_FILE_SIZE_MB_LIMIT * 1024 * 1024 {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB must be at most {}",
                MAX_FILE_SIZE_MB_LIMIT
            ));
        }

        if self.server.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than zero"
            ));
        }

        if self.staging.sweep_interval_secs == 0 {
            return Err(anyhow::anyhow!(
                "TEMP_SESSION_SWEEP_INTERVAL_SECS must be greater than zero"
            ));
        }
        if self.staging.sweep_interval_secs > MAX_SWEEP_INTERVAL_SECS {
            return Err(anyhow::anyhow!(
                "TEMP_SESSION_SWEEP_INTERVAL_SECS must be at most {}",
                MAX_SWEEP_INTERVAL_SECS
            ));
        }

        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn split_list_raw(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    split_list_raw(value)
        .into_iter()
        .map(|s| s.to_lowercase())
        .collect()
}
