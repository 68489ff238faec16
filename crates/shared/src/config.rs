//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Deployment environment, drives log format and verbosity.
    #[serde(default)]
    pub environment: Environment,
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// HTTP Basic credentials guarding the file routes.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer machine: human-readable logs, debug level.
    #[default]
    Local,
    /// Shared development deployment: JSON logs, debug level.
    Development,
    /// Production: JSON logs, info level.
    Production,
}

impl Environment {
    /// Whether logs should be emitted as JSON lines.
    #[must_use]
    pub const fn json_logs(self) -> bool {
        matches!(self, Self::Development | Self::Production)
    }

    /// Default `tracing` filter directive when `RUST_LOG` is not set.
    #[must_use]
    pub const fn default_log_filter(self) -> &'static str {
        match self {
            Self::Local | Self::Development => "filekeep=debug,tower_http=debug",
            Self::Production => "filekeep=info,tower_http=info",
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Upper bound in seconds on draining in-flight requests after a shutdown signal.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    5
}

fn default_shutdown_timeout() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations when the server starts.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_run_migrations() -> bool {
    true
}

/// Blob storage provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// Process memory; contents vanish on restart.
    Memory,
}

impl StorageProvider {
    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Storage type tag recorded on every catalog row.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

impl Default for StorageProvider {
    fn default() -> Self {
        Self::local_fs("./data/files")
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage provider configuration.
    #[serde(default)]
    pub provider: StorageProvider,
    /// Maximum accepted upload body in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl StorageConfig {
    /// Default upload limit: 32MB.
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 << 20;
}

fn default_max_upload_bytes() -> usize {
    StorageConfig::DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// HTTP Basic authentication configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Expected username.
    pub username: Option<String>,
    /// Expected password.
    pub password: Option<String>,
}

impl AuthConfig {
    /// Returns the configured credentials, or `None` when auth is disabled.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Rejects a username without a password or the reverse.
    ///
    /// # Errors
    ///
    /// Returns an error if exactly one of the two fields is set.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.username.is_some() == self.password.is_some() {
            return Ok(());
        }
        Err(config::ConfigError::Message(
            "auth.username and auth.password must be set together".to_string(),
        ))
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or auth is only half configured.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FILEKEEP").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.auth.validate()?;
        Ok(config)
    }
}
