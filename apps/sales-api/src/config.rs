//! # API Configuration
//!
//! Configuration for the sales API server.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SALESDESK_PORT=8080                                                │
//! │     SALESDESK_DB_PATH=/var/lib/salesdesk/sales.db                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, otherwise the platform config dir:                │
//! │     ~/.config/salesdesk/sales-api.toml (Linux)                         │
//! │     ~/Library/Application Support/com.salesdesk.salesdesk/... (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:5000, ./salesdesk.db, 10 per page                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sales-api.toml
//! bind_addr = "127.0.0.1"
//! port = 5000
//! db_path = "./salesdesk.db"
//! default_page_size = 10
//! max_page_size = 100
//! search_fields = ["customerName", "phoneNumber", "productName"]
//! ```

use salesdesk_core::query::{EngineConfig, SearchField};
use salesdesk_core::validation::validate_page_size;
use salesdesk_core::{ValidationError, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "sales-api.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Sales API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Interface to listen on.
    pub bind_addr: String,

    /// HTTP port. Default: 5000
    pub port: u16,

    /// SQLite record store.
    pub db_path: PathBuf,

    /// Page size when the request names none.
    pub default_page_size: u32,

    /// Upper clamp for `limit`. Never above [`MAX_PAGE_SIZE`].
    pub max_page_size: u32,

    /// Fields the `search` parameter matches against.
    pub search_fields: Vec<SearchField>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            db_path: PathBuf::from("./salesdesk.db"),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            search_fields: EngineConfig::default().search_fields,
        }
    }
}

impl ApiConfig {
    /// Loads configuration: defaults, then the TOML file, then `SALESDESK_*`
    /// environment overrides, then validation.
    ///
    /// An explicitly given `config_path` must exist; the platform default
    /// is optional.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            addr = %config.bind_addr,
            port = config.port,
            db_path = %config.db_path.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reads a TOML file. Keys it leaves out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `SALESDESK_*` overrides read through `lookup`.
    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("SALESDESK_PORT") {
            self.port = parse_env("SALESDESK_PORT", &port)?;
        }

        if let Some(addr) = lookup("SALESDESK_BIND_ADDR") {
            self.bind_addr = addr.trim().to_string();
        }

        if let Some(path) = lookup("SALESDESK_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.db_path = PathBuf::from(path);
        }

        if let Some(size) = lookup("SALESDESK_MAX_PAGE_SIZE") {
            self.max_page_size = parse_env("SALESDESK_MAX_PAGE_SIZE", &size)?;
        }

        if let Some(size) = lookup("SALESDESK_DEFAULT_PAGE_SIZE") {
            self.default_page_size = parse_env("SALESDESK_DEFAULT_PAGE_SIZE", &size)?;
        }

        // Comma-separated: "customerName,phoneNumber,productName"
        if let Some(fields) = lookup("SALESDESK_SEARCH_FIELDS") {
            self.search_fields = fields
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(|field| {
                    field.parse().map_err(|_| ConfigError::InvalidValue {
                        key: "SALESDESK_SEARCH_FIELDS".to_string(),
                        value: field.to_string(),
                    })
                })
                .collect::<Result<_, _>>()?;
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_page_size("max_page_size", self.max_page_size)?;
        validate_page_size("default_page_size", self.default_page_size)?;

        if self.default_page_size > self.max_page_size {
            return Err(ValidationError::OutOfRange {
                field: "default_page_size".to_string(),
                min: 1,
                max: self.max_page_size as i64,
            }
            .into());
        }

        if self.search_fields.is_empty() {
            return Err(ValidationError::Required {
                field: "search_fields".to_string(),
            }
            .into());
        }

        self.socket_addr()?;
        Ok(())
    }

    /// The address the server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "bind_addr".to_string(),
                value: self.bind_addr.clone(),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Query engine settings derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            search_fields: self.search_fields.clone(),
        }
    }

    /// Returns the default config file path for this platform.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "salesdesk", "salesdesk")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
