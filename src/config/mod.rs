//! Configuration loading and management

use crate::core::error::{CatalogError, CatalogResult, ConfigError};
use crate::core::product::MAX_PRODUCT_ID;
use crate::core::query::{DEFAULT_PAGE_SIZE, Query};
use crate::storage::fallback::DEFAULT_FALLBACK_RECORDS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings of the remote product collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the REST server (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Collection path below the base URL
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Bound on every request, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_collection() -> String {
    "products".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            collection: default_collection(),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `{base_url}/{collection}` without duplicate slashes
    pub fn collection_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.collection.trim_matches('/')
        )
    }
}

/// Offline substitute settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// When disabled, an unreachable remote yields an empty page
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number of synthetic records
    #[serde(default = "default_record_count")]
    pub record_count: usize,
}

fn default_true() -> bool {
    true
}

fn default_record_count() -> usize {
    DEFAULT_FALLBACK_RECORDS
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            record_count: DEFAULT_FALLBACK_RECORDS,
        }
    }
}

/// Complete configuration of the catalog query engine
///
/// # Example
/// ```yaml
/// remote:
///   base_url: http://localhost:3000
///   timeout_ms: 3000
/// fallback:
///   record_count: 25
/// default_page_size: 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub remote: RemoteConfig,

    #[serde(default)]
    pub fallback: FallbackConfig,

    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl CatalogConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            CatalogError::Config(ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.remote.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "remote.base_url".to_string(),
                value: self.remote.base_url.clone(),
                message: "must be an http(s) URL".to_string(),
            });
        }
        if self.remote.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote.timeout_ms".to_string(),
                value: "0".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.fallback.record_count > MAX_PRODUCT_ID as usize {
            return Err(ConfigError::InvalidValue {
                field: "fallback.record_count".to_string(),
                value: self.fallback.record_count.to_string(),
                message: format!("must not exceed {}", MAX_PRODUCT_ID),
            });
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_page_size".to_string(),
                value: "0".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Unfiltered first page at the configured page size
    pub fn first_page(&self) -> Query {
        Query::new(1, self.default_page_size)
    }

    /// Create a default configuration pointing at a local server
    pub fn default_config() -> Self {
        Self {
            remote: RemoteConfig::new("http://localhost:3000"),
            fallback: FallbackConfig::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
