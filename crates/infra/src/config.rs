//! Configuration loading and representation.

use std::env;
use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_FILE_EXTENSION: &str = "csv";
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// Where inventory files live and which names are accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Base directory for relative file names.
    pub data_dir: PathBuf,
    /// Required file extension, without the leading dot.
    pub file_extension: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }
}

/// Process configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub low_stock_threshold: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl AppConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `IMS_DATA_DIR` - directory for relative file names (default: `data`)
    /// - `IMS_FILE_EXTENSION` - required extension, no dot (default: `csv`)
    /// - `IMS_LOW_STOCK_THRESHOLD` - low-stock threshold, >= 0 (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(dir) = read("IMS_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }

        if let Some(ext) = read("IMS_FILE_EXTENSION") {
            let ext = ext.trim_start_matches('.');
            if !ext.is_empty() {
                config.storage.file_extension = ext.to_string();
            }
        }

        if let Some(raw) = read("IMS_LOW_STOCK_THRESHOLD") {
            match raw.parse::<i32>() {
                Ok(t) if t >= 0 => config.low_stock_threshold = t,
                _ => warn!(
                    value = %raw,
                    default = DEFAULT_LOW_STOCK_THRESHOLD,
                    "invalid IMS_LOW_STOCK_THRESHOLD; using default"
                ),
            }
        }

        config
    }
}
