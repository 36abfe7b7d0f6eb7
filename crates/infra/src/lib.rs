//! Infrastructure layer: file storage adapters and configuration.

pub mod config;
pub mod csv_storage;

pub use config::{AppConfig, StorageConfig};
pub use csv_storage::CsvInventoryStorage;
