//! File storage contract.
//!
//! Implementations live in `ims-infra`; the service only sees this trait.

use std::path::PathBuf;

use thiserror::Error;

use crate::item::Item;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file type for {file_name:?}: file must end in .{expected}")]
    InvalidExtension { file_name: String, expected: String },

    #[error("malformed record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("item {id} cannot be stored: {field} contains a delimiter or line break")]
    UnencodableField { id: String, field: &'static str },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}

/// Loads and saves the full item list from/to a named file.
pub trait InventoryFileStorage: Send + Sync {
    /// Read every item in `file_name`. Any unreadable record fails the whole load.
    fn load_all(&self, file_name: &str) -> Result<Vec<Item>, StorageError>;

    /// Write `items` to `file_name`, replacing its previous contents.
    fn save_all(&self, items: &[Item], file_name: &str) -> Result<(), StorageError>;
}

impl<S> InventoryFileStorage for std::sync::Arc<S>
where
    S: InventoryFileStorage + ?Sized,
{
    fn load_all(&self, file_name: &str) -> Result<Vec<Item>, StorageError> {
        (**self).load_all(file_name)
    }

    fn save_all(&self, items: &[Item], file_name: &str) -> Result<(), StorageError> {
        (**self).save_all(items, file_name)
    }
}
