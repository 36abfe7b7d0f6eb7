use thiserror::Error;

use ims_core::DomainError;

use crate::storage::StorageError;

/// Failure of a service operation that touches file storage.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),
}

pub type InventoryResult<T> = Result<T, InventoryError>;
