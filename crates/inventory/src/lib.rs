//! Inventory domain module.
//!
//! Items, stock movements and low-stock policies, plus the service that
//! enforces the business rules over a repository and a file storage backend.
//! Storage is only seen through traits here; adapters live in `ims-infra`.

pub mod error;
pub mod item;
pub mod movement;
pub mod policy;
pub mod repository;
pub mod service;
pub mod storage;

pub use error::{InventoryError, InventoryResult};
pub use item::{Item, ItemDetails, ItemId};
pub use movement::{MovementType, StockMovement};
pub use policy::{LowStockPolicy, ThresholdPolicy};
pub use repository::{InMemoryInventoryRepository, InventoryRepository};
pub use service::{InventoryService, SortKey};
pub use storage::{InventoryFileStorage, StorageError};
