use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ims_core::{DomainError, DomainResult};

use crate::item::{ItemId, is_blank};

/// Kind of stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Purchase, restock, return to stock.
    Inbound,
    /// Sale, shipment, consumption.
    Outbound,
    /// Manual correction, stock count fix.
    Adjustment,
}

impl core::fmt::Display for MovementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            MovementType::Inbound => "inbound",
            MovementType::Outbound => "outbound",
            MovementType::Adjustment => "adjustment",
        };
        f.write_str(s)
    }
}

/// A single stock change for one item.
///
/// Positive `quantity_change` increases stock, negative decreases it; zero is
/// rejected. Transient: the service applies it but does not store it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockMovement {
    item_id: ItemId,
    quantity_change: i32,
    movement_type: MovementType,
    timestamp: DateTime<Utc>,
    reference: Option<String>,
    note: Option<String>,
}

impl StockMovement {
    /// Build a movement stamped with the current time.
    pub fn new(
        item_id: impl Into<ItemId>,
        quantity_change: i32,
        movement_type: MovementType,
    ) -> DomainResult<Self> {
        Self::at(item_id, quantity_change, movement_type, Utc::now())
    }

    pub fn at(
        item_id: impl Into<ItemId>,
        quantity_change: i32,
        movement_type: MovementType,
        timestamp: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let item_id = item_id.into();
        if item_id.is_blank() {
            return Err(DomainError::validation("item id must not be blank"));
        }
        if quantity_change == 0 {
            return Err(DomainError::validation("quantity change must not be zero"));
        }
        Ok(Self {
            item_id,
            quantity_change,
            movement_type,
            timestamp,
            reference: None,
            note: None,
        })
    }

    /// Attach an external reference, e.g. `ORDER-123`.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into()).filter(|r| !is_blank(r));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into()).filter(|n| !is_blank(n));
        self
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn quantity_change(&self) -> i32 {
        self.quantity_change
    }

    pub fn movement_type(&self) -> MovementType {
        self.movement_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}
