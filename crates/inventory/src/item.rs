use serde::{Deserialize, Serialize};

use ims_core::{DomainError, DomainResult, Entity};

/// Inventory item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        is_blank(&self.0)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Entity: a stocked item.
///
/// Every constructed `Item` satisfies its field rules; there is no way to build
/// (or deserialize) one that does not. Equality and hashing use the id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: i32,
    price: f64,
    supplier: String,
}

/// Partial update for [`Item::with_updated_details`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDetails {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub supplier: Option<String>,
}

impl Item {
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        quantity: i32,
        price: f64,
        supplier: impl Into<String>,
    ) -> DomainResult<Self> {
        let item = Self {
            id: id.into(),
            name: name.into(),
            quantity,
            price,
            supplier: supplier.into(),
        };
        item.validate()?;
        Ok(item)
    }

    pub fn id_typed(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    /// Check every field rule. Constructors call this, and the service runs it
    /// again on the create and update paths.
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.is_blank() {
            return Err(DomainError::validation("id cannot be blank"));
        }
        if is_blank(&self.name) {
            return Err(DomainError::validation("name cannot be blank"));
        }
        if is_blank(&self.supplier) {
            return Err(DomainError::validation("supplier cannot be blank"));
        }
        if self.quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        // `is_finite` is false for NaN too.
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("price must be a finite value >= 0"));
        }
        Ok(())
    }

    /// Positive `delta` adds stock, negative deducts it.
    pub fn with_adjusted_quantity(&self, delta: i32) -> DomainResult<Self> {
        let new_qty = i64::from(self.quantity) + i64::from(delta);
        if new_qty < 0 {
            return Err(DomainError::validation("resulting quantity cannot be negative"));
        }
        let quantity = i32::try_from(new_qty)
            .map_err(|_| DomainError::validation("resulting quantity is too large"))?;
        Ok(Self {
            quantity,
            ..self.clone()
        })
    }

    pub fn with_updated_details(&self, details: ItemDetails) -> DomainResult<Self> {
        let updated = Self {
            id: self.id.clone(),
            name: details.name.unwrap_or_else(|| self.name.clone()),
            quantity: self.quantity,
            price: details.price.unwrap_or(self.price),
            supplier: details.supplier.unwrap_or_else(|| self.supplier.clone()),
        };
        updated.validate()?;
        Ok(updated)
    }

    /// Builds an item without checking it, so tests can feed invalid values
    /// through the service.
    #[cfg(test)]
    pub(crate) fn unchecked(
        id: &str,
        name: &str,
        quantity: i32,
        price: f64,
        supplier: &str,
    ) -> Self {
        Self {
            id: ItemId::from(id),
            name: name.to_string(),
            quantity,
            price,
            supplier: supplier.to_string(),
        }
    }

    pub(crate) fn with_quantity(&self, quantity: i32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl core::hash::Hash for Item {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} | {} | qty {} | {:.2} | {}",
            self.id, self.name, self.quantity, self.price, self.supplier
        )
    }
}

/// Unvalidated wire shape of an [`Item`].
#[derive(Serialize, Deserialize)]
struct ItemRecord {
    id: String,
    name: String,
    quantity: i32,
    price: f64,
    supplier: String,
}

impl TryFrom<ItemRecord> for Item {
    type Error = DomainError;

    fn try_from(r: ItemRecord) -> Result<Self, Self::Error> {
        Item::new(r.id, r.name, r.quantity, r.price, r.supplier)
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.0,
            name: item.name,
            quantity: item.quantity,
            price: item.price,
            supplier: item.supplier,
        }
    }
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
