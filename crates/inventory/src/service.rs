//! Inventory service: validation, stock adjustment and reporting over a repository.

use std::cmp::Ordering;

use tracing::{debug, info, warn};

use ims_core::{DomainError, DomainResult};

use crate::error::InventoryResult;
use crate::item::{Item, ItemId, is_blank};
use crate::movement::StockMovement;
use crate::policy::LowStockPolicy;
use crate::repository::InventoryRepository;
use crate::storage::InventoryFileStorage;

/// Sort orders offered by [`InventoryService::list_sorted`]. Ties fall back to id.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
    QuantityAsc,
    QuantityDesc,
    PriceAsc,
    PriceDesc,
    Supplier,
}

/// Coordinates the repository, file storage and low-stock policy.
///
/// Business-rule violations come back as `Err(DomainError)`; they are
/// expected outcomes, not faults.
#[derive(Debug)]
pub struct InventoryService<R, S, P> {
    repo: R,
    storage: S,
    low_stock_policy: P,
}

impl<R, S, P> InventoryService<R, S, P>
where
    R: InventoryRepository,
    S: InventoryFileStorage,
    P: LowStockPolicy,
{
    pub fn new(repo: R, storage: S, low_stock_policy: P) -> Self {
        Self {
            repo,
            storage,
            low_stock_policy,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn add_item(&self, item: Item) -> DomainResult<Item> {
        self.validate_for_create(&item)?;
        self.repo.save(item.clone());
        info!(item_id = %item.id_typed(), "item added");
        Ok(item)
    }

    pub fn update_item(&self, item: Item) -> DomainResult<Item> {
        self.validate_for_update(&item)?;
        self.repo.save(item.clone());
        info!(item_id = %item.id_typed(), "item updated");
        Ok(item)
    }

    pub fn delete_by_id(&self, id: &str) -> DomainResult<()> {
        let id = self.existing_id(id)?;
        self.repo.delete_by_id(&id);
        info!(item_id = %id, "item deleted");
        Ok(())
    }

    /// Missing or blank ids yield `None`, not an error.
    pub fn get_by_id(&self, id: &str) -> Option<Item> {
        if is_blank(id) {
            return None;
        }
        self.repo.find_by_id(&ItemId::from(id))
    }

    /// Owned snapshot of every item; later repository changes do not show up in it.
    pub fn list_all(&self) -> Vec<Item> {
        self.repo.find_all()
    }

    pub fn get_all_item_ids(&self) -> Vec<ItemId> {
        self.repo
            .find_all()
            .into_iter()
            .map(|item| item.id_typed().clone())
            .collect()
    }

    /// Case-insensitive substring match on name. A blank query matches nothing.
    pub fn search_by_name(&self, query: &str) -> Vec<Item> {
        if is_blank(query) {
            return Vec::new();
        }
        let q = query.to_lowercase();
        let mut hits: Vec<Item> = self
            .repo
            .find_all()
            .into_iter()
            .filter(|item| item.name().to_lowercase().contains(&q))
            .collect();
        hits.sort_by(|a, b| cmp_name(a, b).then_with(|| cmp_id(a, b)));
        debug!(query, hits = hits.len(), "name search");
        hits
    }

    pub fn list_sorted(&self, key: SortKey) -> Vec<Item> {
        let mut items = self.repo.find_all();
        items.sort_by(|a, b| {
            let primary = match key {
                SortKey::Id => Ordering::Equal,
                SortKey::Name => cmp_name(a, b),
                SortKey::QuantityAsc => a.quantity().cmp(&b.quantity()),
                SortKey::QuantityDesc => b.quantity().cmp(&a.quantity()),
                SortKey::PriceAsc => a.price().total_cmp(&b.price()),
                SortKey::PriceDesc => b.price().total_cmp(&a.price()),
                SortKey::Supplier => cmp_ignore_case(a.supplier(), b.supplier()),
            };
            primary.then_with(|| cmp_id(a, b))
        });
        items
    }

    /// Add (`delta > 0`) or remove (`delta < 0`) stock.
    ///
    /// A failed adjustment leaves the stored item untouched.
    pub fn adjust_stock(&self, id: &str, delta: i32) -> DomainResult<Item> {
        if is_blank(id) {
            return Err(DomainError::validation("id is required"));
        }
        let id = ItemId::from(id);
        let current = self
            .repo
            .find_by_id(&id)
            .ok_or_else(|| DomainError::not_found(format!("Item not found: {id}")))?;

        let new_qty = i64::from(current.quantity()) + i64::from(delta);
        if new_qty < 0 {
            warn!(item_id = %id, quantity = current.quantity(), delta, "adjustment rejected");
            return Err(DomainError::invariant(
                "Adjustment would produce negative quantity",
            ));
        }
        let new_qty = i32::try_from(new_qty)
            .map_err(|_| DomainError::invariant("Adjustment would overflow quantity"))?;

        let updated = current.with_quantity(new_qty);
        self.repo.save(updated.clone());
        info!(item_id = %id, delta, quantity = new_qty, "stock adjusted");
        Ok(updated)
    }

    /// Movement type, reference and note are recorded in the log only.
    pub fn apply_movement(&self, movement: &StockMovement) -> DomainResult<Item> {
        debug!(
            item_id = %movement.item_id(),
            movement_type = %movement.movement_type(),
            reference = movement.reference(),
            "applying stock movement"
        );
        self.adjust_stock(movement.item_id().as_str(), movement.quantity_change())
    }

    /// Items the policy flags, by quantity, then name, then id.
    pub fn low_stock(&self) -> Vec<Item> {
        let mut low: Vec<Item> = self
            .repo
            .find_all()
            .into_iter()
            .filter(|item| self.low_stock_policy.is_low(item))
            .collect();
        low.sort_by(|a, b| {
            a.quantity()
                .cmp(&b.quantity())
                .then_with(|| cmp_name(a, b))
                .then_with(|| cmp_id(a, b))
        });
        low
    }

    /// Swap the whole inventory for `items`. Returns the resulting item count.
    pub fn replace_all(&self, items: Vec<Item>) -> usize {
        self.repo.replace_all(items);
        let count = self.repo.find_all().len();
        info!(count, "inventory replaced");
        count
    }

    /// Write every item to `file_name`. Returns the number of items written.
    pub fn save_all(&self, file_name: &str) -> InventoryResult<usize> {
        require_file_name(file_name)?;
        let items = self.list_sorted(SortKey::Id);
        self.storage.save_all(&items, file_name)?;
        info!(file_name, count = items.len(), "inventory saved");
        Ok(items.len())
    }

    /// Replace the inventory with the contents of `file_name`.
    ///
    /// The repository is only touched once the whole file has loaded.
    pub fn load_all(&self, file_name: &str) -> InventoryResult<usize> {
        require_file_name(file_name)?;
        let items = self.storage.load_all(file_name)?;
        self.repo.replace_all(items);
        let count = self.repo.find_all().len();
        info!(file_name, count, "inventory loaded");
        Ok(count)
    }

    fn validate_for_create(&self, item: &Item) -> DomainResult<()> {
        item.validate()?;
        require_id(item)?;
        if self.repo.exists_by_id(item.id_typed()) {
            return Err(DomainError::conflict(format!(
                "Item id already exists: {}",
                item.id_typed()
            )));
        }
        Ok(())
    }

    fn validate_for_update(&self, item: &Item) -> DomainResult<()> {
        item.validate()?;
        require_id(item)?;
        if !self.repo.exists_by_id(item.id_typed()) {
            return Err(DomainError::not_found(format!(
                "Item not found: {}",
                item.id_typed()
            )));
        }
        Ok(())
    }

    fn existing_id(&self, id: &str) -> DomainResult<ItemId> {
        if is_blank(id) {
            return Err(DomainError::validation("id is required"));
        }
        let id = ItemId::from(id);
        if !self.repo.exists_by_id(&id) {
            return Err(DomainError::not_found(format!("Item not found: {id}")));
        }
        Ok(id)
    }
}

fn require_id(item: &Item) -> DomainResult<()> {
    if item.id_typed().is_blank() {
        return Err(DomainError::validation("id is required"));
    }
    Ok(())
}

fn require_file_name(file_name: &str) -> DomainResult<()> {
    if is_blank(file_name) {
        return Err(DomainError::validation("file name is required"));
    }
    Ok(())
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn cmp_name(a: &Item, b: &Item) -> Ordering {
    cmp_ignore_case(a.name(), b.name())
}

fn cmp_id(a: &Item, b: &Item) -> Ordering {
    a.id_typed().cmp(b.id_typed())
}
