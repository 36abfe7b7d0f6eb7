use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::item::{Item, ItemId};

/// Key/value store of items keyed by id.
pub trait InventoryRepository: Send + Sync {
    fn exists_by_id(&self, id: &ItemId) -> bool;
    fn find_by_id(&self, id: &ItemId) -> Option<Item>;
    /// All items, in no particular order.
    fn find_all(&self) -> Vec<Item>;
    /// Upsert by id.
    fn save(&self, item: Item);
    /// Removing an absent id is a no-op.
    fn delete_by_id(&self, id: &ItemId);
    /// Clear and repopulate in one step. Later duplicates overwrite earlier ones.
    fn replace_all(&self, items: Vec<Item>);
}

impl<R> InventoryRepository for Arc<R>
where
    R: InventoryRepository + ?Sized,
{
    fn exists_by_id(&self, id: &ItemId) -> bool {
        (**self).exists_by_id(id)
    }

    fn find_by_id(&self, id: &ItemId) -> Option<Item> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> Vec<Item> {
        (**self).find_all()
    }

    fn save(&self, item: Item) {
        (**self).save(item)
    }

    fn delete_by_id(&self, id: &ItemId) {
        (**self).delete_by_id(id)
    }

    fn replace_all(&self, items: Vec<Item>) {
        (**self).replace_all(items)
    }
}

/// In-memory repository.
///
/// One `RwLock` guards the whole map; every mutation holds the write lock for
/// its full duration, so `replace_all` is never observed half-done.
#[derive(Debug, Default)]
pub struct InMemoryInventoryRepository {
    inner: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let repo = Self::new();
        repo.replace_all(items.into_iter().collect());
        repo
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated (every
    // mutation is a single map call or a swap), so poisoned guards are reused.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ItemId, Item>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ItemId, Item>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InventoryRepository for InMemoryInventoryRepository {
    fn exists_by_id(&self, id: &ItemId) -> bool {
        self.read().contains_key(id)
    }

    fn find_by_id(&self, id: &ItemId) -> Option<Item> {
        self.read().get(id).cloned()
    }

    fn find_all(&self) -> Vec<Item> {
        self.read().values().cloned().collect()
    }

    fn save(&self, item: Item) {
        self.write().insert(item.id_typed().clone(), item);
    }

    fn delete_by_id(&self, id: &ItemId) {
        self.write().remove(id);
    }

    fn replace_all(&self, items: Vec<Item>) {
        let mut next = HashMap::with_capacity(items.len());
        for item in items {
            next.insert(item.id_typed().clone(), item);
        }
        *self.write() = next;
    }
}
