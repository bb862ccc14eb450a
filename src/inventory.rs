//! Per-account item quantities, with a read-through cached snapshot.
//!
//! The cache mirrors the store after `refresh`; callers that just performed
//! their own mutation through this facade already hold the updated value.
//! After a known external mutation (for example the other side of a trade),
//! `refresh` must be awaited before the snapshot can be trusted again.

use crate::catalog::item::Item;
use crate::error::EconomyResult;
use crate::store::{AccountId, EconomyStore, Mutation};
use ahash::AHashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A snapshot of one account's inventory. Zero-quantity entries may be
/// omitted or retained; `quantity_of` treats both the same.
#[derive(Debug, Clone, Default)]
pub struct InventoryMap {
    items: AHashMap<Item, i64>,
}

impl InventoryMap {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Item, i64)>) -> Self {
        Self {
            items: pairs.into_iter().collect(),
        }
    }

    pub fn quantity_of(&self, item: Item) -> i64 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Item, i64)> + '_ {
        self.items
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(item, quantity)| (*item, *quantity))
    }

    pub(crate) fn set(&mut self, item: Item, quantity: i64) {
        self.items.insert(item, quantity);
    }
}

#[derive(Clone)]
pub struct Inventory {
    store: Arc<dyn EconomyStore>,
    cached: Arc<RwLock<AHashMap<AccountId, InventoryMap>>>,
}

impl Inventory {
    pub fn new(store: Arc<dyn EconomyStore>) -> Self {
        Self {
            store,
            cached: Arc::new(RwLock::new(AHashMap::new())),
        }
    }

    /// Atomically adjusts one item's quantity; a negative delta is
    /// consumption. Fails if the resulting quantity would be negative, in
    /// which case nothing changes. Returns the new quantity.
    pub async fn add_item(
        &self,
        account: AccountId,
        item: Item,
        delta: i64,
    ) -> EconomyResult<i64> {
        self.store
            .apply(&[Mutation::item(account, item, delta)])
            .await?;
        let quantity = self.store.quantity_of(account, item).await?;
        self.cached
            .write()
            .await
            .entry(account)
            .or_default()
            .set(item, quantity);
        Ok(quantity)
    }

    /// Reads one quantity from the cached snapshot, fetching the snapshot
    /// from the store if the account has none yet.
    pub async fn quantity_of(&self, account: AccountId, item: Item) -> EconomyResult<i64> {
        if let Some(map) = self.cached.read().await.get(&account) {
            return Ok(map.quantity_of(item));
        }
        Ok(self.refresh(account).await?.quantity_of(item))
    }

    /// Re-reads the account's snapshot from the store. Required before
    /// trusting the cache after a known external mutation.
    pub async fn refresh(&self, account: AccountId) -> EconomyResult<InventoryMap> {
        let mut map = InventoryMap::default();
        for (item, quantity) in self.store.inventory(account).await? {
            map.set(item, quantity);
        }
        self.cached.write().await.insert(account, map.clone());
        Ok(map)
    }

    /// The cached snapshot for an account, fetching it on first access.
    pub async fn snapshot(&self, account: AccountId) -> EconomyResult<InventoryMap> {
        if let Some(map) = self.cached.read().await.get(&account) {
            return Ok(map.clone());
        }
        self.refresh(account).await
    }
}
