//! In-memory store. Used by tests and by deployments that don't need
//! durability; a single `RwLock` write guard makes every batch atomic and
//! linearizable.

use super::{AccountId, Balances, EconomyStore, Mutation, Notification};
use crate::catalog::item::Item;
use crate::catalog::recipe::Recipe;
use crate::constants::DEFAULT_MAX_BANK;
use crate::error::{EconomyError, EconomyResult};
use ahash::{AHashMap, AHashSet};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Clone, Copy)]
struct AccountRow {
    wallet: i64,
    bank: i64,
    max_bank: i64,
    exp: i64,
    boost_active: bool,
}

impl Default for AccountRow {
    fn default() -> Self {
        Self {
            wallet: 0,
            bank: 0,
            max_bank: DEFAULT_MAX_BANK,
            exp: 0,
            boost_active: false,
        }
    }
}

#[derive(Default)]
struct Inner {
    accounts: AHashMap<AccountId, AccountRow>,
    items: AHashMap<(AccountId, Item), i64>,
    discovered: AHashMap<AccountId, AHashSet<Recipe>>,
    notifications: AHashMap<AccountId, Vec<Notification>>,
}

#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test/bootstrap helper: set an account's wallet and bank directly.
    pub async fn seed_balances(&self, account: AccountId, wallet: i64, bank: i64) {
        let mut inner = self.inner.write().await;
        let row = inner.accounts.entry(account).or_default();
        row.wallet = wallet;
        row.bank = bank;
    }

    /// Test/bootstrap helper: set an item quantity directly.
    pub async fn seed_item(&self, account: AccountId, item: Item, quantity: i64) {
        let mut inner = self.inner.write().await;
        inner.items.insert((account, item), quantity);
    }
}

#[async_trait]
impl EconomyStore for MemStore {
    async fn apply(&self, changes: &[Mutation]) -> EconomyResult<()> {
        let mut inner = self.inner.write().await;

        // Stage every delta against a scratch copy first; nothing is written
        // back until the whole batch has validated. Multiple mutations
        // against the same account accumulate in the scratch state.
        let mut staged_accounts: AHashMap<AccountId, AccountRow> = AHashMap::new();
        let mut staged_items: AHashMap<(AccountId, Item), i64> = AHashMap::new();

        for change in changes {
            match change {
                Mutation::Balance {
                    account,
                    wallet,
                    bank,
                    max_bank,
                    exp,
                } => {
                    let row = staged_accounts
                        .entry(*account)
                        .or_insert_with(|| inner.accounts.get(account).copied().unwrap_or_default());
                    if row.wallet + wallet < 0 {
                        return Err(EconomyError::InsufficientFunds {
                            needed: -wallet,
                            available: row.wallet,
                        });
                    }
                    if row.bank + bank < 0 {
                        return Err(EconomyError::InsufficientFunds {
                            needed: -bank,
                            available: row.bank,
                        });
                    }
                    row.wallet += wallet;
                    row.bank += bank;
                    row.max_bank += max_bank;
                    row.exp += exp;
                }
                Mutation::Item {
                    account,
                    item,
                    delta,
                } => {
                    let quantity = staged_items
                        .entry((*account, *item))
                        .or_insert_with(|| inner.items.get(&(*account, *item)).copied().unwrap_or(0));
                    if *quantity + delta < 0 {
                        return Err(EconomyError::InsufficientItems {
                            item: *item,
                            needed: -delta,
                            held: *quantity,
                        });
                    }
                    *quantity += delta;
                }
                Mutation::Boost { account, .. } | Mutation::Discover { account, .. } => {
                    // No validation needed, but make sure the account exists
                    // so reads after the batch see a row.
                    staged_accounts
                        .entry(*account)
                        .or_insert_with(|| inner.accounts.get(account).copied().unwrap_or_default());
                }
                Mutation::Notify { .. } => {}
            }
        }

        // Validation passed: commit the batch.
        for (account, row) in staged_accounts {
            inner.accounts.insert(account, row);
        }
        for (key, quantity) in staged_items {
            inner.items.insert(key, quantity);
        }
        for change in changes {
            match change {
                Mutation::Discover { account, recipe } => {
                    inner.discovered.entry(*account).or_default().insert(*recipe);
                }
                Mutation::Boost { account, active } => {
                    if let Some(row) = inner.accounts.get_mut(account) {
                        row.boost_active = *active;
                    }
                }
                Mutation::Notify {
                    account,
                    title,
                    content,
                } => {
                    inner.notifications.entry(*account).or_default().insert(
                        0,
                        Notification {
                            created_at: Utc::now(),
                            title: title.clone(),
                            content: content.clone(),
                        },
                    );
                }
                _ => {}
            }
        }
        Ok(())
    }

    async fn balances(&self, account: AccountId) -> EconomyResult<Balances> {
        let inner = self.inner.read().await;
        let row = inner.accounts.get(&account).copied().unwrap_or_default();
        Ok(Balances {
            wallet: row.wallet,
            bank: row.bank,
            max_bank: row.max_bank,
            exp: row.exp,
            boost_active: row.boost_active,
        })
    }

    async fn inventory(&self, account: AccountId) -> EconomyResult<Vec<(Item, i64)>> {
        let inner = self.inner.read().await;
        let mut items: Vec<(Item, i64)> = inner
            .items
            .iter()
            .filter(|((owner, _), quantity)| *owner == account && **quantity > 0)
            .map(|((_, item), quantity)| (*item, *quantity))
            .collect();
        items.sort_by_key(|(item, _)| item.key());
        Ok(items)
    }

    async fn quantity_of(&self, account: AccountId, item: Item) -> EconomyResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner.items.get(&(account, item)).copied().unwrap_or(0))
    }

    async fn discovered(&self, account: AccountId) -> EconomyResult<Vec<Recipe>> {
        let inner = self.inner.read().await;
        let mut recipes: Vec<Recipe> = inner
            .discovered
            .get(&account)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        recipes.sort_by_key(|recipe| recipe.key());
        Ok(recipes)
    }

    async fn is_discovered(&self, account: AccountId, recipe: Recipe) -> EconomyResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .discovered
            .get(&account)
            .is_some_and(|set| set.contains(&recipe)))
    }

    async fn notifications(&self, account: AccountId) -> EconomyResult<Vec<Notification>> {
        let inner = self.inner.read().await;
        Ok(inner.notifications.get(&account).cloned().unwrap_or_default())
    }
}
