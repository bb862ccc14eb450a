//! The persistence seam. Everything that mutates account state funnels
//! through [`EconomyStore::apply`] so that one logical operation commits as
//! one atomic unit, or not at all.

pub mod memory;
pub mod postgres;

use crate::catalog::item::Item;
use crate::catalog::recipe::Recipe;
use crate::error::EconomyResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

pub use memory::MemStore;
pub use postgres::PgStore;

/// Opaque account identity. Mirrors a platform user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub u64);

impl AccountId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Point-in-time snapshot of one account's numeric balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balances {
    pub wallet: i64,
    pub bank: i64,
    pub max_bank: i64,
    pub exp: i64,
    /// Whether an XP booster is currently active on the account.
    pub boost_active: bool,
}

impl Balances {
    pub fn total_coins(&self) -> i64 {
        self.wallet + self.bank
    }

    /// Remaining room in the bank; deposits are bounded by this.
    pub fn bank_space(&self) -> i64 {
        (self.max_bank - self.bank).max(0)
    }
}

/// A persisted notification, recorded in the same atomic unit as the
/// transfer it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub content: String,
}

/// One mutation inside an atomic batch. Deltas may be negative; the store
/// refuses the whole batch if any resulting balance or quantity would go
/// negative.
#[derive(Debug, Clone)]
pub enum Mutation {
    Balance {
        account: AccountId,
        wallet: i64,
        bank: i64,
        max_bank: i64,
        exp: i64,
    },
    Item {
        account: AccountId,
        item: Item,
        delta: i64,
    },
    /// Record a recipe as discovered. Idempotent.
    Discover { account: AccountId, recipe: Recipe },
    /// Toggle the account's XP boost flag.
    Boost { account: AccountId, active: bool },
    Notify {
        account: AccountId,
        title: String,
        content: String,
    },
}

impl Mutation {
    /// Wallet-only delta.
    pub fn wallet(account: AccountId, delta: i64) -> Self {
        Self::Balance {
            account,
            wallet: delta,
            bank: 0,
            max_bank: 0,
            exp: 0,
        }
    }

    /// Simultaneous wallet and bank deltas (withdraw/deposit).
    pub fn balance(account: AccountId, wallet: i64, bank: i64) -> Self {
        Self::Balance {
            account,
            wallet,
            bank,
            max_bank: 0,
            exp: 0,
        }
    }

    pub fn exp(account: AccountId, delta: i64) -> Self {
        Self::Balance {
            account,
            wallet: 0,
            bank: 0,
            max_bank: 0,
            exp: delta,
        }
    }

    pub fn bank_space(account: AccountId, delta: i64) -> Self {
        Self::Balance {
            account,
            wallet: 0,
            bank: 0,
            max_bank: delta,
            exp: 0,
        }
    }

    pub fn item(account: AccountId, item: Item, delta: i64) -> Self {
        Self::Item {
            account,
            item,
            delta,
        }
    }
}

/// Durable storage for balances, inventories, discoveries and notifications.
///
/// Implementations must make [`apply`](EconomyStore::apply) all-or-nothing
/// and linearizable per store: two concurrent batches against the same
/// account must never lose or double-apply a delta.
#[async_trait]
pub trait EconomyStore: Send + Sync {
    /// Applies the whole batch atomically, or nothing at all.
    async fn apply(&self, changes: &[Mutation]) -> EconomyResult<()>;

    async fn balances(&self, account: AccountId) -> EconomyResult<Balances>;

    /// The account's full inventory, zero-quantity rows omitted.
    async fn inventory(&self, account: AccountId) -> EconomyResult<Vec<(Item, i64)>>;

    async fn quantity_of(&self, account: AccountId, item: Item) -> EconomyResult<i64>;

    async fn discovered(&self, account: AccountId) -> EconomyResult<Vec<Recipe>>;

    async fn is_discovered(&self, account: AccountId, recipe: Recipe) -> EconomyResult<bool>;

    /// Most recent notifications first.
    async fn notifications(&self, account: AccountId) -> EconomyResult<Vec<Notification>>;
}
