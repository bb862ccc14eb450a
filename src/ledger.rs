//! Thin facade over the store for wallet/bank balances.

use crate::error::EconomyResult;
use crate::store::{AccountId, Balances, EconomyStore, Mutation};
use std::sync::Arc;

#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn EconomyStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn EconomyStore>) -> Self {
        Self { store }
    }

    /// Atomically adds the deltas (which may be negative) to the account's
    /// balances and returns the new snapshot. The store re-validates at
    /// application time regardless of any pre-check the caller did, so a
    /// stale snapshot can never drive a balance negative.
    pub async fn apply_delta(
        &self,
        account: AccountId,
        wallet_delta: i64,
        bank_delta: i64,
    ) -> EconomyResult<Balances> {
        self.store
            .apply(&[Mutation::balance(account, wallet_delta, bank_delta)])
            .await?;
        self.store.balances(account).await
    }

    /// Point-in-time snapshot of the account's balances.
    pub async fn read(&self, account: AccountId) -> EconomyResult<Balances> {
        self.store.balances(account).await
    }
}
