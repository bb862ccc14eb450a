//! Postgres-backed store. One SQL transaction per batch; row-level locks
//! (`SELECT ... FOR UPDATE`) serialize concurrent batches touching the same
//! account, so deltas are never lost or double-applied.

use super::{AccountId, Balances, EconomyStore, Mutation, Notification};
use crate::catalog::item::Item;
use crate::catalog::recipe::Recipe;
use crate::constants::DEFAULT_MAX_BANK;
use crate::error::{EconomyError, EconomyResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::str::FromStr;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    user_id    BIGINT PRIMARY KEY,
    wallet     BIGINT NOT NULL DEFAULT 0,
    bank       BIGINT NOT NULL DEFAULT 0,
    max_bank   BIGINT NOT NULL,
    exp        BIGINT NOT NULL DEFAULT 0,
    boost_active BOOLEAN NOT NULL DEFAULT FALSE
);
CREATE TABLE IF NOT EXISTS inventories (
    user_id  BIGINT NOT NULL,
    item     TEXT   NOT NULL,
    quantity BIGINT NOT NULL DEFAULT 0,
    PRIMARY KEY (user_id, item)
);
CREATE TABLE IF NOT EXISTS discovered_recipes (
    user_id BIGINT NOT NULL,
    recipe  TEXT   NOT NULL,
    PRIMARY KEY (user_id, recipe)
);
CREATE TABLE IF NOT EXISTS notifications (
    notification_id BIGSERIAL PRIMARY KEY,
    user_id    BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    title      TEXT NOT NULL,
    content    TEXT NOT NULL
);
"#;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and bootstraps the schema.
    pub async fn connect(url: &str) -> EconomyResult<Self> {
        let pool = PgPoolOptions::new().max_connections(8).connect(url).await?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn migrate(&self) -> EconomyResult<()> {
        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Locks (and creates if missing) the account row within the transaction.
    async fn lock_account(
        tx: &mut Transaction<'_, Postgres>,
        account: AccountId,
    ) -> EconomyResult<(i64, i64)> {
        let user_id = account.get() as i64;
        sqlx::query("INSERT INTO accounts (user_id, max_bank) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .bind(DEFAULT_MAX_BANK)
            .execute(&mut **tx)
            .await?;
        let row = sqlx::query("SELECT wallet, bank FROM accounts WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok((row.try_get("wallet")?, row.try_get("bank")?))
    }
}

#[async_trait]
impl EconomyStore for PgStore {
    async fn apply(&self, changes: &[Mutation]) -> EconomyResult<()> {
        let mut tx = self.pool.begin().await?;

        for change in changes {
            match change {
                Mutation::Balance {
                    account,
                    wallet,
                    bank,
                    max_bank,
                    exp,
                } => {
                    let (current_wallet, current_bank) =
                        Self::lock_account(&mut tx, *account).await?;
                    if current_wallet + wallet < 0 {
                        tx.rollback().await.ok();
                        return Err(EconomyError::InsufficientFunds {
                            needed: -wallet,
                            available: current_wallet,
                        });
                    }
                    if current_bank + bank < 0 {
                        tx.rollback().await.ok();
                        return Err(EconomyError::InsufficientFunds {
                            needed: -bank,
                            available: current_bank,
                        });
                    }
                    sqlx::query(
                        "UPDATE accounts SET wallet = wallet + $2, bank = bank + $3, \
                         max_bank = max_bank + $4, exp = exp + $5 WHERE user_id = $1",
                    )
                    .bind(account.get() as i64)
                    .bind(*wallet)
                    .bind(*bank)
                    .bind(*max_bank)
                    .bind(*exp)
                    .execute(&mut *tx)
                    .await?;
                }
                Mutation::Item {
                    account,
                    item,
                    delta,
                } => {
                    let user_id = account.get() as i64;
                    let held: i64 = sqlx::query(
                        "SELECT quantity FROM inventories WHERE user_id = $1 AND item = $2 FOR UPDATE",
                    )
                    .bind(user_id)
                    .bind(item.key())
                    .fetch_optional(&mut *tx)
                    .await?
                    .map(|row| row.try_get("quantity"))
                    .transpose()?
                    .unwrap_or(0);
                    if held + delta < 0 {
                        tx.rollback().await.ok();
                        return Err(EconomyError::InsufficientItems {
                            item: *item,
                            needed: -delta,
                            held,
                        });
                    }
                    sqlx::query(
                        "INSERT INTO inventories (user_id, item, quantity) VALUES ($1, $2, $3) \
                         ON CONFLICT (user_id, item) DO UPDATE \
                         SET quantity = inventories.quantity + EXCLUDED.quantity",
                    )
                    .bind(user_id)
                    .bind(item.key())
                    .bind(*delta)
                    .execute(&mut *tx)
                    .await?;
                }
                Mutation::Discover { account, recipe } => {
                    sqlx::query(
                        "INSERT INTO discovered_recipes (user_id, recipe) VALUES ($1, $2) \
                         ON CONFLICT (user_id, recipe) DO NOTHING",
                    )
                    .bind(account.get() as i64)
                    .bind(recipe.key())
                    .execute(&mut *tx)
                    .await?;
                }
                Mutation::Boost { account, active } => {
                    Self::lock_account(&mut tx, *account).await?;
                    sqlx::query("UPDATE accounts SET boost_active = $2 WHERE user_id = $1")
                        .bind(account.get() as i64)
                        .bind(*active)
                        .execute(&mut *tx)
                        .await?;
                }
                Mutation::Notify {
                    account,
                    title,
                    content,
                } => {
                    sqlx::query(
                        "INSERT INTO notifications (user_id, title, content) VALUES ($1, $2, $3)",
                    )
                    .bind(account.get() as i64)
                    .bind(title)
                    .bind(content)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn balances(&self, account: AccountId) -> EconomyResult<Balances> {
        let row = sqlx::query(
            "SELECT wallet, bank, max_bank, exp, boost_active FROM accounts WHERE user_id = $1",
        )
        .bind(account.get() as i64)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(Balances {
                wallet: row.try_get("wallet")?,
                bank: row.try_get("bank")?,
                max_bank: row.try_get("max_bank")?,
                exp: row.try_get("exp")?,
                boost_active: row.try_get("boost_active")?,
            }),
            None => Ok(Balances {
                wallet: 0,
                bank: 0,
                max_bank: DEFAULT_MAX_BANK,
                exp: 0,
                boost_active: false,
            }),
        }
    }

    async fn inventory(&self, account: AccountId) -> EconomyResult<Vec<(Item, i64)>> {
        let rows = sqlx::query(
            "SELECT item, quantity FROM inventories \
             WHERE user_id = $1 AND quantity > 0 ORDER BY item",
        )
        .bind(account.get() as i64)
        .fetch_all(&self.pool)
        .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("item")?;
            match Item::from_str(&key) {
                Ok(item) => items.push((item, row.try_get("quantity")?)),
                // An item removed from the catalog can leave orphan rows.
                Err(()) => tracing::warn!(target: "store.pg", item = %key, "unknown item key in inventory row"),
            }
        }
        Ok(items)
    }

    async fn quantity_of(&self, account: AccountId, item: Item) -> EconomyResult<i64> {
        let row = sqlx::query("SELECT quantity FROM inventories WHERE user_id = $1 AND item = $2")
            .bind(account.get() as i64)
            .bind(item.key())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.try_get("quantity")).transpose()?.unwrap_or(0))
    }

    async fn discovered(&self, account: AccountId) -> EconomyResult<Vec<Recipe>> {
        let rows =
            sqlx::query("SELECT recipe FROM discovered_recipes WHERE user_id = $1 ORDER BY recipe")
                .bind(account.get() as i64)
                .fetch_all(&self.pool)
                .await?;
        let mut recipes = Vec::with_capacity(rows.len());
        for row in rows {
            let key: String = row.try_get("recipe")?;
            if let Ok(recipe) = Recipe::from_str(&key) {
                recipes.push(recipe);
            }
        }
        Ok(recipes)
    }

    async fn is_discovered(&self, account: AccountId, recipe: Recipe) -> EconomyResult<bool> {
        let row = sqlx::query(
            "SELECT 1 AS present FROM discovered_recipes WHERE user_id = $1 AND recipe = $2",
        )
        .bind(account.get() as i64)
        .bind(recipe.key())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn notifications(&self, account: AccountId) -> EconomyResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT created_at, title, content FROM notifications \
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1000",
        )
        .bind(account.get() as i64)
        .fetch_all(&self.pool)
        .await?;
        let mut notifications = Vec::with_capacity(rows.len());
        for row in rows {
            let created_at: DateTime<Utc> = row.try_get("created_at")?;
            notifications.push(Notification {
                created_at,
                title: row.try_get("title")?,
                content: row.try_get("content")?,
            });
        }
        Ok(notifications)
    }
}
