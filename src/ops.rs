//! The transaction orchestrator. One suspend-capable entry point per
//! economy operation, each applied as a single atomic batch against the
//! store. Interactive steps (confirmations, prompts) happen before the
//! commit; because time passes while they wait, the store re-validates
//! every delta at apply time rather than trusting the pre-check.

use crate::catalog::item::Item;
use crate::catalog::recipe::Recipe;
use crate::constants::{
    BONUS_BANK_SPACE_RANGE, BONUS_EXP_RANGE, BUY_BONUS_CHANCE, SELL_BONUS_CHANCE,
};
use crate::crafting::{self, CraftReport};
use crate::drops::PendingDrop;
use crate::error::{EconomyError, EconomyResult};
use crate::inventory::Inventory;
use crate::ledger::Ledger;
use crate::prompt::{self, Confirm, Decision, QuantityPrompt};
use crate::store::{AccountId, Balances, EconomyStore, Mutation, Notification};
use crate::usage;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// A transfer participant as the platform layer resolved it.
#[derive(Debug, Clone)]
pub struct Member {
    pub id: AccountId,
    pub name: String,
    pub bot: bool,
}

impl Member {
    pub fn new(id: AccountId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            bot: false,
        }
    }
}

/// What a share or drop carries: a coin amount, or an item and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Coins(i64),
    Items(Item, i64),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Coins(amount) => write!(f, "🪙 {amount}"),
            Payload::Items(item, quantity) => write!(f, "{quantity} {item}"),
        }
    }
}

/// Result of a successful buy or sell.
#[derive(Debug, Clone)]
pub struct TradeReceipt {
    pub item: Item,
    pub quantity: i64,
    /// Coins spent (buy) or received (sell).
    pub coins: i64,
    pub balances: Balances,
}

/// Result of a successful use/remove.
#[derive(Debug, Clone)]
pub struct UseReport {
    pub item: Item,
    pub quantity: i64,
    /// Whether units were consumed from the inventory.
    pub consumed: bool,
    pub message: String,
}

/// Result of a successful share.
#[derive(Debug, Clone)]
pub struct ShareReceipt {
    pub payload: Payload,
    /// Sender's wallet or item quantity after the transfer.
    pub sender_after: i64,
    /// Recipient's wallet or item quantity after the transfer.
    pub recipient_after: i64,
}

/// The economy core. Cheap to clone; all state lives in the store.
#[derive(Clone)]
pub struct Economy {
    store: Arc<dyn EconomyStore>,
}

impl Economy {
    pub fn new(store: Arc<dyn EconomyStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn EconomyStore> {
        &self.store
    }

    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.store.clone())
    }

    pub fn inventory(&self) -> Inventory {
        Inventory::new(self.store.clone())
    }

    /// Moves coins from bank to wallet.
    pub async fn withdraw(&self, account: AccountId, amount: i64) -> EconomyResult<Balances> {
        if amount < 1 {
            return Err(EconomyError::invalid(
                "withdraw amount must be a positive integer",
            ));
        }
        self.store
            .apply(&[Mutation::balance(account, amount, -amount)])
            .await?;
        self.store.balances(account).await
    }

    /// Moves coins from wallet to bank, bounded by remaining bank space.
    pub async fn deposit(&self, account: AccountId, amount: i64) -> EconomyResult<Balances> {
        if amount < 1 {
            return Err(EconomyError::invalid(
                "deposit amount must be a positive integer",
            ));
        }
        let balances = self.store.balances(account).await?;
        if amount > balances.bank_space() {
            return Err(EconomyError::invalid(format!(
                "your bank only has space for {} more coins",
                balances.bank_space()
            )));
        }
        self.store
            .apply(&[Mutation::balance(account, -amount, amount)])
            .await?;
        self.store.balances(account).await
    }

    /// Buys items from the shop after an interactive confirmation. The
    /// wallet debit, the item credit and any random bonuses commit as one
    /// unit; a decline or timeout aborts with zero side effects.
    pub async fn buy(
        &self,
        account: AccountId,
        item: Item,
        quantity: i64,
        confirmer: &dyn Confirm,
    ) -> EconomyResult<TradeReceipt> {
        let price = item
            .buy_price()
            .ok_or_else(|| EconomyError::invalid(format!("{item} cannot be bought")))?;
        if quantity < 1 {
            return Err(EconomyError::invalid("you must buy at least one item"));
        }
        let cost = price
            .checked_mul(quantity)
            .ok_or_else(|| EconomyError::invalid("that quantity is too large"))?;

        let balances = self.store.balances(account).await?;
        if balances.wallet < cost {
            return Err(EconomyError::InsufficientFunds {
                needed: cost,
                available: balances.wallet,
            });
        }

        let prompt = format!("Are you sure you want to buy {quantity} {item} for 🪙 {cost}?");
        if prompt::confirm_within(confirmer, &prompt).await != Decision::Approved {
            return Err(EconomyError::Cancelled);
        }

        // Balances may have changed while the confirmation waited; the
        // batch re-validates the debit against current state.
        let mut batch = vec![
            Mutation::wallet(account, -cost),
            Mutation::item(account, item, quantity),
        ];
        batch.extend(self.roll_bonuses(account, BUY_BONUS_CHANCE, balances.boost_active));
        self.store.apply(&batch).await?;

        Ok(TradeReceipt {
            item,
            quantity,
            coins: cost,
            balances: self.store.balances(account).await?,
        })
    }

    /// Sells items from the inventory after an interactive confirmation.
    pub async fn sell(
        &self,
        account: AccountId,
        item: Item,
        quantity: i64,
        confirmer: &dyn Confirm,
    ) -> EconomyResult<TradeReceipt> {
        let value_each = item
            .sell_price()
            .ok_or_else(|| EconomyError::invalid(format!("{item} cannot be sold")))?;
        if quantity < 1 {
            return Err(EconomyError::invalid("you must sell at least one item"));
        }
        let value = value_each
            .checked_mul(quantity)
            .ok_or_else(|| EconomyError::invalid("that quantity is too large"))?;

        let held = self.store.quantity_of(account, item).await?;
        if held < quantity {
            return Err(EconomyError::InsufficientItems {
                item,
                needed: quantity,
                held,
            });
        }
        let boost_active = self.store.balances(account).await?.boost_active;

        let prompt =
            format!("Are you sure you want to sell {quantity} {item} in exchange for 🪙 {value}?");
        if prompt::confirm_within(confirmer, &prompt).await != Decision::Approved {
            return Err(EconomyError::Cancelled);
        }

        let mut batch = vec![
            Mutation::item(account, item, -quantity),
            Mutation::wallet(account, value),
        ];
        batch.extend(self.roll_bonuses(account, SELL_BONUS_CHANCE, boost_active));
        self.store.apply(&batch).await?;

        Ok(TradeReceipt {
            item,
            quantity,
            coins: value,
            balances: self.store.balances(account).await?,
        })
    }

    /// Uses an item, dispatching to its catalog capability. Units are only
    /// consumed when the catalog flags the item as disposed on use, and the
    /// consumption commits in the same batch as the item's effect.
    pub async fn use_item(
        &self,
        account: AccountId,
        item: Item,
        quantity: i64,
    ) -> EconomyResult<UseReport> {
        let handler = usage::usage_for(item)
            .ok_or_else(|| EconomyError::invalid(format!("{item} cannot be used")))?;
        if quantity < 1 {
            return Err(EconomyError::invalid("you must use at least one item"));
        }

        let held = self.store.quantity_of(account, item).await?;
        if held < quantity {
            return Err(EconomyError::InsufficientItems {
                item,
                needed: quantity,
                held,
            });
        }

        let balances = self.store.balances(account).await?;
        let effect = handler.on_use(account, &balances, quantity)?;

        let dispose = item.properties().dispose;
        let mut batch = effect.mutations;
        if dispose {
            batch.push(Mutation::item(account, item, -quantity));
        }
        batch.extend(self.roll_bonuses(account, SELL_BONUS_CHANCE, balances.boost_active));
        self.store.apply(&batch).await?;

        Ok(UseReport {
            item,
            quantity,
            consumed: dispose,
            message: effect.message,
        })
    }

    /// Removes the effects of an active item.
    pub async fn remove_item(&self, account: AccountId, item: Item) -> EconomyResult<UseReport> {
        let handler = usage::removal_for(item)
            .ok_or_else(|| EconomyError::invalid(format!("{item} cannot be removed")))?;

        let balances = self.store.balances(account).await?;
        let effect = handler.on_remove(account, &balances)?;

        let mut batch = effect.mutations;
        batch.extend(self.roll_bonuses(account, SELL_BONUS_CHANCE, balances.boost_active));
        self.store.apply(&batch).await?;

        Ok(UseReport {
            item,
            quantity: 0,
            consumed: false,
            message: effect.message,
        })
    }

    /// Transfers coins or items to another member. Both sides of the
    /// transfer and the recipient's notification commit as one unit, so a
    /// notification can never exist without its transfer or vice versa.
    pub async fn share(
        &self,
        sender: &Member,
        recipient: &Member,
        payload: Payload,
        confirmer: &dyn Confirm,
    ) -> EconomyResult<ShareReceipt> {
        if recipient.bot {
            return Err(EconomyError::invalid("you cannot share with bots"));
        }
        if recipient.id == sender.id {
            return Err(EconomyError::invalid("you cannot share with yourself"));
        }

        match payload {
            Payload::Coins(amount) if amount < 1 => {
                return Err(EconomyError::invalid("you must share at least one coin"));
            }
            Payload::Items(item, quantity) => {
                if quantity < 1 {
                    return Err(EconomyError::invalid("you must share at least one item"));
                }
                if !item.properties().is_tradeable {
                    return Err(EconomyError::invalid(format!("{item} cannot be traded")));
                }
            }
            _ => {}
        }

        let prompt = format!(
            "Are you sure you want to give {payload} to {}?",
            recipient.name
        );
        if prompt::confirm_within(confirmer, &prompt).await != Decision::Approved {
            return Err(EconomyError::Cancelled);
        }

        let (title, mut batch) = match payload {
            Payload::Coins(amount) => (
                "You got coins!",
                vec![
                    Mutation::wallet(sender.id, -amount),
                    Mutation::wallet(recipient.id, amount),
                ],
            ),
            Payload::Items(item, quantity) => (
                "You got items!",
                vec![
                    Mutation::item(sender.id, item, -quantity),
                    Mutation::item(recipient.id, item, quantity),
                ],
            ),
        };
        batch.push(Mutation::Notify {
            account: recipient.id,
            title: title.to_string(),
            content: format!("{} gave you {payload}.", sender.name),
        });
        self.store.apply(&batch).await?;
        tracing::info!(target: "economy.share", from = %sender.id, to = %recipient.id, payload = %payload, "share committed");

        let (sender_after, recipient_after) = match payload {
            Payload::Coins(_) => (
                self.store.balances(sender.id).await?.wallet,
                self.store.balances(recipient.id).await?.wallet,
            ),
            Payload::Items(item, _) => (
                self.store.quantity_of(sender.id, item).await?,
                self.store.quantity_of(recipient.id, item).await?,
            ),
        };
        Ok(ShareReceipt {
            payload,
            sender_after,
            recipient_after,
        })
    }

    /// Escrows coins or items and opens a claimable drop. The escrow debit
    /// happens immediately; resolution credits the first claimant, or
    /// refunds the dropper when the window expires.
    pub async fn drop_entity(
        &self,
        dropper: AccountId,
        payload: Payload,
    ) -> EconomyResult<PendingDrop> {
        PendingDrop::open(self.store.clone(), dropper, payload).await
    }

    /// [`drop_entity`](Self::drop_entity) for a coin payload.
    pub async fn drop_coins(&self, dropper: AccountId, amount: i64) -> EconomyResult<PendingDrop> {
        self.drop_entity(dropper, Payload::Coins(amount)).await
    }

    /// [`drop_entity`](Self::drop_entity) for an item payload.
    pub async fn drop_items(
        &self,
        dropper: AccountId,
        item: Item,
        quantity: i64,
    ) -> EconomyResult<PendingDrop> {
        self.drop_entity(dropper, Payload::Items(item, quantity)).await
    }

    /// Crafts a recipe; see [`crafting::craft`].
    pub async fn craft(
        &self,
        account: AccountId,
        recipe: Recipe,
        quantity: i64,
    ) -> EconomyResult<CraftReport> {
        crafting::craft(self.store.as_ref(), account, recipe, quantity).await
    }

    /// Interactive craft over an already-discovered recipe; see
    /// [`crafting::craft_discovered`].
    pub async fn craft_discovered(
        &self,
        account: AccountId,
        recipe: Recipe,
        quantity_prompt: &dyn QuantityPrompt,
    ) -> EconomyResult<CraftReport> {
        crafting::craft_discovered(self.store.as_ref(), account, recipe, quantity_prompt).await
    }

    /// How many of the recipe the account could craft right now.
    pub async fn max_craftable(&self, account: AccountId, recipe: Recipe) -> EconomyResult<i64> {
        let balances = self.store.balances(account).await?;
        let inventory = self.inventory().refresh(account).await?;
        Ok(crafting::max_craftable(&balances, &inventory, recipe))
    }

    pub async fn notifications(&self, account: AccountId) -> EconomyResult<Vec<Notification>> {
        self.store.notifications(account).await
    }

    /// Chance-gated exp and bank-space grants folded into an operation's
    /// batch. Never a reason for the primary effect to fail.
    fn roll_bonuses(&self, account: AccountId, chance: f64, boosted: bool) -> Vec<Mutation> {
        let mut rng = rand::thread_rng();
        let mut bonuses = Vec::new();
        if rng.gen_bool(chance) {
            let (low, high) = BONUS_EXP_RANGE;
            let exp = rng.gen_range(low..=high) * if boosted { 2 } else { 1 };
            bonuses.push(Mutation::exp(account, exp));
        }
        if rng.gen_bool(chance) {
            let (low, high) = BONUS_BANK_SPACE_RANGE;
            bonuses.push(Mutation::bank_space(account, rng.gen_range(low..=high)));
        }
        bonuses
    }
}
