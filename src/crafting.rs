//! The crafting engine: craftable-amount math and the atomic craft itself.
//!
//! Discovery is recorded on first successful craft, inside the same atomic
//! unit as the debits and credits, so a craft that fails to commit never
//! marks the recipe discovered.

use crate::catalog::item::Item;
use crate::catalog::recipe::Recipe;
use crate::error::{EconomyError, EconomyResult};
use crate::inventory::InventoryMap;
use crate::prompt::{self, QuantityPrompt};
use crate::store::{AccountId, Balances, EconomyStore, Mutation};
use crate::util::{parse_amount, AmountError};

/// Outcome of a successful craft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftReport {
    pub recipe: Recipe,
    pub quantity: i64,
    pub coins_spent: i64,
    /// True when this was the account's first successful craft of the
    /// recipe, which unlocks its full ingredient display.
    pub newly_discovered: bool,
    pub crafted: Vec<(Item, i64)>,
}

/// How many times the recipe can be crafted from the given state:
/// `min(wallet / price, min over ingredients of held / required)`.
/// A price of zero means "free" and puts no bound on the amount.
pub fn max_craftable(balances: &Balances, inventory: &InventoryMap, recipe: Recipe) -> i64 {
    let props = recipe.properties();
    let ingredient_bound = props
        .ingredients
        .iter()
        .map(|(item, required)| inventory.quantity_of(*item) / required)
        .min()
        .unwrap_or(0);
    if props.price == 0 {
        return ingredient_bound;
    }
    ingredient_bound.min(balances.wallet / props.price)
}

/// Crafts `quantity` of a recipe as one atomic unit: wallet debit,
/// ingredient debits, result credits, and the discovery record all commit
/// together or not at all. Preconditions are checked first so the failure
/// names the deficient resource; the store re-validates on apply.
pub async fn craft(
    store: &dyn EconomyStore,
    account: AccountId,
    recipe: Recipe,
    quantity: i64,
) -> EconomyResult<CraftReport> {
    if quantity < 1 {
        return Err(EconomyError::invalid("craft quantity must be at least 1"));
    }

    let props = recipe.properties();
    let cost = props
        .price
        .checked_mul(quantity)
        .ok_or_else(|| EconomyError::invalid("that quantity is too large"))?;

    let balances = store.balances(account).await?;
    if balances.wallet < cost {
        return Err(EconomyError::InsufficientFunds {
            needed: cost,
            available: balances.wallet,
        });
    }

    let mut batch = Vec::with_capacity(props.ingredients.len() + props.result.len() + 2);
    if cost != 0 {
        batch.push(Mutation::wallet(account, -cost));
    }
    for (item, required) in props.ingredients {
        let needed = required
            .checked_mul(quantity)
            .ok_or_else(|| EconomyError::invalid("that quantity is too large"))?;
        let held = store.quantity_of(account, *item).await?;
        if held < needed {
            return Err(EconomyError::InsufficientItems {
                item: *item,
                needed,
                held,
            });
        }
        batch.push(Mutation::item(account, *item, -needed));
    }
    let mut crafted = Vec::with_capacity(props.result.len());
    for (item, produced) in props.result {
        let made = produced
            .checked_mul(quantity)
            .ok_or_else(|| EconomyError::invalid("that quantity is too large"))?;
        batch.push(Mutation::item(account, *item, made));
        crafted.push((*item, made));
    }

    let newly_discovered = !store.is_discovered(account, recipe).await?;
    if newly_discovered {
        batch.push(Mutation::Discover { account, recipe });
    }

    store.apply(&batch).await?;
    tracing::info!(target: "economy.craft", %account, recipe = recipe.key(), quantity, newly_discovered, "craft committed");

    Ok(CraftReport {
        recipe,
        quantity,
        coins_spent: cost,
        newly_discovered,
        crafted,
    })
}

/// The interactive craft path, mirroring the recipe browser: only
/// already-discovered recipes qualify, and the quantity comes from a
/// free-text prompt ("3", "half", "max") with a bounded wait.
pub async fn craft_discovered(
    store: &dyn EconomyStore,
    account: AccountId,
    recipe: Recipe,
    quantity_prompt: &dyn QuantityPrompt,
) -> EconomyResult<CraftReport> {
    if !store.is_discovered(account, recipe).await? {
        return Err(EconomyError::NotDiscovered(recipe));
    }

    let balances = store.balances(account).await?;
    let mut inventory = InventoryMap::default();
    for (item, quantity) in store.inventory(account).await? {
        inventory.set(item, quantity);
    }
    let maximum = max_craftable(&balances, &inventory, recipe);
    if maximum == 0 {
        // Produces the precise insufficient-funds/ingredients error.
        return craft(store, account, recipe, 1).await;
    }

    let answer = prompt::ask_within(
        quantity_prompt,
        &format!(
            "How many {} do you want to craft? Send a valid quantity, e.g. \"3\" or \"half\".",
            recipe.display_name()
        ),
    )
    .await
    .ok_or(EconomyError::Cancelled)?;

    let quantity = match parse_amount(maximum, 1, maximum, &answer) {
        Ok(quantity) => quantity,
        Err(AmountError::NotEnough) => {
            return Err(EconomyError::invalid(format!(
                "you can craft at most {maximum} of this recipe"
            )))
        }
        Err(_) => return Err(EconomyError::invalid("that is not a valid quantity")),
    };

    craft(store, account, recipe, quantity).await
}
