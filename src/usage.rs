//! Per-item use/remove behavior as capability objects selected by catalog
//! tag. Handlers are pure: they return the mutations to fold into the
//! operation's atomic batch, they never touch the store themselves.

use crate::catalog::item::Item;
use crate::constants::BANKNOTE_SPACE_RANGE;
use crate::error::{EconomyError, EconomyResult};
use crate::store::{AccountId, Balances, Mutation};
use rand::Rng;

/// What using (or removing) an item does: extra mutations for the batch and
/// a line for the user.
pub struct UseEffect {
    pub mutations: Vec<Mutation>,
    pub message: String,
}

pub trait ItemUsage: Send + Sync {
    fn on_use(
        &self,
        account: AccountId,
        balances: &Balances,
        quantity: i64,
    ) -> EconomyResult<UseEffect>;
}

pub trait ItemRemoval: Send + Sync {
    fn on_remove(&self, account: AccountId, balances: &Balances) -> EconomyResult<UseEffect>;
}

/// The usage handler for an item, if it has one.
pub fn usage_for(item: Item) -> Option<&'static dyn ItemUsage> {
    match item {
        Item::Banknote => Some(&Banknote),
        Item::XpBooster => Some(&XpBooster),
        Item::FishBait => Some(&FishBait),
        _ => None,
    }
}

/// The removal handler for an item, if it has one.
pub fn removal_for(item: Item) -> Option<&'static dyn ItemRemoval> {
    match item {
        Item::XpBooster => Some(&XpBooster),
        _ => None,
    }
}

impl Item {
    pub fn is_usable(&self) -> bool {
        usage_for(*self).is_some()
    }

    pub fn is_removable(&self) -> bool {
        removal_for(*self).is_some()
    }
}

/// Each banknote expands the account's bank capacity by a random amount.
struct Banknote;

impl ItemUsage for Banknote {
    fn on_use(
        &self,
        account: AccountId,
        _balances: &Balances,
        quantity: i64,
    ) -> EconomyResult<UseEffect> {
        let (low, high) = BANKNOTE_SPACE_RANGE;
        let mut rng = rand::thread_rng();
        let space: i64 = (0..quantity).map(|_| rng.gen_range(low..=high)).sum();
        Ok(UseEffect {
            mutations: vec![Mutation::bank_space(account, space)],
            message: format!("Your bank can now hold {space} more coins."),
        })
    }
}

/// Activates a boost flag; removing it deactivates the flag. Only one can
/// be active at a time.
struct XpBooster;

impl ItemUsage for XpBooster {
    fn on_use(
        &self,
        account: AccountId,
        balances: &Balances,
        quantity: i64,
    ) -> EconomyResult<UseEffect> {
        if quantity != 1 {
            return Err(EconomyError::invalid("you can only activate one XP booster"));
        }
        if balances.boost_active {
            return Err(EconomyError::invalid("an XP booster is already active"));
        }
        Ok(UseEffect {
            mutations: vec![Mutation::Boost {
                account,
                active: true,
            }],
            message: "XP booster activated: bonus experience is doubled.".into(),
        })
    }
}

impl ItemRemoval for XpBooster {
    fn on_remove(&self, account: AccountId, balances: &Balances) -> EconomyResult<UseEffect> {
        if !balances.boost_active {
            return Err(EconomyError::invalid("you have no active XP booster"));
        }
        Ok(UseEffect {
            mutations: vec![Mutation::Boost {
                account,
                active: false,
            }],
            message: "XP booster deactivated.".into(),
        })
    }
}

/// Bait turns into fish. Not the other way round.
struct FishBait;

impl ItemUsage for FishBait {
    fn on_use(
        &self,
        account: AccountId,
        _balances: &Balances,
        quantity: i64,
    ) -> EconomyResult<UseEffect> {
        let mut rng = rand::thread_rng();
        let caught: i64 = (0..quantity).map(|_| rng.gen_range(1..=3)).sum();
        Ok(UseEffect {
            mutations: vec![Mutation::item(account, Item::Fish, caught)],
            message: format!("You caught {caught} fish!"),
        })
    }
}
