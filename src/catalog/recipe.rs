//! Static crafting recipes: what they cost, what they consume, what they make.
//! Discovery is per-account state and lives in the store, not here.

use super::item::Item;
use std::fmt;
use std::str::FromStr;

pub struct RecipeProps {
    pub display_name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    /// Coin cost per craft. Zero means the recipe is free to craft.
    pub price: i64,
    pub ingredients: &'static [(Item, i64)],
    pub result: &'static [(Item, i64)],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recipe {
    DurableShovel,
    DurablePickaxe,
    DiamondPickaxe,
    FishBait,
    Compost,
}

impl Recipe {
    pub fn properties(&self) -> RecipeProps {
        match self {
            Recipe::DurableShovel => RecipeProps {
                display_name: "Durable Shovel",
                description: "A reinforced shovel that takes years to wear down.",
                emoji: "🪏",
                price: 10_000,
                ingredients: &[(Item::Shovel, 3), (Item::Iron, 3)],
                result: &[(Item::DurableShovel, 1)],
            },
            Recipe::DurablePickaxe => RecipeProps {
                display_name: "Durable Pickaxe",
                description: "A reinforced pickaxe that takes years to wear down.",
                emoji: "⛏️",
                price: 10_000,
                ingredients: &[(Item::Pickaxe, 3), (Item::Iron, 3)],
                result: &[(Item::DurablePickaxe, 1)],
            },
            Recipe::DiamondPickaxe => RecipeProps {
                display_name: "Diamond Pickaxe",
                description: "Cuts through rock like butter. The envy of every miner.",
                emoji: "💎",
                price: 100_000,
                ingredients: &[(Item::Pickaxe, 3), (Item::Diamond, 3)],
                result: &[(Item::DiamondPickaxe, 1)],
            },
            Recipe::FishBait => RecipeProps {
                display_name: "Fish Bait",
                description: "Crafted bait that makes fishing far more reliable.",
                emoji: "🪝",
                price: 50,
                ingredients: &[(Item::Worm, 3)],
                result: &[(Item::FishBait, 1)],
            },
            Recipe::Compost => RecipeProps {
                display_name: "Compost",
                description: "Let old fish rot down into a wriggling worm farm.",
                emoji: "🪣",
                price: 0,
                ingredients: &[(Item::Fish, 2)],
                result: &[(Item::Worm, 3)],
            },
        }
    }

    /// Stable string key used for persistence and lookups.
    pub fn key(&self) -> &'static str {
        match self {
            Recipe::DurableShovel => "durable_shovel",
            Recipe::DurablePickaxe => "durable_pickaxe",
            Recipe::DiamondPickaxe => "diamond_pickaxe",
            Recipe::FishBait => "fish_bait",
            Recipe::Compost => "compost",
        }
    }

    pub fn all() -> &'static [Recipe] {
        &[
            Recipe::DurableShovel,
            Recipe::DurablePickaxe,
            Recipe::DiamondPickaxe,
            Recipe::FishBait,
            Recipe::Compost,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        self.properties().display_name
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Recipe {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Recipe::all()
            .iter()
            .copied()
            .find(|recipe| recipe.key() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_recipe_has_ingredients_and_a_result() {
        for recipe in Recipe::all() {
            let props = recipe.properties();
            assert!(!props.ingredients.is_empty(), "{recipe} has no ingredients");
            assert!(!props.result.is_empty(), "{recipe} has no result");
            assert!(props.price >= 0);
        }
    }
}
