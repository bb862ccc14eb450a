//! Defines all items, their properties, and master lists for the economy.
//! The catalog is static: it is baked into the binary, constructed nowhere,
//! and shared read-only by every account.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    Resource,
    Tool,
    Consumable,
    Special,
}

pub struct ItemProps {
    pub display_name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub category: ItemCategory,
    pub rarity: Rarity,
    /// Shop price; `None` means the item cannot be bought.
    pub buy_price: Option<i64>,
    /// Sell value; `None` means the item cannot be sold.
    pub sell_price: Option<i64>,
    pub is_tradeable: bool,
    /// Whether one unit is consumed when the item is used.
    pub dispose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Item {
    Fish,
    Worm,
    FishBait,
    GoldenFish,
    Ore,
    Iron,
    Diamond,
    Shovel,
    Pickaxe,
    DurableShovel,
    DurablePickaxe,
    DiamondPickaxe,
    Lifesaver,
    Banknote,
    XpBooster,
}

impl Item {
    pub fn properties(&self) -> ItemProps {
        match self {
            Item::Fish => ItemProps {
                display_name: "Fish",
                description: "A common fish. Good for selling in bulk.",
                emoji: "🐟",
                category: ItemCategory::Resource,
                rarity: Rarity::Common,
                buy_price: Some(20),
                sell_price: Some(10),
                is_tradeable: true,
                dispose: false,
            },
            Item::Worm => ItemProps {
                display_name: "Worm",
                description: "Wriggly. Three of these make decent fish bait.",
                emoji: "🪱",
                category: ItemCategory::Resource,
                rarity: Rarity::Common,
                buy_price: Some(10),
                sell_price: Some(3),
                is_tradeable: true,
                dispose: false,
            },
            Item::FishBait => ItemProps {
                display_name: "Fish Bait",
                description: "Crafted bait that makes fishing far more reliable.",
                emoji: "🪝",
                category: ItemCategory::Consumable,
                rarity: Rarity::Common,
                buy_price: None,
                sell_price: Some(20),
                is_tradeable: true,
                dispose: true,
            },
            Item::GoldenFish => ItemProps {
                display_name: "Golden Fish",
                description: "An incredibly rare and valuable fish. A true prize!",
                emoji: "🐠",
                category: ItemCategory::Special,
                rarity: Rarity::Rare,
                buy_price: None,
                sell_price: Some(1_000),
                is_tradeable: true,
                dispose: false,
            },
            Item::Ore => ItemProps {
                display_name: "Ore",
                description: "A chunk of raw, unprocessed ore.",
                emoji: "⛏️",
                category: ItemCategory::Resource,
                rarity: Rarity::Common,
                buy_price: Some(100),
                sell_price: Some(50),
                is_tradeable: true,
                dispose: false,
            },
            Item::Iron => ItemProps {
                display_name: "Iron",
                description: "Smelted and sturdy. The backbone of every durable tool.",
                emoji: "🔩",
                category: ItemCategory::Resource,
                rarity: Rarity::Uncommon,
                buy_price: Some(300),
                sell_price: Some(120),
                is_tradeable: true,
                dispose: false,
            },
            Item::Diamond => ItemProps {
                display_name: "Diamond",
                description: "Extremely hard and extremely valuable.",
                emoji: "💎",
                category: ItemCategory::Resource,
                rarity: Rarity::Rare,
                buy_price: None,
                sell_price: Some(5_000),
                is_tradeable: true,
                dispose: false,
            },
            Item::Shovel => ItemProps {
                display_name: "Shovel",
                description: "Digs holes. Wears out faster than you'd hope.",
                emoji: "🪏",
                category: ItemCategory::Tool,
                rarity: Rarity::Common,
                buy_price: Some(2_000),
                sell_price: Some(740),
                is_tradeable: true,
                dispose: false,
            },
            Item::Pickaxe => ItemProps {
                display_name: "Pickaxe",
                description: "Standard issue mining equipment.",
                emoji: "⛏️",
                category: ItemCategory::Tool,
                rarity: Rarity::Common,
                buy_price: Some(2_500),
                sell_price: Some(925),
                is_tradeable: true,
                dispose: false,
            },
            Item::DurableShovel => ItemProps {
                display_name: "Durable Shovel",
                description: "A reinforced shovel that takes years to wear down.",
                emoji: "🪏",
                category: ItemCategory::Tool,
                rarity: Rarity::Uncommon,
                buy_price: None,
                sell_price: Some(10_000),
                is_tradeable: true,
                dispose: false,
            },
            Item::DurablePickaxe => ItemProps {
                display_name: "Durable Pickaxe",
                description: "A reinforced pickaxe that takes years to wear down.",
                emoji: "⛏️",
                category: ItemCategory::Tool,
                rarity: Rarity::Uncommon,
                buy_price: None,
                sell_price: Some(10_000),
                is_tradeable: true,
                dispose: false,
            },
            Item::DiamondPickaxe => ItemProps {
                display_name: "Diamond Pickaxe",
                description: "Cuts through rock like butter. The envy of every miner.",
                emoji: "💎",
                category: ItemCategory::Tool,
                rarity: Rarity::Legendary,
                buy_price: None,
                sell_price: Some(55_000),
                is_tradeable: true,
                dispose: false,
            },
            Item::Lifesaver => ItemProps {
                display_name: "Lifesaver",
                description: "These quite literally save your life.",
                emoji: "🛟",
                category: ItemCategory::Consumable,
                rarity: Rarity::Uncommon,
                buy_price: Some(4_200),
                sell_price: Some(1_555),
                is_tradeable: true,
                dispose: false,
            },
            Item::Banknote => ItemProps {
                display_name: "Banknote",
                description: "Use it to expand the capacity of your bank.",
                emoji: "💵",
                category: ItemCategory::Special,
                rarity: Rarity::Rare,
                buy_price: None,
                sell_price: Some(5_000),
                is_tradeable: true,
                dispose: true,
            },
            Item::XpBooster => ItemProps {
                display_name: "XP Booster",
                description: "Doubles bonus experience while active. Remove to deactivate.",
                emoji: "⚡",
                category: ItemCategory::Special,
                rarity: Rarity::Rare,
                buy_price: Some(3_000),
                sell_price: None,
                is_tradeable: false,
                dispose: true,
            },
        }
    }

    /// Stable string key used for persistence and lookups.
    pub fn key(&self) -> &'static str {
        match self {
            Item::Fish => "fish",
            Item::Worm => "worm",
            Item::FishBait => "fish_bait",
            Item::GoldenFish => "golden_fish",
            Item::Ore => "ore",
            Item::Iron => "iron",
            Item::Diamond => "diamond",
            Item::Shovel => "shovel",
            Item::Pickaxe => "pickaxe",
            Item::DurableShovel => "durable_shovel",
            Item::DurablePickaxe => "durable_pickaxe",
            Item::DiamondPickaxe => "diamond_pickaxe",
            Item::Lifesaver => "lifesaver",
            Item::Banknote => "banknote",
            Item::XpBooster => "xp_booster",
        }
    }

    pub fn all() -> &'static [Item] {
        &[
            Item::Fish,
            Item::Worm,
            Item::FishBait,
            Item::GoldenFish,
            Item::Ore,
            Item::Iron,
            Item::Diamond,
            Item::Shovel,
            Item::Pickaxe,
            Item::DurableShovel,
            Item::DurablePickaxe,
            Item::DiamondPickaxe,
            Item::Lifesaver,
            Item::Banknote,
            Item::XpBooster,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        self.properties().display_name
    }

    pub fn is_buyable(&self) -> bool {
        self.properties().buy_price.is_some()
    }

    pub fn is_sellable(&self) -> bool {
        self.properties().sell_price.is_some()
    }

    /// Convenience wrapper; `None` when the item has no buy price.
    pub fn buy_price(&self) -> Option<i64> {
        self.properties().buy_price
    }

    pub fn sell_price(&self) -> Option<i64> {
        self.properties().sell_price
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Item {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Item::all()
            .iter()
            .copied()
            .find(|item| item.key() == s)
            .ok_or(())
    }
}
