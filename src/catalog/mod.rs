//! The static item and recipe catalog, shared read-only by all accounts.

pub mod item;
pub mod recipe;

pub use item::{Item, ItemCategory, ItemProps, Rarity};
pub use recipe::{Recipe, RecipeProps};
