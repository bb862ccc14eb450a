// Library entry so integration tests and the bot glue can reference the
// economy core directly.
pub mod catalog;
pub mod constants;
pub mod crafting;
pub mod drops;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod ops;
pub mod prompt;
pub mod store;
pub mod usage;
pub mod util;

// Convenient re-exports for frequently used types.
pub use catalog::{Item, Recipe};
pub use drops::{DropOutcome, PendingDrop};
pub use error::{EconomyError, EconomyResult};
pub use ops::{Economy, Member, Payload};
pub use store::{AccountId, Balances, EconomyStore, MemStore, Mutation, PgStore};
