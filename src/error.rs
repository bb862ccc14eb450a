//! The error taxonomy shared by every operation in the crate.
//! Every variant is recoverable at the operation boundary: callers turn them
//! into user-facing messages, nothing here should ever bubble up as a panic.

use crate::catalog::item::Item;
use crate::catalog::recipe::Recipe;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EconomyError {
    /// A wallet or bank balance would have gone negative.
    #[error("insufficient funds: needed {needed}, only {available} available")]
    InsufficientFunds { needed: i64, available: i64 },

    /// An inventory quantity would have gone negative.
    #[error("not enough {item}: needed {needed}, only {held} held")]
    InsufficientItems { item: Item, needed: i64, held: i64 },

    /// The operation targeted something it is not allowed to: yourself,
    /// a bot account, a non-buyable item, a zero quantity, and so on.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// The user declined a confirmation prompt, or an interactive step
    /// timed out. Nothing was applied.
    #[error("cancelled")]
    Cancelled,

    /// The interactive craft path requires the recipe to be discovered first.
    #[error("recipe {0} has not been discovered yet")]
    NotDiscovered(Recipe),

    /// Lost the race for a drop: somebody else claimed it first, or the
    /// claim window already expired.
    #[error("this drop has already been claimed")]
    AlreadyClaimed,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl EconomyError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidTarget(reason.into())
    }
}

pub type EconomyResult<T> = Result<T, EconomyError>;
