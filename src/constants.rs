// Central constants for timeouts, bonus rolls and account defaults.
use std::time::Duration;

/// How long a drop stays open before the escrow is returned to the dropper.
pub const CLAIM_WINDOW: Duration = Duration::from_secs(120);
/// How long a free-text quantity prompt waits for an answer.
pub const QUANTITY_PROMPT_TIMEOUT: Duration = Duration::from_secs(30);
/// How long a yes/no confirmation dialog waits before counting as declined.
pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// Starting bank capacity for a fresh account.
pub const DEFAULT_MAX_BANK: i64 = 500;

// Randomized side-bonus rolls applied opportunistically by buy/sell/use.
pub const BONUS_EXP_RANGE: (i64, i64) = (10, 15);
pub const BONUS_BANK_SPACE_RANGE: (i64, i64) = (10, 15);
pub const BUY_BONUS_CHANCE: f64 = 0.5;
pub const SELL_BONUS_CHANCE: f64 = 0.4;

/// Bank capacity granted by using a banknote.
pub const BANKNOTE_SPACE_RANGE: (i64, i64) = (1_000, 2_500);
