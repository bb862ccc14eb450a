//! Seams to the interaction layer: confirmation dialogs and free-text
//! quantity prompts. The platform side (buttons, messages) lives outside
//! this crate; the core only sees the outcome, and owns the timeout so a
//! stalled prompt can never block an operation forever.

use crate::constants::{CONFIRM_TIMEOUT, QUANTITY_PROMPT_TIMEOUT};
use async_trait::async_trait;
use tokio::time::timeout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Declined,
    TimedOut,
}

/// A yes/no confirmation dialog presented to the user.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> Decision;
}

/// A free-text prompt for a quantity ("3", "half", "all"...). `None` means
/// the user never answered.
#[async_trait]
pub trait QuantityPrompt: Send + Sync {
    async fn ask(&self, prompt: &str) -> Option<String>;
}

/// Runs a confirmation with the crate-level timeout; a prompt that never
/// resolves counts as timed out.
pub(crate) async fn confirm_within(confirmer: &dyn Confirm, prompt: &str) -> Decision {
    timeout(CONFIRM_TIMEOUT, confirmer.confirm(prompt))
        .await
        .unwrap_or(Decision::TimedOut)
}

/// Runs a quantity prompt with the crate-level timeout.
pub(crate) async fn ask_within(prompt: &dyn QuantityPrompt, text: &str) -> Option<String> {
    timeout(QUANTITY_PROMPT_TIMEOUT, prompt.ask(text))
        .await
        .ok()
        .flatten()
}

/// Approves everything. For non-interactive callers and tests.
pub struct AutoConfirm;

#[async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> Decision {
        Decision::Approved
    }
}

/// Declines everything.
pub struct AutoDecline;

#[async_trait]
impl Confirm for AutoDecline {
    async fn confirm(&self, _prompt: &str) -> Decision {
        Decision::Declined
    }
}

/// Answers every quantity prompt with a fixed string.
pub struct FixedAnswer(pub String);

#[async_trait]
impl QuantityPrompt for FixedAnswer {
    async fn ask(&self, _prompt: &str) -> Option<String> {
        Some(self.0.clone())
    }
}
