//! Timed, single-winner drops. The dropped coins/items are debited from the
//! dropper up front (escrowed), then credited exactly once: to the first
//! claimant, or back to the dropper when the claim window lapses.

use crate::constants::CLAIM_WINDOW;
use crate::error::{EconomyError, EconomyResult};
use crate::ops::Payload;
use crate::store::{AccountId, EconomyStore, Mutation};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::timeout;

/// Terminal outcome of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Claimed(AccountId),
    /// Nobody claimed in time; the escrow went back to the dropper.
    Expired,
}

#[derive(Debug, Clone, Copy)]
enum DropState {
    Open,
    Claimed(AccountId),
    Expired,
}

/// An open drop. Share it (`Arc`) with every task that may press the claim
/// button; exactly one of them will win.
pub struct PendingDrop {
    store: Arc<dyn EconomyStore>,
    dropper: AccountId,
    payload: Payload,
    // Guards the check-winner-then-set-winner sequence; without it two
    // simultaneous claimants could both pass the check.
    state: Mutex<DropState>,
    claimed: Notify,
}

impl fmt::Debug for PendingDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The store handle is not Debug; the identifying fields are enough.
        f.debug_struct("PendingDrop")
            .field("dropper", &self.dropper)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

impl PendingDrop {
    /// Escrows the payload out of the dropper's account and opens the drop.
    /// An insufficient balance or quantity aborts before anything is held.
    pub(crate) async fn open(
        store: Arc<dyn EconomyStore>,
        dropper: AccountId,
        payload: Payload,
    ) -> EconomyResult<Self> {
        let escrow = match payload {
            Payload::Coins(amount) => {
                if amount < 1 {
                    return Err(EconomyError::invalid("you must drop at least one coin"));
                }
                Mutation::wallet(dropper, -amount)
            }
            Payload::Items(item, quantity) => {
                if quantity < 1 {
                    return Err(EconomyError::invalid("you must drop at least one item"));
                }
                Mutation::item(dropper, item, -quantity)
            }
        };
        store.apply(&[escrow]).await?;
        tracing::info!(target: "economy.drop", %dropper, payload = %payload, "drop opened");

        Ok(Self {
            store,
            dropper,
            payload,
            state: Mutex::new(DropState::Open),
            claimed: Notify::new(),
        })
    }

    pub fn dropper(&self) -> AccountId {
        self.dropper
    }

    pub fn payload(&self) -> Payload {
        self.payload
    }

    /// Attempts to claim the drop. The first claimant other than the
    /// dropper wins and is credited before the method returns; everyone
    /// after that gets [`EconomyError::AlreadyClaimed`]. The dropper's own
    /// attempts are rejected without consuming the drop.
    pub async fn claim(&self, claimant: AccountId) -> EconomyResult<()> {
        if claimant == self.dropper {
            return Err(EconomyError::invalid(
                "you cannot claim your own drop, it's too late now!",
            ));
        }

        let mut state = self.state.lock().await;
        match *state {
            DropState::Open => {
                // Credit while holding the lock so the winner decision and
                // the credit are one step; on storage failure the drop
                // stays open for other claimants.
                self.store.apply(&self.credit(claimant)).await?;
                *state = DropState::Claimed(claimant);
                self.claimed.notify_one();
                tracing::info!(target: "economy.drop", winner = %claimant, payload = %self.payload, "drop claimed");
                Ok(())
            }
            DropState::Claimed(_) | DropState::Expired => Err(EconomyError::AlreadyClaimed),
        }
    }

    /// Waits out the claim window (120 seconds). Returns the winner, or
    /// refunds the dropper and reports [`DropOutcome::Expired`] when nobody
    /// claimed in time. A claim racing the deadline loses cleanly: whichever
    /// side takes the state lock first decides the terminal state.
    pub async fn resolve(&self) -> EconomyResult<DropOutcome> {
        self.resolve_within(CLAIM_WINDOW).await
    }

    /// [`resolve`](Self::resolve) with an explicit window.
    pub async fn resolve_within(&self, window: Duration) -> EconomyResult<DropOutcome> {
        let _ = timeout(window, self.claimed.notified()).await;

        let mut state = self.state.lock().await;
        match *state {
            DropState::Claimed(winner) => Ok(DropOutcome::Claimed(winner)),
            DropState::Open => {
                self.store.apply(&self.credit(self.dropper)).await?;
                *state = DropState::Expired;
                tracing::info!(target: "economy.drop", dropper = %self.dropper, payload = %self.payload, "drop expired, escrow returned");
                Ok(DropOutcome::Expired)
            }
            DropState::Expired => Ok(DropOutcome::Expired),
        }
    }

    fn credit(&self, to: AccountId) -> Vec<Mutation> {
        match self.payload {
            Payload::Coins(amount) => vec![Mutation::wallet(to, amount)],
            Payload::Items(item, quantity) => vec![Mutation::item(to, item, quantity)],
        }
    }
}
