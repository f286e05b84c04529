//! Per-ticket serialization of expiration attempts.
//!
//! Attempts on the same ticket run one at a time, so the state check and the
//! submission of one attempt cannot interleave with another's. Attempts on
//! different tickets proceed concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use tixgate_types::TokenId;

/// Lock for one ticket and the number of attempts holding or waiting on it.
struct Slot {
    lock: Arc<AsyncMutex<()>>,
    users: usize,
}

/// Per-ticket async locks, created on demand and dropped when idle.
#[derive(Default)]
pub struct SingleFlight {
    slots: Mutex<HashMap<TokenId, Slot>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other attempt holds `token_id`, then hold it until the
    /// returned guard is dropped.
    ///
    /// Dropping the future while it waits gives up its place and its share
    /// of the slot.
    pub async fn acquire(&self, token_id: TokenId) -> FlightGuard<'_> {
        let lock = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            let slot = slots.entry(token_id).or_insert_with(|| Slot {
                lock: Arc::new(AsyncMutex::new(())),
                users: 0,
            });
            slot.users += 1;
            Arc::clone(&slot.lock)
        };
        // Registered before the wait so a cancelled waiter still releases.
        let mut flight = FlightGuard {
            flight: self,
            token_id,
            guard: None,
        };
        flight.guard = Some(lock.lock_owned().await);
        flight
    }

    /// Number of tickets that currently have a holder or waiters.
    pub fn in_flight(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, token_id: &TokenId) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get_mut(token_id) {
            slot.users = slot.users.saturating_sub(1);
            if slot.users == 0 {
                slots.remove(token_id);
            }
        }
    }
}

/// Exclusive hold on one ticket.
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
    token_id: TokenId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl FlightGuard<'_> {
    pub fn token_id(&self) -> &TokenId {
        &self.token_id
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.flight.release(&self.token_id);
    }
}
