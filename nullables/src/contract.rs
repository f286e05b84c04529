//! Nullable ticket contract: in-memory state with scripted failures.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use tixgate_contract::{ContractError, PreparedCall, TicketContract};
use tixgate_types::{Account, Address, Receipt, TokenId, TxHash};

/// What `send_and_confirm` does.
#[derive(Clone, Debug)]
pub enum SubmitBehavior {
    /// Mark the ticket expired and return a receipt. Like the real contract,
    /// a ticket that is already expired reverts.
    Confirm,
    /// Accept the transaction but never produce a receipt.
    NoReceipt,
    /// Fail with the given error.
    Fail(ContractError),
}

/// One recorded call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractCall {
    Owner,
    TicketExpired(TokenId),
    SendAndConfirm { token_id: TokenId, from: Address },
}

/// An in-memory ticket contract for testing.
pub struct NullContract {
    address: Address,
    owner: Mutex<Result<Address, ContractError>>,
    expired: Mutex<HashSet<TokenId>>,
    query_error: Mutex<Option<ContractError>>,
    submit: Mutex<SubmitBehavior>,
    submit_delay: Mutex<Duration>,
    calls: Mutex<Vec<ContractCall>>,
    next_block: AtomicU64,
}

impl NullContract {
    /// A contract owned by `owner` with no expired tickets.
    pub fn new(owner: Address) -> Self {
        Self {
            address: Address::new([0xc0; 20]),
            owner: Mutex::new(Ok(owner)),
            expired: Mutex::new(HashSet::new()),
            query_error: Mutex::new(None),
            submit: Mutex::new(SubmitBehavior::Confirm),
            submit_delay: Mutex::new(Duration::ZERO),
            calls: Mutex::new(Vec::new()),
            next_block: AtomicU64::new(1),
        }
    }

    /// Make `owner()` fail.
    pub fn fail_owner(&self, error: ContractError) {
        *self.owner.lock().unwrap() = Err(error);
    }

    /// Mark a ticket as already expired.
    pub fn expire(&self, token_id: TokenId) {
        self.expired.lock().unwrap().insert(token_id);
    }

    /// Make `ticket_expired()` fail.
    pub fn fail_queries(&self, error: ContractError) {
        *self.query_error.lock().unwrap() = Some(error);
    }

    pub fn set_submit(&self, behavior: SubmitBehavior) {
        *self.submit.lock().unwrap() = behavior;
    }

    /// Delay each submission, widening the window between check and act.
    pub fn set_submit_delay(&self, delay: Duration) {
        *self.submit_delay.lock().unwrap() = delay;
    }

    pub fn is_expired(&self, token_id: &TokenId) -> bool {
        self.expired.lock().unwrap().contains(token_id)
    }

    /// All calls in order (for assertions).
    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Tickets passed to `send_and_confirm`, in order.
    pub fn submissions(&self) -> Vec<TokenId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ContractCall::SendAndConfirm { token_id, .. } => Some(token_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ContractCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TicketContract for NullContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn owner(&self) -> Result<Address, ContractError> {
        self.record(ContractCall::Owner);
        self.owner.lock().unwrap().clone()
    }

    async fn ticket_expired(&self, token_id: &TokenId) -> Result<bool, ContractError> {
        self.record(ContractCall::TicketExpired(*token_id));
        if let Some(error) = self.query_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.is_expired(token_id))
    }

    async fn send_and_confirm(
        &self,
        call: &PreparedCall,
        from: &Account,
    ) -> Result<Option<Receipt>, ContractError> {
        self.record(ContractCall::SendAndConfirm {
            token_id: call.token_id,
            from: from.address,
        });

        let delay = *self.submit_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let behavior = self.submit.lock().unwrap().clone();
        match behavior {
            SubmitBehavior::Confirm => {
                if !self.expired.lock().unwrap().insert(call.token_id) {
                    return Err(ContractError::Reverted("Ticket already expired".into()));
                }
                let block_number = self.next_block.fetch_add(1, Ordering::Relaxed);
                Ok(Some(Receipt {
                    transaction_hash: TxHash::new([block_number as u8; 32]),
                    block_number,
                    success: true,
                }))
            }
            SubmitBehavior::NoReceipt => Ok(None),
            SubmitBehavior::Fail(error) => Err(error),
        }
    }
}
