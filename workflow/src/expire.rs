//! The guarded check-then-act sequence that expires one ticket.
//!
//! ```text
//! Idle → Validating → CheckingState → Rejected
//!                                   → Submitting → Confirmed
//!                                                → Failed
//! ```
//!
//! Every failure is terminal for the invocation. Nothing is retried and no
//! state survives between invocations except the per-ticket lock, which is
//! released on return.

use std::fmt;
use std::sync::Arc;

use tixgate_contract::{ContractError, TicketContract};
use tixgate_notify::Notifier;
use tixgate_types::{Account, Receipt, TokenId};

use crate::error::ExpireError;
use crate::messages;
use crate::single_flight::SingleFlight;

/// States of one expiration attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    CheckingState,
    Rejected,
    Submitting,
    Confirmed,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::CheckingState => "checking-state",
            Stage::Rejected => "rejected",
            Stage::Submitting => "submitting",
            Stage::Confirmed => "confirmed",
            Stage::Failed => "failed",
        })
    }
}

/// How an attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpirationOutcome {
    /// Scan missing or not a non-negative integer. No remote call was made.
    InvalidTokenId,
    /// No authorized account held. Silent; no remote call was made.
    NotAuthorized,
    /// The contract already reports the ticket as expired. Nothing submitted.
    AlreadyExpired(TokenId),
    /// Submitted and mined.
    Confirmed { token_id: TokenId, receipt: Receipt },
    /// Submitted, but no receipt arrived.
    NoReceipt(TokenId),
    /// A remote call failed.
    Failed(ExpireError),
}

impl ExpirationOutcome {
    /// The terminal state of the attempt.
    pub fn stage(&self) -> Stage {
        match self {
            ExpirationOutcome::InvalidTokenId
            | ExpirationOutcome::NotAuthorized
            | ExpirationOutcome::AlreadyExpired(_) => Stage::Rejected,
            ExpirationOutcome::Confirmed { .. } => Stage::Confirmed,
            ExpirationOutcome::NoReceipt(_) | ExpirationOutcome::Failed(_) => Stage::Failed,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, ExpirationOutcome::Confirmed { .. })
    }
}

/// Runs expiration attempts against one contract.
pub struct ExpirationWorkflow {
    contract: Arc<dyn TicketContract>,
    notifier: Arc<dyn Notifier>,
    in_flight: SingleFlight,
}

impl ExpirationWorkflow {
    pub fn new(contract: Arc<dyn TicketContract>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            contract,
            notifier,
            in_flight: SingleFlight::new(),
        }
    }

    /// Expire the ticket named by `scanned`, acting as `account`.
    ///
    /// Attempts on the same ticket are serialized from the state check
    /// through confirmation.
    pub async fn expire(&self, scanned: Option<&str>, account: Option<&Account>) -> ExpirationOutcome {
        tracing::debug!(from = %Stage::Idle, to = %Stage::Validating, ?scanned, "attempt started");
        let token_id = match scanned.map(TokenId::from_scanned) {
            Some(Ok(token_id)) => token_id,
            Some(Err(e)) => {
                tracing::debug!("rejecting scan: {e}");
                self.notifier.notify(messages::invalid_token_id());
                return ExpirationOutcome::InvalidTokenId;
            }
            None => {
                tracing::debug!("rejecting attempt: nothing scanned");
                self.notifier.notify(messages::invalid_token_id());
                return ExpirationOutcome::InvalidTokenId;
            }
        };

        let Some(account) = account else {
            tracing::debug!(%token_id, "no authorized account, ignoring attempt");
            return ExpirationOutcome::NotAuthorized;
        };

        let _flight = self.in_flight.acquire(token_id).await;

        tracing::debug!(stage = %Stage::CheckingState, %token_id);
        let expired = match self.contract.ticket_expired(&token_id).await {
            Ok(expired) => expired,
            Err(e) => return self.fail(token_id, Stage::CheckingState, e),
        };

        if expired {
            tracing::info!(stage = %Stage::Rejected, %token_id, "ticket already expired");
            self.notifier.notify(messages::already_expired());
            return ExpirationOutcome::AlreadyExpired(token_id);
        }

        self.submit(token_id, account).await
    }

    async fn submit(&self, token_id: TokenId, account: &Account) -> ExpirationOutcome {
        tracing::debug!(stage = %Stage::Submitting, %token_id);
        let call = match self.contract.prepare_set_ticket_expired(&token_id) {
            Ok(call) => call,
            Err(e) => return self.fail(token_id, Stage::Submitting, e),
        };

        let progress = self.notifier.notify(messages::in_progress());
        let result = self.contract.send_and_confirm(&call, account).await;
        self.notifier.dismiss(progress);

        match result {
            Ok(Some(receipt)) => {
                tracing::info!(
                    stage = %Stage::Confirmed,
                    %token_id,
                    tx = %receipt.transaction_hash,
                    block = receipt.block_number,
                    "ticket expired"
                );
                self.notifier.notify(messages::transaction_successful());
                ExpirationOutcome::Confirmed { token_id, receipt }
            }
            Ok(None) => {
                tracing::warn!(stage = %Stage::Failed, %token_id, "transaction not confirmed");
                self.notifier.notify(messages::transaction_failed());
                ExpirationOutcome::NoReceipt(token_id)
            }
            Err(e) => self.fail(token_id, Stage::Submitting, e),
        }
    }

    fn fail(&self, token_id: TokenId, stage: Stage, source: ContractError) -> ExpirationOutcome {
        tracing::error!(%token_id, %stage, kind = source.kind(), "transaction error: {source}");
        self.notifier.notify(messages::something_went_wrong());
        ExpirationOutcome::Failed(ExpireError {
            token_id,
            stage,
            source,
        })
    }
}
