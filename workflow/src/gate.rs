//! Owner-only authorization gate.

use std::sync::Arc;

use tixgate_contract::{ContractError, TicketContract};
use tixgate_crypto::to_checksum;
use tixgate_notify::Notifier;
use tixgate_types::{Account, Address};

use crate::messages;

/// How an account change was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// No account connected; nothing was queried.
    NoAccount,
    /// The account is the contract owner.
    Authorized,
    /// The contract is owned by someone else.
    Denied { owner: Address },
    /// The owner could not be read; treated as not authorized.
    Unavailable(ContractError),
}

/// Opens only for the account that owns the ticket contract.
///
/// Re-evaluated on every account change. While closed, no authorized
/// account is held.
pub struct AuthorizationGate {
    contract: Arc<dyn TicketContract>,
    notifier: Arc<dyn Notifier>,
    authorized: Option<Account>,
}

impl AuthorizationGate {
    pub fn new(contract: Arc<dyn TicketContract>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            contract,
            notifier,
            authorized: None,
        }
    }

    /// Resolve the gate for a newly connected (or disconnected) account.
    pub async fn on_account_changed(&mut self, account: Option<Account>) -> GateDecision {
        self.authorized = None;

        let Some(account) = account else {
            tracing::debug!("no account connected, gate closed");
            return GateDecision::NoAccount;
        };

        match self.contract.owner().await {
            Ok(owner) if owner == account.address => {
                tracing::info!(account = %to_checksum(&account.address), "owner connected, gate open");
                self.authorized = Some(account);
                GateDecision::Authorized
            }
            Ok(owner) => {
                tracing::warn!(
                    account = %to_checksum(&account.address),
                    owner = %to_checksum(&owner),
                    "account is not the contract owner"
                );
                self.notifier.notify(messages::unauthorized());
                GateDecision::Denied { owner }
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), "error fetching contract owner: {e}");
                GateDecision::Unavailable(e)
            }
        }
    }

    /// The account allowed to expire tickets, if any.
    pub fn authorized(&self) -> Option<&Account> {
        self.authorized.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.authorized.is_some()
    }
}
