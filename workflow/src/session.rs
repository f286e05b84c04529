//! Page-level controller: one operator at one scanner.

use std::sync::Arc;

use tixgate_contract::TicketContract;
use tixgate_notify::Notifier;
use tixgate_types::Account;

use crate::expire::{ExpirationOutcome, ExpirationWorkflow};
use crate::gate::{AuthorizationGate, GateDecision};

/// Shown in place of the ticket id before anything has been scanned.
pub const NOTHING_SCANNED: &str = "No QR code scanned";

/// One result from the QR scanning surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanEvent {
    Decoded(String),
    Error(String),
}

/// Holds the session state (authorized account, last scan) and routes
/// account changes, scans and "mark expired" requests.
pub struct ScannerSession {
    gate: AuthorizationGate,
    workflow: ExpirationWorkflow,
    scanned: Option<String>,
}

impl ScannerSession {
    pub fn new(contract: Arc<dyn TicketContract>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gate: AuthorizationGate::new(Arc::clone(&contract), Arc::clone(&notifier)),
            workflow: ExpirationWorkflow::new(contract, notifier),
            scanned: None,
        }
    }

    pub async fn on_account_changed(&mut self, account: Option<Account>) -> GateDecision {
        self.gate.on_account_changed(account).await
    }

    /// Record a scan. Only a decode with non-empty text replaces the held
    /// scan; scanner errors are routine (no code in frame) and only logged.
    pub fn on_scan(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Decoded(text) if !text.is_empty() => {
                tracing::debug!(%text, "scanned");
                self.scanned = Some(text);
            }
            ScanEvent::Decoded(_) => {}
            ScanEvent::Error(e) => tracing::debug!("scan error: {e}"),
        }
    }

    /// Run the expiration workflow for the held scan.
    ///
    /// The held scan and the gate are left as they are, whatever the outcome.
    pub async fn mark_expired(&self) -> ExpirationOutcome {
        self.workflow
            .expire(self.scanned.as_deref(), self.gate.authorized())
            .await
    }

    /// Whether there is a scan to act on.
    pub fn can_expire(&self) -> bool {
        self.scanned.is_some()
    }

    pub fn scanned(&self) -> Option<&str> {
        self.scanned.as_deref()
    }

    /// Text to show as the current ticket id.
    pub fn token_display(&self) -> &str {
        self.scanned.as_deref().unwrap_or(NOTHING_SCANNED)
    }

    pub fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }
}
