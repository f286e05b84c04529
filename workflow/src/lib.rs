//! Ticket expiration workflow.
//!
//! An operator account is checked against the contract owner by the
//! [`AuthorizationGate`]. Scanned QR text then drives the
//! [`ExpirationWorkflow`]: validate the identifier, check the ticket on chain,
//! submit `setTicketExpired`, and report the outcome through a notifier.
//! [`ScannerSession`] ties both together with the explicit session state
//! (held account, held scan).

pub mod error;
pub mod expire;
pub mod gate;
pub mod messages;
pub mod session;
pub mod single_flight;

pub use error::ExpireError;
pub use expire::{ExpirationOutcome, ExpirationWorkflow, Stage};
pub use gate::{AuthorizationGate, GateDecision};
pub use session::{ScanEvent, ScannerSession, NOTHING_SCANNED};
pub use single_flight::{FlightGuard, SingleFlight};
