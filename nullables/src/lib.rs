//! Nullable infrastructure for deterministic testing.
//!
//! The contract and the notification surface are the two external
//! collaborators of the workflow. This crate provides stand-ins that:
//! - Return scripted values
//! - Record every call for assertions
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod contract;
pub mod notifier;

pub use contract::{ContractCall, NullContract, SubmitBehavior};
pub use notifier::NullNotifier;
