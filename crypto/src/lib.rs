//! Hashing primitives used to talk to the ticket contract.
//!
//! - **Keccak-256** (the pre-standard SHA-3 padding used by the EVM)
//! - 4-byte function selectors derived from canonical signatures
//! - EIP-55 mixed-case checksum rendering for addresses shown to operators

pub mod checksum;
pub mod hash;

pub use checksum::to_checksum;
pub use hash::{function_selector, keccak256};
