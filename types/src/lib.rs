//! Fundamental types for the ticket gate.
//!
//! Shared by every other crate in the workspace: contract addresses, ticket
//! identifiers, transaction hashes, receipts and the connected account.

pub mod account;
pub mod address;
pub mod error;
pub mod hash;
pub mod receipt;
pub mod token;

pub use account::Account;
pub use address::Address;
pub use error::TypesError;
pub use hash::TxHash;
pub use receipt::Receipt;
pub use token::TokenId;
