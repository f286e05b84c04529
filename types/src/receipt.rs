//! Confirmation receipt of a mined transaction.

use crate::hash::TxHash;

/// What the chain reports once a submitted transaction has been included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    /// `false` when the transaction was mined but reverted.
    pub success: bool,
}
