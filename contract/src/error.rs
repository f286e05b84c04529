//! Contract client error types.
//!
//! Callers collapse all of these into one user-facing message, so each
//! variant keeps enough detail to tell the causes apart in logs and tests.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("node returned HTTP {0}")]
    Http(u16),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("rejected by signer: {0}")]
    Rejected(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl ContractError {
    /// Short, stable name of the error kind for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ContractError::Transport(_) => "transport",
            ContractError::Http(_) => "http",
            ContractError::Rpc { .. } => "rpc",
            ContractError::Reverted(_) => "reverted",
            ContractError::Rejected(_) => "rejected",
            ContractError::Decode(_) => "decode",
        }
    }
}
