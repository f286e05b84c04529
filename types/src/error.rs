//! Errors raised while parsing the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("token id is empty")]
    EmptyTokenId,

    #[error("token id is not a non-negative integer: {0:?}")]
    InvalidTokenId(String),

    #[error("token id does not fit in 256 bits: {0}")]
    TokenIdOverflow(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),
}
