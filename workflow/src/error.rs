//! Workflow error types.

use thiserror::Error;

use tixgate_contract::ContractError;
use tixgate_types::TokenId;

use crate::expire::Stage;

/// A remote failure inside the workflow, with the step it happened in.
///
/// The operator only ever sees the generic failure message; this keeps the
/// underlying kind for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} failed for ticket {token_id}: {source}")]
pub struct ExpireError {
    pub token_id: TokenId,
    pub stage: Stage,
    pub source: ContractError,
}
