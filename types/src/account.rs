//! The connected operator account.

use crate::address::Address;
use crate::error::TypesError;

/// An account that can sign transactions.
///
/// Only the address is held locally. Signing happens wherever the key lives
/// (for the JSON-RPC backend, the node's account manager).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Account {
    pub address: Address,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn parse(address: &str) -> Result<Self, TypesError> {
        Ok(Self::new(Address::parse(address)?))
    }
}
