//! Connection settings for the JSON-RPC backend.

use std::time::Duration;

use tixgate_types::Address;

/// Where the ticket contract lives and how patiently to talk to it.
#[derive(Clone, Debug)]
pub struct RpcSettings {
    /// Node JSON-RPC endpoint.
    pub rpc_url: String,
    /// Deployed ticket contract.
    pub contract_address: Address,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// How long to wait for a receipt before reporting none.
    pub confirmation_timeout: Duration,
    /// Delay between receipt polls.
    pub poll_interval: Duration,
}

impl RpcSettings {
    pub fn new(rpc_url: impl Into<String>, contract_address: Address) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            contract_address,
            request_timeout: Duration::from_secs(30),
            confirmation_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_secs(1),
        }
    }
}
