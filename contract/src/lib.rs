//! Client for the ticket contract.
//!
//! Provides:
//! - ABI encoding of the three calls the gate needs and decoding of their results
//! - A JSON-RPC 2.0 client over HTTP
//! - The [`TicketContract`] seam and its JSON-RPC backend, [`RpcTicketContract`]

pub mod abi;
pub mod error;
pub mod rpc;
pub mod settings;
pub mod ticket;

pub use error::ContractError;
pub use rpc::JsonRpcClient;
pub use settings::RpcSettings;
pub use ticket::{PreparedCall, RpcTicketContract, TicketContract};
