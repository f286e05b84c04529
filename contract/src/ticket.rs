//! The ticket contract seam and its JSON-RPC backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tokio::time::Instant;

use tixgate_types::{Account, Address, Receipt, TokenId, TxHash};

use crate::abi;
use crate::error::ContractError;
use crate::rpc::JsonRpcClient;
use crate::settings::RpcSettings;

/// A state-changing call, built but not yet submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedCall {
    /// Contract the call is addressed to.
    pub to: Address,
    /// ABI-encoded calldata.
    pub data: Vec<u8>,
    /// Ticket the call expires.
    pub token_id: TokenId,
}

/// Operations the gate needs from the deployed ticket contract.
#[async_trait]
pub trait TicketContract: Send + Sync {
    /// Address of the deployed contract.
    fn address(&self) -> Address;

    /// `owner() -> address`
    async fn owner(&self) -> Result<Address, ContractError>;

    /// `ticketExpired(uint256) -> bool`
    async fn ticket_expired(&self, token_id: &TokenId) -> Result<bool, ContractError>;

    /// Build `setTicketExpired(uint256)` without submitting it.
    fn prepare_set_ticket_expired(&self, token_id: &TokenId) -> Result<PreparedCall, ContractError> {
        Ok(PreparedCall {
            to: self.address(),
            data: abi::encode_set_ticket_expired(token_id),
            token_id: *token_id,
        })
    }

    /// Submit a prepared call signed by `from` and wait for it to be mined.
    ///
    /// `Ok(None)` means the transaction was sent but no receipt arrived in
    /// time. A mined-but-reverted transaction is an error.
    async fn send_and_confirm(
        &self,
        call: &PreparedCall,
        from: &Account,
    ) -> Result<Option<Receipt>, ContractError>;
}

/// Receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    transaction_hash: String,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl RawReceipt {
    /// `None` while the node reports the receipt without a block.
    fn into_receipt(self) -> Result<Option<Receipt>, ContractError> {
        let Some(block_number) = self.block_number else {
            return Ok(None);
        };
        let transaction_hash = TxHash::parse(&self.transaction_hash)
            .map_err(|e| ContractError::Decode(e.to_string()))?;
        // Receipts without a status field predate Byzantium; those only
        // exist for transactions that did not revert.
        let success = match self.status.as_deref() {
            Some(status) => abi::parse_quantity(status)? == 1,
            None => true,
        };
        Ok(Some(Receipt {
            transaction_hash,
            block_number: abi::parse_quantity(&block_number)?,
            success,
        }))
    }
}

/// [`TicketContract`] backed by a node's JSON-RPC endpoint.
///
/// Reads use `eth_call`; submission uses `eth_estimateGas` as a preflight
/// and `eth_sendTransaction`, so the node signs for the sending account.
pub struct RpcTicketContract {
    rpc: JsonRpcClient,
    address: Address,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl RpcTicketContract {
    pub fn new(settings: &RpcSettings) -> Result<Self, ContractError> {
        let rpc = JsonRpcClient::new(settings.rpc_url.clone(), settings.request_timeout)?;
        Ok(Self {
            rpc,
            address: settings.contract_address,
            confirmation_timeout: settings.confirmation_timeout,
            poll_interval: settings.poll_interval,
        })
    }

    /// The underlying JSON-RPC client.
    pub fn rpc(&self) -> &JsonRpcClient {
        &self.rpc
    }

    async fn call(&self, data: Vec<u8>) -> Result<Vec<u8>, ContractError> {
        let ret: String = self
            .rpc
            .request(
                "eth_call",
                json!([{ "to": self.address.to_string(), "data": abi::to_hex(&data) }, "latest"]),
            )
            .await?;
        abi::from_hex(&ret)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<Option<Receipt>, ContractError> {
        let deadline = Instant::now() + self.confirmation_timeout;
        loop {
            let raw: Option<RawReceipt> = self
                .rpc
                .request("eth_getTransactionReceipt", json!([hash.to_string()]))
                .await?;

            if let Some(receipt) = raw.map(RawReceipt::into_receipt).transpose()?.flatten() {
                if !receipt.success {
                    return Err(ContractError::Reverted(format!(
                        "transaction {hash} reverted in block {}",
                        receipt.block_number
                    )));
                }
                return Ok(Some(receipt));
            }

            if Instant::now() >= deadline {
                tracing::warn!(%hash, "no receipt within confirmation timeout");
                return Ok(None);
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl TicketContract for RpcTicketContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn owner(&self) -> Result<Address, ContractError> {
        let ret = self.call(abi::encode_owner()).await?;
        abi::decode_address(&ret)
    }

    async fn ticket_expired(&self, token_id: &TokenId) -> Result<bool, ContractError> {
        let ret = self.call(abi::encode_ticket_expired(token_id)).await?;
        abi::decode_bool(&ret)
    }

    async fn send_and_confirm(
        &self,
        call: &PreparedCall,
        from: &Account,
    ) -> Result<Option<Receipt>, ContractError> {
        let mut tx = json!({
            "from": from.address.to_string(),
            "to": call.to.to_string(),
            "data": abi::to_hex(&call.data),
        });

        let gas: String = self.rpc.request("eth_estimateGas", json!([tx.clone()])).await?;
        tx["gas"] = json!(gas);

        let hash: String = self.rpc.request("eth_sendTransaction", json!([tx])).await?;
        let hash = TxHash::parse(&hash).map_err(|e| ContractError::Decode(e.to_string()))?;
        tracing::info!(%hash, token_id = %call.token_id, "transaction submitted");

        self.wait_for_receipt(hash).await
    }
}
