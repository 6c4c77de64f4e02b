//! Record-keeping contract boundary.
//!
//! # Responsibilities
//! - Read the full transfer history and the transfer count
//! - Send the record-keeping call for a new transfer
//! - Monitor the record's confirmation

use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::sol;
use async_trait::async_trait;
use tokio::time::{interval, timeout};

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainTransfer, ConfirmationStatus, RecordEntry,
};

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    contract Transactions {
        struct TransferStruct {
            address sender;
            address receiver;
            uint256 amount;
            string message;
            uint256 timestamp;
            string keyword;
        }

        function addToBlockChain(address receiver, uint256 amount, string memory message, string memory keyword) public;

        function getAllTransactions() public view returns (TransferStruct[] memory);

        function getTransactionCount() public view returns (uint256);
    }
}

impl From<Transactions::TransferStruct> for ChainTransfer {
    fn from(raw: Transactions::TransferStruct) -> Self {
        Self {
            sender: raw.sender,
            receiver: raw.receiver,
            amount: raw.amount,
            message: raw.message,
            timestamp: raw.timestamp,
            keyword: raw.keyword,
        }
    }
}

/// The deployed record-keeping contract.
#[async_trait]
pub trait TransactionContract: Send + Sync {
    /// Every recorded transfer, in contract order.
    async fn get_all_transactions(&self) -> BlockchainResult<Vec<ChainTransfer>>;

    /// Number of recorded transfers.
    async fn get_transaction_count(&self) -> BlockchainResult<U256>;

    /// Send the record-keeping call from `from`. Returns once the node accepted it.
    async fn add_to_blockchain(&self, from: Address, entry: RecordEntry)
        -> BlockchainResult<TxHash>;

    /// Wait until a record-keeping transaction settles.
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus>;
}

/// Contract client over alloy's generated bindings.
#[derive(Debug, Clone)]
pub struct AlloyTransactionContract {
    client: ChainClient,
    address: Address,
}

impl AlloyTransactionContract {
    pub fn new(client: ChainClient, address: Address) -> Self {
        Self { client, address }
    }

    fn instance(&self) -> Transactions::TransactionsInstance<alloy::providers::DynProvider> {
        Transactions::new(self.address, self.client.provider().clone())
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl TransactionContract for AlloyTransactionContract {
    async fn get_all_transactions(&self) -> BlockchainResult<Vec<ChainTransfer>> {
        let instance = self.instance();
        let raw = self
            .client
            .call("getAllTransactions", async {
                instance.getAllTransactions().call().await
            })
            .await
            .map_err(into_contract_error)?;
        Ok(raw.into_iter().map(ChainTransfer::from).collect())
    }

    async fn get_transaction_count(&self) -> BlockchainResult<U256> {
        let instance = self.instance();
        self.client
            .call("getTransactionCount", async {
                instance.getTransactionCount().call().await
            })
            .await
            .map_err(into_contract_error)
    }

    async fn add_to_blockchain(
        &self,
        from: Address,
        entry: RecordEntry,
    ) -> BlockchainResult<TxHash> {
        let instance = self.instance();
        let pending = self
            .client
            .call("addToBlockChain", async {
                instance
                    .addToBlockChain(entry.receiver, entry.amount, entry.message, entry.keyword)
                    .from(from)
                    .send()
                    .await
            })
            .await
            .map_err(into_contract_error)?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, from = %from, "Record-keeping transaction sent");
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let config = self.client.config();
        let required_confirmations = u64::from(config.confirmation_blocks);
        let timeout_secs = config.confirmation_timeout_secs;
        let poll_interval = Duration::from_millis(config.poll_interval_ms);

        let result = timeout(Duration::from_secs(timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Ok(ConfirmationStatus::Failed(
                        "Transaction reverted".to_string(),
                    ));
                }

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // The inclusion block itself counts as the first confirmation.
                let confirmations = current_block.saturating_sub(tx_block) + 1;

                if confirmations >= required_confirmations {
                    return Ok(ConfirmationStatus::Confirmed {
                        block_number: tx_block,
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(timeout_secs)),
        }
    }
}

fn into_contract_error(err: BlockchainError) -> BlockchainError {
    match err {
        BlockchainError::Rpc(msg) => BlockchainError::Contract(msg),
        other => other,
    }
}
