//! Wallet provider boundary.
//!
//! The wallet owns the user's accounts and signs value transfers. Account
//! access and sending go through the standard JSON-RPC methods:
//! - `eth_accounts`: already-authorized accounts, never prompts
//! - `eth_requestAccounts`: asks the user for access
//! - `eth_sendTransaction`: signs and broadcasts a [`WalletTransfer`]

use alloy::primitives::{Address, TxHash};
use alloy::providers::Provider;
use async_trait::async_trait;

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, WalletTransfer};

/// Account access and value transfers.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the user already authorized. Must not prompt.
    async fn accounts(&self) -> BlockchainResult<Vec<Address>>;

    /// Ask the user for account access.
    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>>;

    /// Sign and broadcast a plain value transfer.
    async fn send_transaction(&self, transfer: WalletTransfer) -> BlockchainResult<TxHash>;
}

/// Wallet provider backed by a node that manages the accounts (e.g. Anvil, Geth with
/// unlocked accounts, or a wallet exposing a JSON-RPC endpoint).
#[derive(Debug, Clone)]
pub struct RpcWalletProvider {
    client: ChainClient,
}

impl RpcWalletProvider {
    pub fn new(client: ChainClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.client
            .call("eth_accounts", self.client.provider().get_accounts())
            .await
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.client
            .call(
                "eth_requestAccounts",
                self.client
                    .provider()
                    .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), ()),
            )
            .await
            .map_err(into_wallet_error)
    }

    async fn send_transaction(&self, transfer: WalletTransfer) -> BlockchainResult<TxHash> {
        tracing::debug!(
            from = %transfer.from,
            to = %transfer.to,
            value = %transfer.value,
            "Requesting wallet transfer"
        );
        self.client
            .call(
                "eth_sendTransaction",
                self.client
                    .provider()
                    .raw_request::<_, TxHash>("eth_sendTransaction".into(), (transfer,)),
            )
            .await
            .map_err(into_wallet_error)
    }
}

/// RPC failures on prompting methods are wallet-side refusals; timeouts stay timeouts.
fn into_wallet_error(err: BlockchainError) -> BlockchainError {
    match err {
        BlockchainError::Rpc(msg) => BlockchainError::Wallet(msg),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_errors_become_wallet_errors() {
        let err = into_wallet_error(BlockchainError::Rpc("User rejected the request".into()));
        assert!(matches!(err, BlockchainError::Wallet(_)));
        assert!(err.to_string().contains("User rejected"));

        let err = into_wallet_error(BlockchainError::Timeout(5));
        assert!(matches!(err, BlockchainError::Timeout(5)));
    }

    #[tokio::test]
    async fn test_unreachable_wallet() {
        let config = crate::config::WalletConfig {
            enabled: true,
            rpc_url: "http://127.0.0.1:9".into(),
            rpc_timeout_secs: 2,
            ..Default::default()
        };
        let wallet = RpcWalletProvider::new(ChainClient::new(config).unwrap());
        let err = wallet.request_accounts().await.unwrap_err();
        assert!(matches!(
            err,
            BlockchainError::Wallet(_) | BlockchainError::Timeout(_)
        ));
    }
}
