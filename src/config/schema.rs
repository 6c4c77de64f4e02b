//! Configuration schema definitions.
//!
//! Every section derives Serde traits and defaults each field, so an empty
//! TOML file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Fallback GIF shown when a keyword has no match or the lookup fails.
pub const DEFAULT_FALLBACK_GIF: &str =
    "https://i.pinimg.com/originals/68/a0/9e/68a09e774e98242871c2db0f99307420.gif";

/// Root configuration for the application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Wallet provider connection.
    pub wallet: WalletConfig,

    /// Record-keeping contract.
    pub contract: ContractConfig,

    /// GIF search endpoint.
    pub gif: GifConfig,

    /// Durable local state.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Wallet provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Whether a wallet provider is present at all.
    pub enabled: bool,

    /// JSON-RPC endpoint of the wallet/node (accounts must be managed by it).
    pub rpc_url: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required before a record counts as settled.
    pub confirmation_blocks: u32,

    /// Maximum time to wait for a record-keeping confirmation.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 2000,
        }
    }
}

/// Deployed contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the record-keeping contract.
    pub address: String,
}

/// GIF search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GifConfig {
    /// Keyword search endpoint.
    pub endpoint: String,

    /// API key for the search endpoint. Usually supplied through the environment.
    pub api_key: String,

    /// Maximum number of results requested per lookup.
    pub limit: u32,

    /// URL used when the lookup yields nothing.
    pub fallback_url: String,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.giphy.com/v1/gifs/search".to_string(),
            api_key: String::new(),
            limit: 1,
            fallback_url: DEFAULT_FALLBACK_GIF.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Durable local state configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file backing the store. `None` keeps state in memory only.
    pub path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(!config.wallet.enabled);
        assert_eq!(config.gif.limit, 1);
        assert_eq!(config.gif.fallback_url, DEFAULT_FALLBACK_GIF);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_partial_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [wallet]
            enabled = true
            rpc_url = "http://127.0.0.1:9545"

            [gif]
            api_key = "abc"
            "#,
        )
        .unwrap();
        assert!(config.wallet.enabled);
        assert_eq!(config.wallet.rpc_url, "http://127.0.0.1:9545");
        assert_eq!(config.wallet.rpc_timeout_secs, 10);
        assert_eq!(config.gif.api_key, "abc");
        assert_eq!(config.gif.endpoint, "https://api.giphy.com/v1/gifs/search");
    }
}
