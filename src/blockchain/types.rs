//! Chain-specific types, unit conversions, and error definitions.

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, U256};
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed gas limit for a plain value transfer (21000).
pub const TRANSFER_GAS_LIMIT: &str = "0x5208";

/// Errors that can occur at the wallet or contract boundary.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// The wallet refused the request (user rejection, locked account).
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// A contract call could not be built, sent or decoded.
    #[error("Contract error: {0}")]
    Contract(String),

    /// A chain value could not be represented locally.
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is confirmed with required block depth.
    Confirmed { block_number: u64 },
    /// Transaction failed or was dropped.
    Failed(String),
}

/// Value transfer handed to the wallet (`eth_sendTransaction` params).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransfer {
    pub from: Address,
    pub to: Address,
    /// Gas limit as a hex quantity.
    pub gas: String,
    /// Amount in base units, serialized as a hex quantity.
    pub value: U256,
}

impl WalletTransfer {
    /// Plain transfer with the fixed gas limit.
    pub fn new(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to,
            gas: TRANSFER_GAS_LIMIT.to_string(),
            value,
        }
    }
}

/// Arguments of the contract's record-keeping entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub receiver: Address,
    pub amount: U256,
    pub message: String,
    pub keyword: String,
}

/// A transfer as stored by the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTransfer {
    pub sender: Address,
    pub receiver: Address,
    /// Fixed-point amount, 18 decimals.
    pub amount: U256,
    pub message: String,
    /// Unix seconds as reported by the chain.
    pub timestamp: U256,
    pub keyword: String,
}

/// Parse a decimal display amount (e.g. `"0.05"`) into base units.
pub fn parse_amount(amount: &str) -> BlockchainResult<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(BlockchainError::OutOfRange("amount is empty".to_string()));
    }
    parse_ether(trimmed)
        .map_err(|e| BlockchainError::OutOfRange(format!("invalid amount '{}': {}", amount, e)))
}

/// Convert a fixed-point 18-decimal amount into a display number.
pub fn amount_to_display(amount: U256) -> f64 {
    // format_ether always yields a plain decimal string
    format_ether(amount).parse().unwrap_or_default()
}

/// Render chain seconds as a local date-time string.
pub fn format_timestamp(timestamp: U256) -> BlockchainResult<String> {
    let secs = i64::try_from(timestamp)
        .map_err(|_| BlockchainError::OutOfRange(format!("timestamp {}", timestamp)))?;
    let local = Local
        .timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| BlockchainError::OutOfRange(format!("timestamp {}", secs)))?;
    Ok(local.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
}
