//! UI-facing state owned by the transaction bridge.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use thiserror::Error;
use std::str::FromStr;

use crate::blockchain::types::{amount_to_display, format_timestamp, BlockchainResult, ChainTransfer};

/// The connected wallet account, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalletSession {
    pub current_account: Option<Address>,
}

impl WalletSession {
    pub fn is_connected(&self) -> bool {
        self.current_account.is_some()
    }
}

/// Fields the user fills in before submitting a transfer. Not validated here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferForm {
    pub address_to: String,
    /// Decimal amount in display units (e.g. `"0.01"`).
    pub amount: String,
    pub keyword: String,
    pub message: String,
}

/// Name of a single [`TransferForm`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    AddressTo,
    Amount,
    Keyword,
    Message,
}

impl TransferForm {
    /// Set one field, leaving the others untouched.
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::AddressTo => self.address_to = value,
            FormField::Amount => self.amount = value,
            FormField::Keyword => self.keyword = value,
            FormField::Message => self.message = value,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::AddressTo => &self.address_to,
            FormField::Amount => &self.amount,
            FormField::Keyword => &self.keyword,
            FormField::Message => &self.message,
        }
    }
}

/// Error for an unknown form field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    /// Accepts both the camelCase names used by front-ends and snake_case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addressTo" | "address_to" => Ok(Self::AddressTo),
            "amount" => Ok(Self::Amount),
            "keyword" => Ok(Self::Keyword),
            "message" => Ok(Self::Message),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// A transfer as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub address_from: Address,
    pub address_to: Address,
    /// Local date-time string derived from the chain timestamp.
    pub timestamp: String,
    pub message: String,
    pub keyword: String,
    /// Display amount derived from the 18-decimal fixed-point value.
    pub amount: f64,
}

impl TransactionRecord {
    /// Map a contract record into its display form.
    pub fn from_chain(transfer: ChainTransfer) -> BlockchainResult<Self> {
        Ok(Self {
            address_from: transfer.sender,
            address_to: transfer.receiver,
            timestamp: format_timestamp(transfer.timestamp)?,
            message: transfer.message,
            keyword: transfer.keyword,
            amount: amount_to_display(transfer.amount),
        })
    }
}

/// Where a submission currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    /// The wallet is signing and broadcasting the value transfer.
    AwaitingWalletConfirmation,
    /// The record-keeping call is waiting for its confirmation. `loading` is set.
    AwaitingChainConfirmation,
    /// Confirmed; derived state is being refreshed.
    Settled,
}

/// Full bridge state, published to subscribers on every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeState {
    pub session: WalletSession,
    pub form: TransferForm,
    pub loading: bool,
    pub phase: SubmissionPhase,
    pub transactions: Vec<TransactionRecord>,
    /// Last known on-chain transaction count. A display hint only.
    pub transaction_count: Option<u64>,
}

/// Result of a settled submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// Hash of the wallet value transfer.
    pub transfer_hash: TxHash,
    /// Hash of the record-keeping contract call.
    pub record_hash: TxHash,
    pub block_number: u64,
    pub transaction_count: Option<u64>,
}
