//! Wallet/contract to UI state bridge.
//!
//! # State machine (per submission)
//! ```text
//! idle → awaiting-wallet-confirmation → awaiting-chain-confirmation (loading)
//!      → settled (refresh all derived state)
//! any failure → idle
//! ```

pub mod error;
pub mod notice;
pub mod service;
pub mod state;

pub use error::{BridgeError, BridgeResult, ErrorKind};
pub use notice::{Notifier, TracingNotifier, INSTALL_WALLET_NOTICE};
pub use service::TransactionBridge;
pub use state::{
    BridgeState, FormField, SubmissionPhase, SubmissionReceipt, TransactionRecord, TransferForm,
    WalletSession,
};
