//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! WalletConfig (RPC URL, timeouts)
//!     → client.rs (RPC connection with timeouts)
//!     → wallet.rs (account access, value transfers)
//!     → contract.rs (transfer history, record-keeping call, confirmation)
//! ```
//!
//! Both boundaries are traits so the bridge can be driven by fakes in tests.

pub mod client;
pub mod contract;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use contract::{AlloyTransactionContract, TransactionContract};
pub use types::{BlockchainError, BlockchainResult, ChainTransfer, ConfirmationStatus, RecordEntry, WalletTransfer};
pub use wallet::{RpcWalletProvider, WalletProvider};
