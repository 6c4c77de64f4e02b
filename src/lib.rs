//! Wallet transfer front-end library.
//!
//! Two independent components:
//! - [`bridge::TransactionBridge`]: wallet session, transfer form, and
//!   transaction history over a wallet provider and a record-keeping contract
//! - [`gif::KeywordGifResolver`]: a transaction keyword resolved to one GIF URL

pub mod blockchain;
pub mod bridge;
pub mod config;
pub mod gif;
pub mod observability;
pub mod storage;

pub use bridge::TransactionBridge;
pub use config::AppConfig;
pub use gif::KeywordGifResolver;
