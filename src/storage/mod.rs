//! Durable local state.
//!
//! A small string key/value store that survives restarts, playing the role
//! the browser's local storage plays for a web front-end.

pub mod local;

use thiserror::Error;

pub use local::LocalStore;

/// Key holding the last known on-chain transaction count.
pub const TRANSACTION_COUNT_KEY: &str = "transactionCount";

/// Errors from the durable store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key/value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}
