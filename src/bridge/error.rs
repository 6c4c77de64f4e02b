//! Typed outcomes of bridge operations.

use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::storage::StorageError;

/// Coarse failure category, for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No wallet provider present. The user has been notified.
    MissingProvider,
    /// No account connected yet.
    NotConnected,
    /// The transfer form cannot be submitted as filled in.
    InvalidForm,
    /// The wallet refused or failed the request.
    Wallet,
    /// A contract read or write failed.
    Contract,
    /// Durable local state could not be read or written.
    Storage,
}

/// Error returned by every bridge operation.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no wallet provider available")]
    MissingProvider,

    #[error("no wallet account connected")]
    NotConnected,

    #[error("invalid transfer form: {0}")]
    InvalidForm(String),

    #[error("wallet request failed: {0}")]
    Wallet(#[source] BlockchainError),

    #[error("contract call failed: {0}")]
    Contract(#[source] BlockchainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl BridgeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingProvider => ErrorKind::MissingProvider,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::InvalidForm(_) => ErrorKind::InvalidForm,
            Self::Wallet(_) => ErrorKind::Wallet,
            Self::Contract(_) => ErrorKind::Contract,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
