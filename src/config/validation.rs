//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that deserialize fine
//! but cannot work at runtime. All errors are collected, not just the first.

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `gif.limit`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.wallet.enabled {
        if let Err(e) = config.wallet.rpc_url.parse::<url::Url>() {
            errors.push(ValidationError::new(
                "wallet.rpc_url",
                format!("invalid URL '{}': {}", config.wallet.rpc_url, e),
            ));
        }
        if config.wallet.rpc_timeout_secs == 0 {
            errors.push(ValidationError::new("wallet.rpc_timeout_secs", "must be > 0"));
        }
        if config.wallet.confirmation_timeout_secs == 0 {
            errors.push(ValidationError::new(
                "wallet.confirmation_timeout_secs",
                "must be > 0",
            ));
        }
        if config.wallet.poll_interval_ms == 0 {
            errors.push(ValidationError::new("wallet.poll_interval_ms", "must be > 0"));
        }
        if config.contract.address.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                "contract.address",
                format!("'{}' is not a valid address", config.contract.address),
            ));
        }
    }

    if let Err(e) = config.gif.endpoint.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "gif.endpoint",
            format!("invalid URL '{}': {}", config.gif.endpoint, e),
        ));
    }
    if config.gif.limit == 0 {
        errors.push(ValidationError::new("gif.limit", "must be >= 1"));
    }
    if config.gif.timeout_secs == 0 {
        errors.push(ValidationError::new("gif.timeout_secs", "must be > 0"));
    }
    if config.gif.fallback_url.is_empty() {
        errors.push(ValidationError::new("gif.fallback_url", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
