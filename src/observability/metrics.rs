//! Metrics recording helpers.
//!
//! # Metrics
//! - `krypt_transfers_total` (counter): submissions by `outcome` (settled, failed)
//! - `krypt_gif_lookups_total` (counter): lookups by `outcome` (hit, fallback, stale)
//! - `krypt_transaction_count` (gauge): last known on-chain transaction count
//! - `krypt_transactions_listed` (gauge): size of the last fetched transaction list

use metrics::{counter, gauge};

/// Record the outcome of a transfer submission.
pub fn record_transfer(outcome: &'static str) {
    counter!("krypt_transfers_total", "outcome" => outcome).increment(1);
}

/// Record the outcome of a GIF lookup.
pub fn record_gif_lookup(outcome: &'static str) {
    counter!("krypt_gif_lookups_total", "outcome" => outcome).increment(1);
}

/// Record the last known on-chain transaction count.
pub fn record_transaction_count(count: u64) {
    gauge!("krypt_transaction_count").set(count as f64);
}

/// Record the number of transactions in the last fetched list.
pub fn record_transactions_listed(len: usize) {
    gauge!("krypt_transactions_listed").set(len as f64);
}
