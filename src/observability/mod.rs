//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! bridge / gif / blockchain produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges via the `metrics` facade)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (account, tx hash, keyword)
//! - Metrics are no-ops until the embedding application installs a recorder

pub mod logging;
pub mod metrics;
