//! User-facing notices.

/// Shown when an operation needs a wallet and none is present.
pub const INSTALL_WALLET_NOTICE: &str = "Please install MetaMask";

/// Sink for messages the user should see (as opposed to log lines).
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Routes notices to the log. Used when no front-end is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(notice = message, "User notice");
    }
}
