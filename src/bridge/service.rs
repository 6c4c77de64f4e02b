//! Bridges wallet and contract calls to UI-facing state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tokio::sync::watch;

use crate::blockchain::types::parse_amount;
use crate::blockchain::{
    BlockchainError, ConfirmationStatus, RecordEntry, TransactionContract, WalletProvider,
    WalletTransfer,
};
use crate::bridge::error::{BridgeError, BridgeResult};
use crate::bridge::notice::{Notifier, TracingNotifier, INSTALL_WALLET_NOTICE};
use crate::bridge::state::{
    BridgeState, FormField, SubmissionPhase, SubmissionReceipt, TransactionRecord, TransferForm,
};
use crate::observability::metrics;
use crate::storage::{KeyValueStore, TRANSACTION_COUNT_KEY};

/// Owns the wallet session, the transfer form, and the transaction list, and
/// publishes every change through a `watch` channel.
///
/// Wallet and contract are optional: without them the bridge behaves like a
/// front-end on a browser with no wallet extension installed.
pub struct TransactionBridge {
    wallet: Option<Arc<dyn WalletProvider>>,
    contract: Option<Arc<dyn TransactionContract>>,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<BridgeState>,
    /// Bumped per account request; older responses are discarded.
    session_epoch: AtomicU64,
    /// Bumped per transaction-list fetch; older responses are discarded.
    list_epoch: AtomicU64,
}

impl TransactionBridge {
    /// Create a bridge with no wallet attached, seeding the transaction count from `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let transaction_count = match store.get(TRANSACTION_COUNT_KEY) {
            Ok(value) => value.and_then(|v| v.parse::<u64>().ok()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored transaction count");
                None
            }
        };

        let (state, _) = watch::channel(BridgeState {
            transaction_count,
            ..BridgeState::default()
        });

        Self {
            wallet: None,
            contract: None,
            store,
            notifier: Arc::new(TracingNotifier),
            state,
            session_epoch: AtomicU64::new(0),
            list_epoch: AtomicU64::new(0),
        }
    }

    pub fn with_wallet(mut self, wallet: Arc<dyn WalletProvider>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_contract(mut self, contract: Arc<dyn TransactionContract>) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<BridgeState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> BridgeState {
        self.state.borrow().clone()
    }

    /// Run once at start-up: restore an authorized session and refresh the
    /// transaction count. Both are best effort.
    pub async fn initialize(&self) {
        let (session, count) = tokio::join!(
            self.restore_session_if_authorized(),
            self.refresh_transaction_count()
        );
        if let Err(e) = session {
            tracing::warn!(error = %e, "Session restore failed");
        }
        if let Err(e) = count {
            tracing::warn!(error = %e, "Transaction count refresh failed");
        }
    }

    /// Ask the wallet for account access and make the first account current.
    pub async fn connect_wallet(&self) -> BridgeResult<Address> {
        let wallet = self.wallet(true)?;
        let epoch = self.session_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let accounts = wallet.request_accounts().await.map_err(|e| {
            tracing::error!(error = %e, "Wallet connection failed");
            BridgeError::Wallet(e)
        })?;
        let account = accounts.first().copied().ok_or_else(|| {
            tracing::error!("Wallet granted access to no accounts");
            BridgeError::Wallet(BlockchainError::Wallet("no accounts returned".to_string()))
        })?;

        self.apply_session(epoch, account);
        tracing::info!(account = %account, "Wallet connected");
        Ok(account)
    }

    /// Pick up an account the user authorized earlier, without prompting, and
    /// load the transaction list if one is found.
    ///
    /// Returns `None` when no account is authorized, or when a newer account
    /// request finished first and its session was kept.
    pub async fn restore_session_if_authorized(&self) -> BridgeResult<Option<Address>> {
        let account = self.authorized_account().await?;
        if account.is_some() {
            if let Err(e) = self.list_transactions().await {
                tracing::warn!(error = %e, "Transaction list refresh after session restore failed");
            }
        }
        Ok(account)
    }

    /// Query the contract for the transfer count and persist it as a hint for
    /// later runs. The stored value never decreases.
    pub async fn refresh_transaction_count(&self) -> BridgeResult<u64> {
        let contract = self.contract(false)?;
        let count = contract.get_transaction_count().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch transaction count");
            BridgeError::Contract(e)
        })?;
        self.persist_count(count.saturating_to::<u64>())
    }

    /// Fetch every recorded transfer and replace the in-memory list.
    pub async fn list_transactions(&self) -> BridgeResult<Vec<TransactionRecord>> {
        let contract = self.contract(true)?;
        let epoch = self.list_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let raw = contract.get_all_transactions().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch transactions");
            BridgeError::Contract(e)
        })?;
        let records = raw
            .into_iter()
            .map(TransactionRecord::from_chain)
            .collect::<Result<Vec<_>, _>>()
            .map_err(BridgeError::Contract)?;

        let applied = self.state.send_if_modified(|state| {
            if self.list_epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            state.transactions = records.clone();
            true
        });

        if applied {
            metrics::record_transactions_listed(records.len());
            tracing::debug!(count = records.len(), "Transaction list refreshed");
        } else {
            tracing::debug!(epoch, "Discarding superseded transaction list");
        }
        Ok(records)
    }

    /// Set one form field, leaving the others untouched.
    pub fn update_form_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        self.state.send_modify(|state| state.form.set(field, value));
    }

    /// Set one form field by its name (`addressTo`, `amount`, `keyword`, `message`).
    pub fn update_form_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> BridgeResult<()> {
        let field = name
            .parse::<FormField>()
            .map_err(|e| BridgeError::InvalidForm(e.to_string()))?;
        self.update_form_field(field, value);
        Ok(())
    }

    /// Replace the whole form.
    pub fn set_form(&self, form: TransferForm) {
        self.state.send_modify(|state| state.form = form);
    }

    /// Send the value transfer through the wallet, record it in the contract,
    /// wait for the record's confirmation, then refresh all derived state.
    pub async fn submit_transaction(&self) -> BridgeResult<SubmissionReceipt> {
        let wallet = self.wallet(false)?;
        let contract = self.contract(false)?;

        let (from, form) = {
            let state = self.state.borrow();
            (state.session.current_account, state.form.clone())
        };
        let from = from.ok_or(BridgeError::NotConnected)?;
        let (to, amount) = validate_form(&form)?;

        self.set_phase(SubmissionPhase::AwaitingWalletConfirmation, false);

        let result = async {
            let transfer_hash = wallet
                .send_transaction(WalletTransfer::new(from, to, amount))
                .await
                .map_err(BridgeError::Wallet)?;
            tracing::info!(tx_hash = %transfer_hash, to = %to, "Value transfer sent");

            let entry = RecordEntry {
                receiver: to,
                amount,
                message: form.message.clone(),
                keyword: form.keyword.clone(),
            };
            let record_hash = contract
                .add_to_blockchain(from, entry)
                .await
                .map_err(BridgeError::Contract)?;

            self.set_phase(SubmissionPhase::AwaitingChainConfirmation, true);
            tracing::info!(tx_hash = %record_hash, "Waiting for record confirmation");

            let status = contract
                .wait_for_confirmation(record_hash)
                .await
                .map_err(BridgeError::Contract)?;
            let block_number = match status {
                ConfirmationStatus::Confirmed { block_number } => block_number,
                ConfirmationStatus::Failed(reason) => {
                    return Err(BridgeError::Contract(BlockchainError::Reverted(reason)));
                }
            };
            Ok::<_, BridgeError>((transfer_hash, record_hash, block_number))
        }
        .await;

        let (transfer_hash, record_hash, block_number) = match result {
            Ok(hashes) => hashes,
            Err(e) => {
                self.set_phase(SubmissionPhase::Idle, false);
                metrics::record_transfer("failed");
                tracing::error!(error = %e, "Transfer submission failed");
                return Err(e);
            }
        };

        self.set_phase(SubmissionPhase::Settled, false);
        metrics::record_transfer("settled");
        tracing::info!(tx_hash = %record_hash, block_number, "Transfer recorded");

        if let Err(e) = self.refresh_all().await {
            tracing::warn!(error = %e, "Refresh after submission failed");
        }

        Ok(SubmissionReceipt {
            transfer_hash,
            record_hash,
            block_number,
            transaction_count: self.state.borrow().transaction_count,
        })
    }

    /// Resynchronize everything derived from the chain: session, transaction
    /// list and transaction count. Reports the first failure.
    pub async fn refresh_all(&self) -> BridgeResult<()> {
        let (account, count) = tokio::join!(
            self.authorized_account(),
            self.refresh_transaction_count()
        );
        if account?.is_some() {
            self.list_transactions().await?;
        }
        count?;
        Ok(())
    }

    async fn authorized_account(&self) -> BridgeResult<Option<Address>> {
        let wallet = self.wallet(true)?;
        let epoch = self.session_epoch.fetch_add(1, Ordering::SeqCst) + 1;

        let accounts = wallet.accounts().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to query authorized accounts");
            BridgeError::Wallet(e)
        })?;

        match accounts.first().copied() {
            Some(account) if self.apply_session(epoch, account) => {
                tracing::info!(account = %account, "Restored wallet session");
                Ok(Some(account))
            }
            // A newer account request owns the session now.
            Some(_) => Ok(None),
            None => {
                tracing::info!("No authorized accounts found");
                Ok(None)
            }
        }
    }

    fn apply_session(&self, epoch: u64, account: Address) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if self.session_epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            state.session.current_account = Some(account);
            true
        });
        if !applied {
            tracing::debug!(epoch, account = %account, "Discarding superseded account response");
        }
        applied
    }

    fn persist_count(&self, count: u64) -> BridgeResult<u64> {
        let stored = self.state.borrow().transaction_count.unwrap_or(0);
        if count < stored {
            tracing::warn!(count, stored, "Chain reports fewer transactions than stored");
        }
        let count = count.max(stored);

        self.store
            .set(TRANSACTION_COUNT_KEY, &count.to_string())
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to persist transaction count");
                BridgeError::Storage(e)
            })?;
        self.state
            .send_modify(|state| state.transaction_count = Some(count));
        metrics::record_transaction_count(count);
        Ok(count)
    }

    fn set_phase(&self, phase: SubmissionPhase, loading: bool) {
        self.state.send_modify(|state| {
            state.phase = phase;
            state.loading = loading;
        });
    }

    fn wallet(&self, notify: bool) -> BridgeResult<&Arc<dyn WalletProvider>> {
        self.wallet.as_ref().ok_or_else(|| self.missing_provider(notify))
    }

    fn contract(&self, notify: bool) -> BridgeResult<&Arc<dyn TransactionContract>> {
        self.contract
            .as_ref()
            .ok_or_else(|| self.missing_provider(notify))
    }

    fn missing_provider(&self, notify: bool) -> BridgeError {
        if notify {
            self.notifier.notify(INSTALL_WALLET_NOTICE);
        } else {
            tracing::info!("No wallet provider present");
        }
        BridgeError::MissingProvider
    }
}

fn validate_form(form: &TransferForm) -> BridgeResult<(Address, U256)> {
    let to = form
        .address_to
        .trim()
        .parse::<Address>()
        .map_err(|e| BridgeError::InvalidForm(format!("recipient '{}': {}", form.address_to, e)))?;
    let amount = parse_amount(&form.amount).map_err(|e| BridgeError::InvalidForm(e.to_string()))?;
    Ok((to, amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::error::ErrorKind;
    use crate::storage::LocalStore;

    #[test]
    fn test_validate_form() {
        let form = TransferForm {
            address_to: "0x00000000000000000000000000000000000000aa".into(),
            amount: "0.5".into(),
            ..Default::default()
        };
        let (to, amount) = validate_form(&form).unwrap();
        assert_eq!(to, Address::with_last_byte(0xaa));
        assert_eq!(amount, U256::from(500_000_000_000_000_000u64));

        let bad = TransferForm {
            address_to: "nope".into(),
            ..form.clone()
        };
        assert_eq!(validate_form(&bad).unwrap_err().kind(), ErrorKind::InvalidForm);

        let bad = TransferForm {
            amount: "lots".into(),
            ..form
        };
        assert_eq!(validate_form(&bad).unwrap_err().kind(), ErrorKind::InvalidForm);
    }

    #[test]
    fn test_seeds_count_from_store() {
        let store = Arc::new(LocalStore::in_memory());
        store.set(TRANSACTION_COUNT_KEY, "7").unwrap();
        let bridge = TransactionBridge::new(store);
        assert_eq!(bridge.state().transaction_count, Some(7));
    }

    #[test]
    fn test_garbage_stored_count_is_ignored() {
        let store = Arc::new(LocalStore::in_memory());
        store.set(TRANSACTION_COUNT_KEY, "many").unwrap();
        let bridge = TransactionBridge::new(store);
        assert_eq!(bridge.state().transaction_count, None);
    }

    #[test]
    fn test_update_form_field_by_name() {
        let bridge = TransactionBridge::new(Arc::new(LocalStore::in_memory()));
        bridge.update_form_field_by_name("addressTo", "0xabc").unwrap();
        assert_eq!(bridge.state().form.address_to, "0xabc");

        let err = bridge.update_form_field_by_name("colour", "red").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidForm);
    }

    #[tokio::test]
    async fn test_submit_without_provider_is_silent() {
        let bridge = TransactionBridge::new(Arc::new(LocalStore::in_memory()));
        let err = bridge.submit_transaction().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingProvider);
        assert_eq!(bridge.state().phase, SubmissionPhase::Idle);
        assert!(!bridge.state().loading);
    }
}
