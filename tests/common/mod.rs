//! Shared fakes and a mock HTTP backend for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;

use krypt::blockchain::{
    BlockchainError, BlockchainResult, ChainTransfer, ConfirmationStatus, RecordEntry,
    TransactionContract, WalletProvider, WalletTransfer,
};
use krypt::bridge::Notifier;

/// Wallet with scripted accounts that records every transfer it is asked to send.
#[derive(Default)]
pub struct FakeWallet {
    /// Returned by `accounts` (already authorized).
    pub authorized: Mutex<Vec<Address>>,
    /// Returned by `request_accounts`.
    pub grantable: Mutex<Vec<Address>>,
    pub reject_requests: bool,
    pub reject_transfers: bool,
    pub accounts_calls: AtomicUsize,
    pub request_calls: AtomicUsize,
    pub sent: Mutex<Vec<WalletTransfer>>,
    /// When set, the next `accounts` snapshots its answer and then waits for
    /// this to be notified before returning.
    pub accounts_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeWallet {
    pub fn authorized(accounts: Vec<Address>) -> Self {
        Self {
            authorized: Mutex::new(accounts),
            ..Self::default()
        }
    }

    pub fn grantable(accounts: Vec<Address>) -> Self {
        Self {
            grantable: Mutex::new(accounts),
            ..Self::default()
        }
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.accounts_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.authorized.lock().unwrap().clone();
        let gate = self.accounts_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn request_accounts(&self) -> BlockchainResult<Vec<Address>> {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_requests {
            return Err(BlockchainError::Wallet("User rejected the request.".into()));
        }
        let granted = self.grantable.lock().unwrap().clone();
        *self.authorized.lock().unwrap() = granted.clone();
        Ok(granted)
    }

    async fn send_transaction(&self, transfer: WalletTransfer) -> BlockchainResult<TxHash> {
        if self.reject_transfers {
            return Err(BlockchainError::Wallet("User denied transaction signature.".into()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(transfer);
        Ok(B256::with_last_byte(sent.len() as u8))
    }
}

/// In-memory record-keeping contract.
pub struct FakeContract {
    pub transfers: Mutex<Vec<ChainTransfer>>,
    /// Reported by `getTransactionCount`; `None` means "number of transfers".
    pub count_override: Mutex<Option<U256>>,
    pub fail_reads: bool,
    pub revert_records: bool,
    pub list_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
    /// When set, the next `get_all_transactions` snapshots its data and then
    /// waits for this to be notified before returning.
    pub list_gate: Mutex<Option<Arc<Notify>>>,
    /// When set, confirmation waits for this to be notified.
    pub confirmation_gate: Mutex<Option<Arc<Notify>>>,
    pub next_timestamp: Mutex<u64>,
}

impl Default for FakeContract {
    fn default() -> Self {
        Self {
            transfers: Mutex::new(Vec::new()),
            count_override: Mutex::new(None),
            fail_reads: false,
            revert_records: false,
            list_calls: AtomicUsize::new(0),
            count_calls: AtomicUsize::new(0),
            list_gate: Mutex::new(None),
            confirmation_gate: Mutex::new(None),
            next_timestamp: Mutex::new(1_700_000_000),
        }
    }
}

impl FakeContract {
    pub fn with_transfers(transfers: Vec<ChainTransfer>) -> Self {
        Self {
            transfers: Mutex::new(transfers),
            ..Self::default()
        }
    }
}

#[async_trait]
impl TransactionContract for FakeContract {
    async fn get_all_transactions(&self) -> BlockchainResult<Vec<ChainTransfer>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(BlockchainError::Contract("call reverted".into()));
        }
        let snapshot = self.transfers.lock().unwrap().clone();
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn get_transaction_count(&self) -> BlockchainResult<U256> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(BlockchainError::Contract("call reverted".into()));
        }
        let count_override = *self.count_override.lock().unwrap();
        Ok(count_override.unwrap_or_else(|| U256::from(self.transfers.lock().unwrap().len())))
    }

    async fn add_to_blockchain(
        &self,
        from: Address,
        entry: RecordEntry,
    ) -> BlockchainResult<TxHash> {
        let mut timestamp = self.next_timestamp.lock().unwrap();
        let mut transfers = self.transfers.lock().unwrap();
        transfers.push(ChainTransfer {
            sender: from,
            receiver: entry.receiver,
            amount: entry.amount,
            message: entry.message,
            timestamp: U256::from(*timestamp),
            keyword: entry.keyword,
        });
        *timestamp += 60;
        Ok(B256::repeat_byte(0xc0))
    }

    async fn wait_for_confirmation(&self, _tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let gate = self.confirmation_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.revert_records {
            return Ok(ConfirmationStatus::Failed("Transaction reverted".into()));
        }
        Ok(ConfirmationStatus::Confirmed { block_number: 42 })
    }
}

/// Notifier that keeps every notice.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }
}

pub fn transfer(from: u8, to: u8, amount: U256, timestamp: u64, keyword: &str) -> ChainTransfer {
    ChainTransfer {
        sender: Address::repeat_byte(from),
        receiver: Address::repeat_byte(to),
        amount,
        message: format!("from {from}"),
        timestamp: U256::from(timestamp),
        keyword: keyword.to_string(),
    }
}

/// Start a mock HTTP backend on an ephemeral port.
///
/// Each request's request line (e.g. `GET /v1/gifs/search?... HTTP/1.1`) is
/// recorded, and `respond` decides the status code and body.
pub async fn start_recording_backend<F>(respond: F) -> (SocketAddr, Arc<Mutex<Vec<String>>>)
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let recorded = requests.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let recorded = recorded.clone();
            let respond = respond.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]).to_string();
                let request_line = head.lines().next().unwrap_or_default().to_string();
                recorded.lock().unwrap().push(request_line.clone());

                let (status, body) = respond(&request_line);
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, requests)
}
