//! Command-line front-end.
//!
//! ```text
//! krypt [--config FILE] connect | restore | transactions | count
//! krypt send --to 0x.. --amount 0.01 --keyword party --message "hi"
//! krypt gif happy dog
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;
use clap::{Parser, Subcommand};
use serde::Serialize;

use krypt::blockchain::{AlloyTransactionContract, ChainClient, RpcWalletProvider};
use krypt::bridge::{FormField, Notifier, TransactionBridge};
use krypt::config::loader::load_config_str;
use krypt::config::{load_config, AppConfig};
use krypt::gif::{GiphyClient, KeywordGifResolver, Resolution};
use krypt::observability::logging;
use krypt::storage::LocalStore;

#[derive(Parser)]
#[command(name = "krypt")]
#[command(about = "Send wallet transfers with a message and a keyword GIF", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults plus environment overrides when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request wallet access and show the connected account
    Connect,
    /// Restore an already-authorized session without prompting
    Restore,
    /// List recorded transfers
    Transactions,
    /// Refresh and persist the on-chain transfer count
    Count,
    /// Send a transfer and record it with a message and keyword
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        keyword: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// Resolve a keyword to a GIF URL
    Gif {
        #[arg(required = true)]
        keyword: Vec<String>,
    },
}

/// Prints notices for the person at the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{message}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_config_str("")?,
    };
    logging::init(&config.observability);

    match cli.command {
        Commands::Connect => {
            let bridge = build_bridge(&config)?;
            bridge.connect_wallet().await?;
            print_json(&bridge.state().session)?;
        }
        Commands::Restore => {
            let bridge = build_bridge(&config)?;
            bridge.initialize().await;
            print_json(&bridge.state())?;
        }
        Commands::Transactions => {
            let bridge = build_bridge(&config)?;
            let transactions = bridge.list_transactions().await?;
            print_json(&transactions)?;
        }
        Commands::Count => {
            let bridge = build_bridge(&config)?;
            let count = bridge.refresh_transaction_count().await?;
            print_json(&serde_json::json!({ "transactionCount": count }))?;
        }
        Commands::Send {
            to,
            amount,
            keyword,
            message,
        } => {
            let bridge = build_bridge(&config)?;
            bridge.connect_wallet().await?;
            bridge.update_form_field(FormField::AddressTo, to);
            bridge.update_form_field(FormField::Amount, amount);
            bridge.update_form_field(FormField::Keyword, keyword);
            bridge.update_form_field(FormField::Message, message);

            let receipt = bridge.submit_transaction().await?;
            print_json(&receipt)?;
        }
        Commands::Gif { keyword } => {
            let search = GiphyClient::new(&config.gif)?;
            let resolver = KeywordGifResolver::new(Arc::new(search), &config.gif);
            let resolution = resolver.resolve(&keyword.join(" ")).await;
            print_json(&gif_report(&resolution, &resolver.current())?)?;
        }
    }

    Ok(())
}

fn build_bridge(config: &AppConfig) -> Result<TransactionBridge, Box<dyn std::error::Error>> {
    let store = match &config.storage.path {
        Some(path) => LocalStore::open(path)?,
        None => LocalStore::in_memory(),
    };
    let mut bridge =
        TransactionBridge::new(Arc::new(store)).with_notifier(Arc::new(ConsoleNotifier));

    if config.wallet.enabled {
        let client = ChainClient::new(config.wallet.clone())?;
        let address: Address = config.contract.address.parse()?;
        bridge = bridge
            .with_wallet(Arc::new(RpcWalletProvider::new(client.clone())))
            .with_contract(Arc::new(AlloyTransactionContract::new(client, address)));
    }

    Ok(bridge)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// CLI output for a keyword lookup. An empty keyword is an error rather than
/// a silently unchanged URL.
fn gif_report(resolution: &Resolution, url: &str) -> Result<serde_json::Value, &'static str> {
    if *resolution == Resolution::Skipped {
        return Err("empty keyword, nothing to look up");
    }
    Ok(serde_json::json!({
        "url": url,
        "outcome": resolution.outcome(),
    }))
}
