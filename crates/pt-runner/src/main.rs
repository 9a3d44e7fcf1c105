//! # pt-runner
//!
//! Command-line entry point for the trade retrieval engine.
//!
//! Loads a JSON configuration file, connects an OKX client, retrieves recent
//! trades and prints each one as a JSON line on stdout. Logs go to stderr
//! (and optionally a daily-rotated file).
//!
//! # Usage
//!
//! ```bash
//! pt-runner config.json --symbol BTC/USDT --limit 100
//! pt-runner config.json --portfolio BTC/USDT,ETH/USDT --aggregate
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pt_core::FetchRequest;
use pt_core::client::ExchangeClient;
use pt_core::config::RetrievalMode;
use pt_core::logging::{LogFormat, init_logging_with_format};
use pt_okx::OkxClient;
use pt_trades::TradeRetriever;
use pt_trades::guard::limit_from_value;
use serde_json::Value;
use tracing::{error, info};

/// Portfolio Trade Retrieval Runner.
#[derive(Parser)]
#[command(name = "pt-runner", about = "Portfolio Trade Retrieval Runner")]
struct Cli {
    /// Configuration file path (JSON).
    config: PathBuf,

    /// Trading pair, e.g. BTC/USDT. Omit to query all symbols.
    #[arg(short, long)]
    symbol: Option<String>,

    /// Maximum number of trades (1..=200). Values that do not read as a
    /// number fall back to the default of 50.
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    limit: Option<String>,

    /// Only trades at or after this epoch-millisecond timestamp.
    #[arg(long)]
    since: Option<i64>,

    /// Held symbols probed by the fallback source, comma separated.
    /// Overrides `retrieval.portfolio_symbols`.
    #[arg(long, value_delimiter = ',')]
    portfolio: Vec<String>,

    /// Query every source and merge instead of stopping at the first hit.
    #[arg(long)]
    aggregate: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output. Overrides `app.log_path`.
    #[arg(long)]
    log_dir: Option<String>,

    /// Write the log file as JSON lines.
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn fetch_request(&self) -> FetchRequest {
        let limit = self.limit.as_deref().and_then(|raw| limit_from_value(&Value::from(raw)));
        FetchRequest::new(self.symbol.as_deref(), limit, self.since).with_portfolio_symbols(&self.portfolio)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let mut config = pt_core::config::load_config(&cli.config)?;
    if cli.aggregate {
        config.retrieval.mode = RetrievalMode::Aggregate;
    }

    // 2. Initialize logging
    let log_dir = cli.log_dir.clone().or_else(|| config.log_path());
    let log_format = if cli.log_json { LogFormat::Json } else { LogFormat::Text };
    init_logging_with_format(&cli.log_level, log_dir.as_deref(), &config.module_name(), log_format);
    info!("pt-runner starting, config={}, log_level={}", cli.config.display(), cli.log_level);

    if let Err(e) = config.validate() {
        error!("invalid configuration: {e}");
        return Err(e.into());
    }

    // 3. Connect
    let client = OkxClient::new(config.okx.clone(), config.retrieval.default_instrument_type)?;
    info!(
        "[okx] client ready (rest_url={}, simulated={}, inst_type={})",
        config.okx.rest_url,
        config.okx.simulated,
        client.inst_type()
    );
    let client: Arc<dyn ExchangeClient> = Arc::new(client);
    let retriever = TradeRetriever::new(Some(client), config.retrieval);

    // 4. Retrieve
    let request = cli.fetch_request();
    info!("retrieving (mode={:?}, symbol={:?}, limit={:?})", retriever.mode(), request.symbol, request.limit);
    let trades = retriever.get_trades_for(&request).await;

    // 5. Emit
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for trade in &trades {
        let line = serde_json::to_string(trade).context("failed to serialize trade")?;
        writeln!(out, "{line}").context("failed to write to stdout")?;
    }
    out.flush()?;

    info!("{} trade(s) written", trades.len());
    Ok(())
}
