//! Configuration parsing for the trade retrieval system.
//!
//! Everything is read from a single JSON config file. The top-level structure
//! holds logging metadata, the exchange connection block, and the retrieval
//! engine tunables.
//!
//! # Example config
//!
//! ```json
//! {
//!   "app": { "module_name": "pt-runner", "log_path": "/tmp/log" },
//!   "okx": { "api_key": "...", "secret_key": "...", "passphrase": "..." },
//!   "retrieval": { "mode": "chain", "portfolio_symbols": ["BTC/USDT"] }
//! }
//! ```

use anyhow::Context;
use serde::Deserialize;

use crate::error::PtError;
use crate::types::InstrumentType;

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Module metadata (name, log path).
    pub app: Option<ModuleMeta>,

    /// Exchange connection settings.
    pub okx: OkxConfig,

    /// Retrieval engine settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl AppConfig {
    /// Returns the module name, defaulting to `pt-runner`.
    pub fn module_name(&self) -> String {
        self.app
            .as_ref()
            .and_then(|m| m.module_name.clone())
            .unwrap_or_else(|| "pt-runner".to_string())
    }

    /// Returns the log path.
    pub fn log_path(&self) -> Option<String> {
        self.app.as_ref().and_then(|m| m.log_path.clone())
    }

    /// Reject settings that would make the engine misbehave.
    pub fn validate(&self) -> Result<(), PtError> {
        self.okx.validate()?;
        self.retrieval.validate()
    }
}

/// Module metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleMeta {
    pub module_name: Option<String>,
    pub log_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Exchange connection
// ---------------------------------------------------------------------------

/// OKX REST API credentials and endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OkxConfig {
    pub api_key: String,
    pub secret_key: String,
    pub passphrase: String,

    /// REST base URL.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    /// Send `x-simulated-trading: 1` (demo account).
    #[serde(default)]
    pub simulated: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl OkxConfig {
    pub fn validate(&self) -> Result<(), PtError> {
        if self.api_key.is_empty() || self.secret_key.is_empty() || self.passphrase.is_empty() {
            return Err(PtError::Config("okx credentials are incomplete".into()));
        }
        if self.timeout_secs == 0 {
            return Err(PtError::Config("okx.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

impl Default for OkxConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            passphrase: String::new(),
            rest_url: default_rest_url(),
            simulated: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Retrieval engine
// ---------------------------------------------------------------------------

/// How the orchestrator combines its sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    /// Try fills, then orders history, then fallback; first non-empty wins.
    #[default]
    Chain,
    /// Query every source and merge the results.
    Aggregate,
}

/// Tunables for the fetchers and the orchestrator.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default)]
    pub mode: RetrievalMode,

    /// Instrument type queried by the native fetchers and assumed for records
    /// that do not state one.
    #[serde(default)]
    pub default_instrument_type: InstrumentType,

    /// Largest page the exchange serves per native request.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Records requested per continuation page.
    #[serde(default = "default_continuation_size")]
    pub continuation_size: usize,

    /// Upper bound on continuation requests per fetch.
    #[serde(default = "default_max_continuations")]
    pub max_continuations: usize,

    /// Upper bound on portfolio symbols probed by the fallback fetcher.
    #[serde(default = "default_fallback_symbol_cap")]
    pub fallback_symbol_cap: usize,

    /// Held symbols used for fallback probing when the caller supplies none.
    #[serde(default)]
    pub portfolio_symbols: Vec<String>,
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<(), PtError> {
        if self.page_size == 0 {
            return Err(PtError::Config("retrieval.page_size must be positive".into()));
        }
        if self.continuation_size == 0 {
            return Err(PtError::Config("retrieval.continuation_size must be positive".into()));
        }
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            mode: RetrievalMode::default(),
            default_instrument_type: InstrumentType::default(),
            page_size: default_page_size(),
            continuation_size: default_continuation_size(),
            max_continuations: default_max_continuations(),
            fallback_symbol_cap: default_fallback_symbol_cap(),
            portfolio_symbols: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults (used by serde)
// ---------------------------------------------------------------------------

fn default_rest_url() -> String {
    "https://www.okx.com".into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> usize {
    100
}

fn default_continuation_size() -> usize {
    50
}

fn default_max_continuations() -> usize {
    1
}

fn default_fallback_symbol_cap() -> usize {
    10
}

/// Load, parse and validate a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse_config(&content)?;
    Ok(config)
}

/// Parse and validate config JSON text.
pub fn parse_config(content: &str) -> anyhow::Result<AppConfig> {
    let config: AppConfig = serde_json::from_str(content).context("parsing config JSON")?;
    config.validate()?;
    Ok(config)
}
