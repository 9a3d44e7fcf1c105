//! Canonical trade record and the caller-side fetch request.
//!
//! Every data source is normalized into [`Trade`] by a record formatter; the
//! retrieval engine never mutates a trade after construction.

use serde::{Deserialize, Serialize};

use super::enums::{InstrumentType, Side, TradeSource, TradeType};

// ---------------------------------------------------------------------------
// Trade (formatter → caller)
// ---------------------------------------------------------------------------

/// One executed fill or filled order in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Source-local identifier (empty when the source has none).
    pub id: String,
    /// Exchange order ID.
    pub order_id: Option<String>,
    /// Client-assigned order ID.
    pub client_order_id: Option<String>,
    /// Canonical `BASE/QUOTE` symbol.
    pub symbol: String,
    pub instrument_type: InstrumentType,
    pub side: Side,
    /// Executed quantity (never negative).
    pub quantity: f64,
    /// Execution price (never negative).
    pub price: f64,
    /// Exchange-reported notional when available, else `quantity × price`.
    pub total_value: f64,
    /// Execution time (ms since epoch, 0 if unknown).
    pub timestamp: i64,
    /// ISO-8601 UTC rendering of `timestamp`, empty when unknown.
    pub datetime: String,
    /// Absolute fee amount.
    pub fee: f64,
    /// Direction of the fee as reported by the source (-1, 0 or 1).
    pub fee_sign: i8,
    pub fee_currency: String,
    pub trade_type: TradeType,
    pub source: TradeSource,
}

// ---------------------------------------------------------------------------
// Fetch request (caller → engine)
// ---------------------------------------------------------------------------

/// Raw retrieval parameters as supplied by a caller.
///
/// Nothing here is validated; every fetcher runs the input guard on it before
/// issuing a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Requested symbol in any casing/whitespace, canonical delimiter.
    pub symbol: Option<String>,
    /// Requested record count.
    pub limit: Option<i64>,
    /// Lower time bound (ms since epoch).
    pub since: Option<i64>,
    /// Held symbols to probe when no symbol is given (fallback fetcher only).
    #[serde(default)]
    pub portfolio_symbols: Vec<String>,
}

impl FetchRequest {
    pub fn new(symbol: Option<&str>, limit: Option<i64>, since: Option<i64>) -> Self {
        Self {
            symbol: symbol.map(str::to_string),
            limit,
            since,
            portfolio_symbols: Vec::new(),
        }
    }

    pub fn with_portfolio_symbols(mut self, symbols: &[String]) -> Self {
        self.portfolio_symbols = symbols.to_vec();
        self
    }
}
