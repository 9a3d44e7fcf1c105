//! Tertiary source: the generic "my trades" / "closed orders" calls.
//!
//! Symbol selection, in priority order:
//!
//! 1. an explicit symbol → query only that symbol;
//! 2. portfolio symbols → probe up to `fallback_symbol_cap` of them, stopping
//!    once `limit / 2` trades have been collected;
//! 3. neither → one symbol-less query (many exchanges return nothing here).
//!
//! Every probed symbol costs two calls, each routed through its own formatter.

use std::sync::Arc;

use async_trait::async_trait;
use pt_core::client::ExchangeClient;
use pt_core::config::RetrievalConfig;
use pt_core::{FetchRequest, Trade, TradeSource, to_canonical_format};
use tracing::{debug, warn};

use super::TradeFetcher;
use crate::format::{RawUnifiedOrder, RecordFormatter, UnifiedOrderFormatter, UnifiedTradeFormatter};
use crate::guard::{self, FETCHER_LIMIT_CAP, NormalizedParams};

/// How loudly per-symbol failures are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The caller asked for this symbol; failures are unexpected.
    Requested,
    /// One of many portfolio symbols; failures are routine.
    Portfolio,
    /// No symbol at all.
    Unscoped,
}

/// Fetches trades through the exchange-neutral calls.
pub struct FallbackFetcher {
    client: Arc<dyn ExchangeClient>,
    config: Arc<RetrievalConfig>,
    trade_formatter: UnifiedTradeFormatter,
    order_formatter: UnifiedOrderFormatter,
}

impl FallbackFetcher {
    pub fn new(client: Arc<dyn ExchangeClient>, config: Arc<RetrievalConfig>) -> Self {
        let default_type = config.default_instrument_type;
        Self {
            client,
            config,
            trade_formatter: UnifiedTradeFormatter::new(default_type),
            order_formatter: UnifiedOrderFormatter::new(default_type),
        }
    }

    /// Fetch trades for `symbol`, or for the held `portfolio_symbols` when no
    /// symbol is given.
    ///
    /// The portfolio list is only read, never modified.
    pub async fn fetch_trades(
        &self,
        symbol: Option<&str>,
        limit: Option<i64>,
        since: Option<i64>,
        portfolio_symbols: &[String],
    ) -> Vec<Trade> {
        let params = guard::normalize(symbol, limit, since, FETCHER_LIMIT_CAP);
        let mut trades = Vec::new();

        if let Some(symbol) = params.symbol.as_deref() {
            let symbol = to_canonical_format(Some(symbol)).unwrap_or_default();
            self.probe(Some(&symbol), &params, Probe::Requested, &mut trades).await;
        } else if !portfolio_symbols.is_empty() {
            let target = params.limit / 2;
            let candidates = portfolio_symbols
                .iter()
                .filter_map(|s| guard::normalize_symbol(Some(s.as_str())))
                .filter_map(|s| to_canonical_format(Some(s.as_str())))
                .take(self.config.fallback_symbol_cap);

            for symbol in candidates {
                self.probe(Some(&symbol), &params, Probe::Portfolio, &mut trades).await;
                if trades.len() >= target {
                    debug!("[fallback] {} trade(s) reached target {target} at {symbol}; stopping", trades.len());
                    break;
                }
            }
        } else {
            warn!("[fallback] no symbol or portfolio symbols given; querying without a symbol may return nothing");
            self.probe(None, &params, Probe::Unscoped, &mut trades).await;
        }

        debug!("[fallback] {} trade(s) collected", trades.len());
        trades
    }

    /// Query both generic calls for one symbol (or none) and append the
    /// formatted results.
    async fn probe(&self, symbol: Option<&str>, params: &NormalizedParams, probe: Probe, out: &mut Vec<Trade>) {
        let shown = symbol.unwrap_or("<all>");

        match self.client.fetch_my_trades(symbol, params.since, params.limit).await {
            Ok(rows) => out.extend(rows.iter().filter_map(|raw| self.trade_formatter.format(raw))),
            Err(e) => report_failure(probe, "my trades", shown, &e),
        }

        match self.client.fetch_closed_orders(symbol, params.since, params.limit).await {
            Ok(rows) => out.extend(
                rows.iter()
                    .filter(|raw| RawUnifiedOrder::new(raw).is_closed_and_filled())
                    .filter_map(|raw| self.order_formatter.format(raw)),
            ),
            Err(e) => report_failure(probe, "closed orders", shown, &e),
        }
    }
}

fn report_failure(probe: Probe, call: &str, symbol: &str, e: &anyhow::Error) {
    match probe {
        Probe::Portfolio => debug!("[fallback] {call} for {symbol} failed: {e:#}"),
        Probe::Requested | Probe::Unscoped => warn!("[fallback] {call} for {symbol} failed: {e:#}"),
    }
}

#[async_trait]
impl TradeFetcher for FallbackFetcher {
    fn source(&self) -> TradeSource {
        TradeSource::Fallback
    }

    async fn fetch(&self, request: &FetchRequest) -> Vec<Trade> {
        self.fetch_trades(
            request.symbol.as_deref(),
            request.limit,
            request.since,
            &request.portfolio_symbols,
        )
        .await
    }
}
