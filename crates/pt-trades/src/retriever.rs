//! Orchestrator: runs the source fetchers and merges their output.
//!
//! In [`RetrievalMode::Chain`] the fetchers are tried in priority order and
//! the first source that yields anything wins. In [`RetrievalMode::Aggregate`]
//! every source is queried and the union is deduplicated per execution.

use std::sync::Arc;

use pt_core::client::ExchangeClient;
use pt_core::config::{RetrievalConfig, RetrievalMode};
use pt_core::dedup::{DedupKey, TradeDedup};
use pt_core::error::PtError;
use pt_core::{FetchRequest, Trade};
use tracing::{debug, info, warn};

use crate::fetcher::{FallbackFetcher, FillsFetcher, OrdersHistoryFetcher, TradeFetcher};
use crate::guard::{self, RETRIEVER_LIMIT_CAP};

/// Entry point of the retrieval engine.
pub struct TradeRetriever {
    fetchers: Vec<Box<dyn TradeFetcher>>,
    client_ready: bool,
    config: Arc<RetrievalConfig>,
}

impl TradeRetriever {
    /// Build the standard fills → orders → fallback chain around `client`.
    ///
    /// With no client every call warns and returns an empty list.
    pub fn new(client: Option<Arc<dyn ExchangeClient>>, config: RetrievalConfig) -> Self {
        let config = Arc::new(config);
        let Some(client) = client else {
            return Self {
                fetchers: Vec::new(),
                client_ready: false,
                config,
            };
        };

        let fetchers: Vec<Box<dyn TradeFetcher>> = vec![
            Box::new(FillsFetcher::new(client.clone(), config.clone())),
            Box::new(OrdersHistoryFetcher::new(client.clone(), config.clone())),
            Box::new(FallbackFetcher::new(client, config.clone())),
        ];
        Self {
            fetchers,
            client_ready: true,
            config,
        }
    }

    /// Use a custom fetcher list, tried in the given order.
    pub fn with_fetchers(fetchers: Vec<Box<dyn TradeFetcher>>, config: RetrievalConfig) -> Self {
        Self {
            fetchers,
            client_ready: true,
            config: Arc::new(config),
        }
    }

    /// Configured merge strategy.
    pub fn mode(&self) -> RetrievalMode {
        self.config.mode
    }

    /// Retrieve up to `limit` (capped at 200) recent trades.
    ///
    /// `portfolio_symbols` is only used by the fallback source when no symbol
    /// is given; an empty slice falls back to the configured list. Never
    /// fails: every source problem degrades to fewer trades.
    pub async fn get_trades(
        &self,
        symbol: Option<&str>,
        limit: Option<i64>,
        since: Option<i64>,
        portfolio_symbols: &[String],
    ) -> Vec<Trade> {
        if !self.client_ready {
            warn!("[retriever] {}; returning no trades", PtError::NotInitialized);
            return Vec::new();
        }

        let params = guard::normalize(symbol, limit, since, RETRIEVER_LIMIT_CAP);
        let portfolio = if portfolio_symbols.is_empty() {
            self.config.portfolio_symbols.as_slice()
        } else {
            portfolio_symbols
        };
        let request = FetchRequest {
            symbol: params.symbol.clone(),
            limit: Some(params.limit as i64),
            since: params.since,
            portfolio_symbols: portfolio.to_vec(),
        };

        let trades = match self.config.mode {
            RetrievalMode::Chain => self.run_chain(&request, params.limit).await,
            RetrievalMode::Aggregate => self.run_aggregate(&request, params.limit).await,
        };
        info!(
            "[retriever] {} trade(s) for {:?} (limit={}, mode={:?})",
            trades.len(),
            params.symbol,
            params.limit,
            self.config.mode
        );
        trades
    }

    /// Same as [`get_trades`](Self::get_trades) for a prepared request.
    pub async fn get_trades_for(&self, request: &FetchRequest) -> Vec<Trade> {
        self.get_trades(
            request.symbol.as_deref(),
            request.limit,
            request.since,
            &request.portfolio_symbols,
        )
        .await
    }

    async fn run_chain(&self, request: &FetchRequest, limit: usize) -> Vec<Trade> {
        for fetcher in &self.fetchers {
            let source = fetcher.source();
            let trades = fetcher.fetch(request).await;
            if trades.is_empty() {
                debug!("[retriever] {source} returned nothing; trying next source");
                continue;
            }

            let mut trades = TradeDedup::new(DedupKey::WithSource).dedupe(trades);
            trades.truncate(limit);
            debug!("[retriever] using {} trade(s) from {source}", trades.len());
            return trades;
        }

        debug!("[retriever] all sources empty");
        Vec::new()
    }

    async fn run_aggregate(&self, request: &FetchRequest, limit: usize) -> Vec<Trade> {
        let mut dedup = TradeDedup::new(DedupKey::Execution);
        let mut merged = Vec::new();

        for fetcher in &self.fetchers {
            let batch = fetcher.fetch(request).await;
            let fetched = batch.len();
            let fresh = dedup.dedupe(batch);
            debug!("[retriever] {}: {fetched} fetched, {} new", fetcher.source(), fresh.len());
            merged.extend(fresh);
        }

        // Stable sort keeps source priority among equal timestamps.
        merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        merged.truncate(limit);
        merged
    }
}
