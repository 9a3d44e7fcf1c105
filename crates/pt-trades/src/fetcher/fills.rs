//! Primary source: the native per-fill endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use pt_core::client::{ExchangeClient, NativeQuery};
use pt_core::config::RetrievalConfig;
use pt_core::{FetchRequest, Trade, TradeSource, to_exchange_format};
use serde_json::Value;
use tracing::debug;

use super::{NativeEndpoint, PageHandler, TradeFetcher, paginate_native};
use crate::format::{FillFormatter, RawFill, RecordFormatter};
use crate::guard::{self, FETCHER_LIMIT_CAP};

/// Fetches executions from the native fills endpoint, cursoring on `ts`.
pub struct FillsFetcher {
    client: Arc<dyn ExchangeClient>,
    config: Arc<RetrievalConfig>,
    formatter: FillFormatter,
}

impl FillsFetcher {
    pub fn new(client: Arc<dyn ExchangeClient>, config: Arc<RetrievalConfig>) -> Self {
        let formatter = FillFormatter::new(config.default_instrument_type);
        Self {
            client,
            config,
            formatter,
        }
    }

    /// Fetch up to `limit` (capped at 100) fills, newest first.
    pub async fn fetch_trades(
        &self,
        symbol: Option<&str>,
        limit: Option<i64>,
        since: Option<i64>,
    ) -> Vec<Trade> {
        let params = guard::normalize(symbol, limit, since, FETCHER_LIMIT_CAP);
        let query = NativeQuery {
            inst_id: to_exchange_format(params.symbol.as_deref()),
            inst_type: self.config.default_instrument_type,
            limit: params.limit,
            since: params.since,
            after: None,
        };

        let format = |raw: &Value| self.formatter.format(raw);
        let handler = PageHandler {
            label: "fills",
            cursor: |raw| RawFill::new(raw).cursor(),
            accept: |_| true,
            format: &format,
        };

        let trades = paginate_native(
            self.client.as_ref(),
            NativeEndpoint::Fills,
            &self.config,
            query,
            params.limit,
            &handler,
        )
        .await;
        debug!("[fills] {} trade(s) for {:?}", trades.len(), params.symbol);
        trades
    }
}

#[async_trait]
impl TradeFetcher for FillsFetcher {
    fn source(&self) -> TradeSource {
        TradeSource::Fills
    }

    async fn fetch(&self, request: &FetchRequest) -> Vec<Trade> {
        self.fetch_trades(request.symbol.as_deref(), request.limit, request.since)
            .await
    }
}
