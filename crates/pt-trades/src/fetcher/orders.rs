//! Secondary source: the native filled-orders history endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use pt_core::client::{ExchangeClient, NativeQuery};
use pt_core::config::RetrievalConfig;
use pt_core::{FetchRequest, Trade, TradeSource, to_exchange_format};
use serde_json::Value;
use tracing::debug;

use super::{NativeEndpoint, PageHandler, TradeFetcher, paginate_native};
use crate::format::{OrderFormatter, RawOrder, RecordFormatter};
use crate::guard::{self, FETCHER_LIMIT_CAP};

/// Fetches filled orders, cursoring on order creation time.
///
/// Orders that are not in the `filled` state, or have nothing filled, are
/// skipped before formatting.
pub struct OrdersHistoryFetcher {
    client: Arc<dyn ExchangeClient>,
    config: Arc<RetrievalConfig>,
    formatter: OrderFormatter,
}

impl OrdersHistoryFetcher {
    pub fn new(client: Arc<dyn ExchangeClient>, config: Arc<RetrievalConfig>) -> Self {
        let formatter = OrderFormatter::new(config.default_instrument_type);
        Self {
            client,
            config,
            formatter,
        }
    }

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
            label: "orders",
            cursor: |raw| RawOrder::new(raw).cursor(),
            accept: |raw| RawOrder::new(raw).is_filled(),
            format: &format,
        };

        let trades = paginate_native(
            self.client.as_ref(),
            NativeEndpoint::OrdersHistory,
            &self.config,
            query,
            params.limit,
            &handler,
        )
        .await;
        debug!("[orders] {} trade(s) for {:?}", trades.len(), params.symbol);
        trades
    }
}

#[async_trait]
impl TradeFetcher for OrdersHistoryFetcher {
    fn source(&self) -> TradeSource {
        TradeSource::Orders
    }

    async fn fetch(&self, request: &FetchRequest) -> Vec<Trade> {
        self.fetch_trades(request.symbol.as_deref(), request.limit, request.since)
            .await
    }
}
