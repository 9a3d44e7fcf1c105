//! Exchange client seam consumed by the retrieval engine.
//!
//! The engine never signs requests or talks HTTP itself. It drives a
//! pre-authenticated [`ExchangeClient`] that returns raw JSON records exactly
//! as the exchange (or the exchange-neutral layer) shaped them; all coercion
//! happens later in the record formatters.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::types::InstrumentType;

/// Parameters for the two native, cursor-paginated endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeQuery {
    /// Exchange-format instrument ID (`BTC-USDT`), or `None` for all.
    pub inst_id: Option<String>,
    /// Instrument type to query.
    pub inst_type: InstrumentType,
    /// Page size requested.
    pub limit: usize,
    /// Lower time bound (ms since epoch).
    pub since: Option<i64>,
    /// Pagination cursor: only records at or before this timestamp
    /// (ms since epoch). Records on the boundary may be returned again.
    pub after: Option<i64>,
}

/// Trait implemented by exchange connectivity layers.
///
/// All calls take `&self`; the retrieval engine issues them one at a time and
/// never concurrently.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Native per-fill endpoint.
    async fn fetch_fills(&self, query: &NativeQuery) -> Result<Vec<Value>>;

    /// Native filled-orders history endpoint.
    async fn fetch_orders_history(&self, query: &NativeQuery) -> Result<Vec<Value>>;

    /// Exchange-neutral "my trades" call. `symbol` is canonical (`BTC/USDT`).
    async fn fetch_my_trades(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Value>>;

    /// Exchange-neutral "closed orders" call. `symbol` is canonical.
    async fn fetch_closed_orders(
        &self,
        symbol: Option<&str>,
        since: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Value>>;
}
