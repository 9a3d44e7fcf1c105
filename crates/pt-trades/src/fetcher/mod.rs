//! Source fetchers.
//!
//! Each fetcher owns one data source, its formatter, and its pagination loop,
//! and exposes the same [`TradeFetcher`] interface so the orchestrator can
//! chain them in priority order:
//!
//! ```text
//! FillsFetcher  (native fills, ts cursor)
//!   └─ empty → OrdersHistoryFetcher  (native filled orders, cTime cursor)
//!                └─ empty → FallbackFetcher  (generic calls, per symbol)
//! ```
//!
//! Fetchers never return errors. Request failures are logged and whatever
//! was already collected is returned.

pub mod fallback;
pub mod fills;
pub mod orders;

pub use fallback::FallbackFetcher;
pub use fills::FillsFetcher;
pub use orders::OrdersHistoryFetcher;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use pt_core::client::{ExchangeClient, NativeQuery};
use pt_core::config::RetrievalConfig;
use pt_core::dedup::{DedupKey, TradeDedup};
use pt_core::{FetchRequest, Trade, TradeSource};
use serde_json::Value;
use tracing::{debug, warn};

/// Continuation is only considered for limits above this value.
pub const CONTINUATION_MIN_LIMIT: usize = 50;

/// Common interface of all source fetchers.
#[async_trait]
pub trait TradeFetcher: Send + Sync {
    /// Provenance tag of the records this fetcher produces.
    fn source(&self) -> TradeSource;

    /// Fetch, format and paginate. Runs the input guard on `request` first.
    async fn fetch(&self, request: &FetchRequest) -> Vec<Trade>;
}

#[async_trait]
impl<T: TradeFetcher + ?Sized> TradeFetcher for Arc<T> {
    fn source(&self) -> TradeSource {
        (**self).source()
    }

    async fn fetch(&self, request: &FetchRequest) -> Vec<Trade> {
        (**self).fetch(request).await
    }
}

// ---------------------------------------------------------------------------
// Native cursor pagination
// ---------------------------------------------------------------------------

/// Which native endpoint a paginated fetch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NativeEndpoint {
    Fills,
    OrdersHistory,
}

impl NativeEndpoint {
    async fn request(self, client: &dyn ExchangeClient, query: &NativeQuery) -> Result<Vec<Value>> {
        match self {
            Self::Fills => client.fetch_fills(query).await,
            Self::OrdersHistory => client.fetch_orders_history(query).await,
        }
    }
}

/// Per-source hooks for [`paginate_native`].
pub(crate) struct PageHandler<'a> {
    /// Log prefix.
    pub label: &'static str,
    /// Cursor value of a raw record (used on the last record of a page).
    pub cursor: fn(&Value) -> Option<i64>,
    /// Records failing this check are skipped before formatting.
    pub accept: fn(&Value) -> bool,
    /// Source formatter.
    pub format: &'a (dyn Fn(&Value) -> Option<Trade> + Sync),
}

impl PageHandler<'_> {
    fn collect(&self, page: &[Value], seen: &mut TradeDedup, out: &mut Vec<Trade>) {
        let before = out.len();
        out.extend(
            page.iter()
                .filter(|raw| (self.accept)(raw))
                .filter_map(|raw| (self.format)(raw))
                .filter(|trade| seen.check_and_insert(trade)),
        );
        debug!(
            "[{}] page of {} raw record(s) → {} new trade(s)",
            self.label,
            page.len(),
            out.len() - before
        );
    }
}

/// Fetch up to `limit` trades from a native endpoint, following the
/// timestamp cursor when a page comes back full.
///
/// The first page asks for `min(limit, page_size)` records. A continuation is
/// issued only while the previous page was full, `limit` exceeds
/// [`CONTINUATION_MIN_LIMIT`], fewer than `limit` trades survived
/// formatting, and fewer than `max_continuations` continuations were made.
/// Each continuation asks for `min(continuation_size, limit - collected)`
/// records at or before the last record's cursor; records repeated across
/// that boundary are kept once.
pub(crate) async fn paginate_native(
    client: &dyn ExchangeClient,
    endpoint: NativeEndpoint,
    config: &RetrievalConfig,
    mut query: NativeQuery,
    limit: usize,
    handler: &PageHandler<'_>,
) -> Vec<Trade> {
    let label = handler.label;
    query.limit = limit.min(config.page_size).max(1);
    query.after = None;

    let mut page = match endpoint.request(client, &query).await {
        Ok(page) => page,
        Err(e) => {
            warn!("[{label}] request failed: {e:#}");
            return Vec::new();
        }
    };

    let mut trades = Vec::with_capacity(limit);
    let mut seen = TradeDedup::new(DedupKey::WithSource);
    let mut continuations = 0;

    loop {
        let full = page.len() >= query.limit;
        let cursor = page.last().and_then(handler.cursor);
        handler.collect(&page, &mut seen, &mut trades);

        if !full
            || limit <= CONTINUATION_MIN_LIMIT
            || trades.len() >= limit
            || continuations >= config.max_continuations
        {
            break;
        }
        let Some(after) = cursor else {
            debug!("[{label}] last record has no cursor; stopping");
            break;
        };

        query.limit = config.continuation_size.min(limit - trades.len()).max(1);
        query.after = Some(after);
        continuations += 1;
        debug!("[{label}] continuation {continuations}: {} more up to {after}", query.limit);

        match endpoint.request(client, &query).await {
            Ok(next) if next.is_empty() => break,
            Ok(next) => page = next,
            Err(e) => {
                debug!("[{label}] continuation failed, keeping {} trade(s): {e:#}", trades.len());
                break;
            }
        }
    }

    trades.truncate(limit);
    trades
}
