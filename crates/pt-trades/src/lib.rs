//! # pt-trades
//!
//! Trade retrieval engine. Pulls recent executions from an
//! [`ExchangeClient`](pt_core::client::ExchangeClient) through a chain of
//! sources and normalizes them into canonical [`Trade`](pt_core::Trade)s:
//!
//! - **Input guard** (`guard`): symbol/limit/since sanitation
//! - **Raw coercion** (`raw`): string-or-number field parsing
//! - **Formatters** (`format`): one per raw record shape
//! - **Fetchers** (`fetcher`): fills → orders history → generic fallback
//! - **Orchestrator** (`retriever`): chain or aggregate, dedupe, truncate

pub mod fetcher;
pub mod format;
pub mod guard;
pub mod raw;
pub mod retriever;

#[cfg(test)]
mod testing;

pub use fetcher::{FallbackFetcher, FillsFetcher, OrdersHistoryFetcher, TradeFetcher};
pub use retriever::TradeRetriever;
