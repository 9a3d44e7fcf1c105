//! Input guard for caller-supplied retrieval parameters.
//!
//! Every public fetch entry point (each fetcher and the orchestrator) runs
//! [`normalize`] before touching the network, because fetchers are also called
//! directly and not only through the orchestrator.

use serde_json::Value;

use crate::raw::parse_str_i64;

/// Limit used when the caller gives none.
pub const DEFAULT_LIMIT: usize = 50;

/// Upper bound for a single source fetcher.
pub const FETCHER_LIMIT_CAP: usize = 100;

/// Upper bound for the orchestrator, which may merge several sources.
pub const RETRIEVER_LIMIT_CAP: usize = 200;

/// Sanitized `(symbol, limit, since)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedParams {
    /// Trimmed, non-empty symbol.
    pub symbol: Option<String>,
    /// Always in `1..=cap`.
    pub limit: usize,
    /// Positive epoch milliseconds, or `None` for no time filter.
    pub since: Option<i64>,
}

/// Sanitize retrieval parameters for a call site whose limit ceiling is `cap`.
///
/// - `symbol` is trimmed; blank becomes `None`.
/// - `limit` defaults to [`DEFAULT_LIMIT`] when absent, is raised to 1 when
///   zero or negative, and clamped to `cap`.
/// - `since` is kept only when positive.
pub fn normalize(
    symbol: Option<&str>,
    limit: Option<i64>,
    since: Option<i64>,
    cap: usize,
) -> NormalizedParams {
    NormalizedParams {
        symbol: normalize_symbol(symbol),
        limit: normalize_limit(limit, cap),
        since: since.filter(|ts| *ts > 0),
    }
}

pub fn normalize_symbol(symbol: Option<&str>) -> Option<String> {
    symbol
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn normalize_limit(limit: Option<i64>, cap: usize) -> usize {
    let cap = cap.max(1);
    match limit {
        None => DEFAULT_LIMIT.min(cap),
        Some(n) if n <= 0 => 1,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX).min(cap),
    }
}

/// Coerce a loosely-typed limit (JSON number or numeric string).
///
/// Anything that does not read as an integer is treated as absent.
pub fn limit_from_value(v: &Value) -> Option<i64> {
    parse_str_i64(Some(v))
}
