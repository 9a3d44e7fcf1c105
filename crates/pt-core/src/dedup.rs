//! Trade deduplication.
//!
//! Pages from one source can overlap (continuation cursors are inclusive on
//! some endpoints) and the same execution can be surfaced by more than one
//! source. [`TradeDedup`] keeps the *first* occurrence of every composite
//! identity key and drops the rest, preserving input order.
//!
//! Keys are hashed with xxHash64 and only the hashes are retained.

use ahash::AHashSet;

use crate::types::Trade;

/// Which fields make up the identity of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupKey {
    /// `source|id|order_id|symbol|timestamp|price|quantity`.
    ///
    /// Collapses repeats within one source (overlapping pages, repeated
    /// fetches).
    #[default]
    WithSource,
    /// The same key without `source`, so one execution reported by two
    /// sources collapses to the first-inserted record.
    Execution,
}

/// Build the composite identity key for a trade.
pub fn composite_key(trade: &Trade, kind: DedupKey) -> String {
    let order_id = trade.order_id.as_deref().unwrap_or("");
    match kind {
        DedupKey::WithSource => format!(
            "{}|{}|{}|{}|{}|{}|{}",
            trade.source, trade.id, order_id, trade.symbol, trade.timestamp, trade.price, trade.quantity
        ),
        DedupKey::Execution => format!(
            "{}|{}|{}|{}|{}|{}",
            trade.id, order_id, trade.symbol, trade.timestamp, trade.price, trade.quantity
        ),
    }
}

/// Order-preserving trade deduplicator.
///
/// # Thread safety
///
/// Not thread-safe. Each retrieval call owns its own instance.
pub struct TradeDedup {
    kind: DedupKey,
    seen: AHashSet<u64>,
}

impl TradeDedup {
    pub fn new(kind: DedupKey) -> Self {
        Self {
            kind,
            seen: AHashSet::new(),
        }
    }

    /// Returns `true` if the trade has not been seen yet and records it.
    #[inline]
    pub fn check_and_insert(&mut self, trade: &Trade) -> bool {
        let key = composite_key(trade, self.kind);
        self.seen.insert(xxhash_rust::xxh64::xxh64(key.as_bytes(), 0))
    }

    /// Drop every trade whose key was already seen, keeping first occurrences
    /// in their original order.
    pub fn dedupe(&mut self, trades: Vec<Trade>) -> Vec<Trade> {
        trades
            .into_iter()
            .filter(|t| self.check_and_insert(t))
            .collect()
    }

    /// Number of distinct keys recorded.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Clear all state.
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}

impl Default for TradeDedup {
    fn default() -> Self {
        Self::new(DedupKey::default())
    }
}

/// One-shot convenience wrapper around [`TradeDedup::dedupe`].
pub fn dedupe(trades: Vec<Trade>, kind: DedupKey) -> Vec<Trade> {
    TradeDedup::new(kind).dedupe(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InstrumentType, Side, TradeSource, TradeType};

    fn trade(id: &str, source: TradeSource, fee: f64) -> Trade {
        Trade {
            id: id.into(),
            order_id: Some("o-1".into()),
            client_order_id: None,
            symbol: "BTC/USDT".into(),
            instrument_type: InstrumentType::Spot,
            side: Side::Buy,
            quantity: 0.5,
            price: 30_000.0,
            total_value: 15_000.0,
            timestamp: 1_700_000_000_000,
            datetime: "2023-11-14T22:13:20.000Z".into(),
            fee,
            fee_sign: -1,
            fee_currency: "USDT".into(),
            trade_type: TradeType::Spot,
            source,
        }
    }

    #[test]
    fn key_layout() {
        let t = trade("t-1", TradeSource::Fills, 0.1);
        assert_eq!(
            composite_key(&t, DedupKey::WithSource),
            "fills|t-1|o-1|BTC/USDT|1700000000000|30000|0.5"
        );
        assert_eq!(
            composite_key(&t, DedupKey::Execution),
            "t-1|o-1|BTC/USDT|1700000000000|30000|0.5"
        );
    }

    #[test]
    fn same_fill_fetched_twice_collapses() {
        let first = vec![trade("t-1", TradeSource::Fills, 0.1), trade("t-2", TradeSource::Fills, 0.1)];
        let second = vec![trade("t-1", TradeSource::Fills, 0.1)];
        let merged = dedupe(first.into_iter().chain(second).collect(), DedupKey::WithSource);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "t-1");
        assert_eq!(merged[1].id, "t-2");
    }

    #[test]
    fn dedupe_is_idempotent() {
        let input = vec![
            trade("a", TradeSource::Fills, 0.1),
            trade("a", TradeSource::Fills, 0.1),
            trade("b", TradeSource::Orders, 0.1),
        ];
        let once = dedupe(input, DedupKey::WithSource);
        let twice = dedupe(once.clone(), DedupKey::WithSource);
        assert_eq!(once, twice);
    }

    #[test]
    fn earliest_inserted_wins() {
        // Fee is not part of the key; the first record's fee must survive.
        let input = vec![trade("a", TradeSource::Fills, 0.1), trade("a", TradeSource::Fills, 0.9)];
        let out = dedupe(input, DedupKey::WithSource);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].fee, 0.1);
    }

    #[test]
    fn source_separates_keys_unless_execution_kind() {
        let input = vec![trade("a", TradeSource::Fills, 0.1), trade("a", TradeSource::Fallback, 0.1)];
        assert_eq!(dedupe(input.clone(), DedupKey::WithSource).len(), 2);

        let cross = dedupe(input, DedupKey::Execution);
        assert_eq!(cross.len(), 1);
        assert_eq!(cross[0].source, TradeSource::Fills);
    }

    #[test]
    fn stateful_across_batches() {
        let mut d = TradeDedup::default();
        assert_eq!(d.dedupe(vec![trade("a", TradeSource::Fills, 0.1)]).len(), 1);
        assert!(d.dedupe(vec![trade("a", TradeSource::Fills, 0.1)]).is_empty());
        assert_eq!(d.len(), 1);
        d.clear();
        assert!(d.is_empty());
    }
}
