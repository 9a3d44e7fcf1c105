//! Symbol conversion between canonical and exchange formats.
//!
//! The canonical pair form used by every record is `BASE/QUOTE`; the exchange
//! identifies instruments as `BASE-QUOTE`. Only the delimiter changes here.
//! Trimming and emptiness checks belong to the input guard.

/// Convert a canonical symbol (`BTC/USDT`) to the exchange instrument ID
/// (`BTC-USDT`).
///
/// `None` stays `None`; an empty string stays empty.
#[inline]
pub fn to_exchange_format(symbol: Option<&str>) -> Option<String> {
    symbol.map(|s| s.replace('/', "-"))
}

/// Convert an exchange instrument ID (`BTC-USDT`) to canonical form
/// (`BTC/USDT`).
///
/// `None` stays `None`; an empty string stays empty.
#[inline]
pub fn to_canonical_format(symbol: Option<&str>) -> Option<String> {
    symbol.map(|s| s.replace('-', "/"))
}
