//! Record formatters: raw source records → canonical [`Trade`].
//!
//! There is one formatter per raw shape:
//!
//! | Formatter                 | Raw shape                          | Source     |
//! |---------------------------|------------------------------------|------------|
//! | [`FillFormatter`]         | native fill                        | `fills`    |
//! | [`OrderFormatter`]        | native filled order                | `orders`   |
//! | [`UnifiedTradeFormatter`] | exchange-neutral trade             | `fallback` |
//! | [`UnifiedOrderFormatter`] | exchange-neutral closed order      | `fallback` |
//!
//! Formatters never fail loudly. Numeric fields go through the `raw` coercion
//! helpers, and structural problems (not an object, no symbol, unknown side)
//! make [`RecordFormatter::format`] log at debug and return `None` so the
//! caller drops just that record.

pub mod fills;
pub mod orders;
pub mod unified;

pub use fills::{FillFormatter, RawFill};
pub use orders::{OrderFormatter, RawOrder};
pub use unified::{RawUnifiedOrder, RawUnifiedTrade, UnifiedOrderFormatter, UnifiedTradeFormatter};

use pt_core::error::{PtError, PtResult};
use pt_core::{InstrumentType, Side, Trade};
use serde_json::Value;
use tracing::debug;

use crate::raw::{as_mapping, f64_or_zero, parse_str_f64, sign, str_or_empty};

/// Converts one raw record shape into a [`Trade`].
pub trait RecordFormatter {
    /// Log prefix naming the source shape.
    const LABEL: &'static str;

    /// Strict conversion; errors describe why the record is unusable.
    fn try_format(&self, raw: &Value) -> PtResult<Trade>;

    /// Lenient conversion used by the fetchers.
    fn format(&self, raw: &Value) -> Option<Trade> {
        match self.try_format(raw) {
            Ok(trade) => Some(trade),
            Err(e) => {
                debug!("[{}] dropping record: {e} (raw={raw})", Self::LABEL);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Shared field resolution
// ---------------------------------------------------------------------------

/// Resolved fee: absolute amount, original direction, currency.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeParts {
    pub fee: f64,
    pub sign: i8,
    pub currency: String,
}

impl FeeParts {
    pub fn from_cost(cost: f64, currency: String) -> Self {
        Self {
            fee: cost.abs(),
            sign: sign(cost),
            currency,
        }
    }
}

/// Resolve the fee of a record.
///
/// When `raw[fee_key]` is a mapping it is read as `{"cost", "currency"}`.
/// Otherwise `raw[fee_key]` is read as a scalar amount with the currency in
/// `raw[currency_key]`. Anything else (null, list, junk) resolves to zero.
pub fn resolve_fee(raw: &Value, fee_key: &str, currency_key: &str) -> FeeParts {
    match as_mapping(raw.get(fee_key)) {
        Some(map) => {
            let cost = parse_str_f64(map.get("cost")).unwrap_or(0.0);
            let currency = map.get("currency").and_then(Value::as_str).unwrap_or("");
            FeeParts::from_cost(cost, currency.to_string())
        }
        None => FeeParts::from_cost(f64_or_zero(raw, fee_key), str_or_empty(raw, currency_key)),
    }
}

/// Exchange-reported notional wins over the locally derived product.
#[inline]
pub fn resolve_total_value(notional: f64, quantity: f64, price: f64) -> f64 {
    if notional > 0.0 {
        notional
    } else {
        quantity * price
    }
}

/// Explicit instrument-type label if recognized, else the configured default.
#[inline]
pub fn resolve_instrument_type(explicit: Option<&str>, default: InstrumentType) -> InstrumentType {
    explicit.and_then(InstrumentType::parse).unwrap_or(default)
}

pub(crate) fn require_object(raw: &Value) -> PtResult<()> {
    if raw.is_object() {
        Ok(())
    } else {
        Err(PtError::Parse(format!("expected an object, got {}", json_kind(raw))))
    }
}

pub(crate) fn require_side(raw: &Value, key: &str) -> PtResult<Side> {
    let label = raw.get(key).and_then(Value::as_str).unwrap_or("");
    Side::parse(label).ok_or_else(|| PtError::Parse(format!("unknown side {label:?}")))
}

pub(crate) fn require_symbol(symbol: Option<String>) -> PtResult<String> {
    symbol
        .filter(|s| !s.is_empty())
        .ok_or_else(|| PtError::Parse("missing symbol".into()))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fee_sign_preservation() {
        for (cost, abs, s) in [(-0.025, 0.025, -1), (0.0, 0.0, 0), (0.5, 0.5, 1)] {
            let raw = json!({"fee": {"cost": cost, "currency": "USDT"}});
            let parts = resolve_fee(&raw, "fee", "feeCcy");
            assert_eq!(parts.fee, abs);
            assert_eq!(parts.sign, s);
            assert_eq!(parts.currency, "USDT");
        }
    }

    #[test]
    fn scalar_fee_with_currency_field() {
        let raw = json!({"fee": "-0.0001", "feeCcy": "BTC"});
        assert_eq!(
            resolve_fee(&raw, "fee", "feeCcy"),
            FeeParts { fee: 0.0001, sign: -1, currency: "BTC".into() }
        );
    }

    #[test]
    fn fee_that_is_not_a_mapping() {
        for raw in [json!({"fee": null}), json!({"fee": [1, 2]}), json!({}), json!({"fee": {"cost": null}})] {
            let parts = resolve_fee(&raw, "fee", "feeCcy");
            assert_eq!(parts.fee, 0.0);
            assert_eq!(parts.sign, 0);
            assert_eq!(parts.currency, "");
        }
    }

    #[test]
    fn total_value_precedence() {
        assert_eq!(resolve_total_value(101.0, 2.0, 50.0), 101.0);
        assert_eq!(resolve_total_value(0.0, 2.0, 50.0), 100.0);
    }

    #[test]
    fn instrument_type_default() {
        assert_eq!(resolve_instrument_type(Some("SWAP"), InstrumentType::Spot), InstrumentType::Swap);
        assert_eq!(resolve_instrument_type(Some("???"), InstrumentType::Margin), InstrumentType::Margin);
        assert_eq!(resolve_instrument_type(None, InstrumentType::Spot), InstrumentType::Spot);
    }
}
