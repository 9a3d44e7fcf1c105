//! Native fill records (`/api/v5/trade/fills`).
//!
//! ```json
//! {"instType":"SPOT","instId":"BTC-USDT","tradeId":"123","ordId":"456",
//!  "clOrdId":"","side":"buy","fillSz":"0.01","fillPx":"30000",
//!  "fee":"-0.00001","feeCcy":"BTC","ts":"1700000000000","fillTime":"1700000000000"}
//! ```
//!
//! A negative `fee` is a charge and a positive one a rebate; the sign is kept
//! as reported.

use pt_core::error::PtResult;
use pt_core::time_util::iso_from_ms;
use pt_core::{InstrumentType, Trade, TradeSource, to_canonical_format};
use serde_json::Value;

use super::{RecordFormatter, require_object, require_side, require_symbol, resolve_fee};
use super::{resolve_instrument_type, resolve_total_value};
use crate::raw::{f64_or_zero, first_timestamp, non_negative, opt_str, parse_str_i64, str_or_empty};

/// Typed view over one raw native fill.
#[derive(Debug, Clone, Copy)]
pub struct RawFill<'a>(&'a Value);

impl<'a> RawFill<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self(raw)
    }

    /// Fill time, falling back to the record timestamp.
    pub fn timestamp(&self) -> i64 {
        first_timestamp(self.0, &["fillTime", "ts"])
    }

    /// Pagination cursor: the record's `ts`.
    pub fn cursor(&self) -> Option<i64> {
        parse_str_i64(self.0.get("ts")).filter(|ts| *ts > 0)
    }

    fn inst_id(&self) -> Option<&'a str> {
        self.0.get("instId").and_then(Value::as_str)
    }

    fn inst_type(&self) -> Option<&'a str> {
        self.0.get("instType").and_then(Value::as_str)
    }
}

/// Formatter for native fills.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillFormatter {
    pub default_instrument_type: InstrumentType,
}

impl FillFormatter {
    pub fn new(default_instrument_type: InstrumentType) -> Self {
        Self { default_instrument_type }
    }
}

impl RecordFormatter for FillFormatter {
    const LABEL: &'static str = "fills";

    fn try_format(&self, raw: &Value) -> PtResult<Trade> {
        require_object(raw)?;
        let fill = RawFill::new(raw);

        let symbol = require_symbol(to_canonical_format(fill.inst_id()))?;
        let side = require_side(raw, "side")?;
        let instrument_type = resolve_instrument_type(fill.inst_type(), self.default_instrument_type);

        let quantity = non_negative(f64_or_zero(raw, "fillSz"));
        let price = non_negative(f64_or_zero(raw, "fillPx"));
        let fee = resolve_fee(raw, "fee", "feeCcy");
        let timestamp = fill.timestamp();

        Ok(Trade {
            id: str_or_empty(raw, "tradeId"),
            order_id: opt_str(raw, "ordId"),
            client_order_id: opt_str(raw, "clOrdId"),
            symbol,
            instrument_type,
            side,
            quantity,
            price,
            // Fills carry no quote-denominated notional.
            total_value: resolve_total_value(0.0, quantity, price),
            timestamp,
            datetime: iso_from_ms(timestamp),
            fee: fee.fee,
            fee_sign: fee.sign,
            fee_currency: fee.currency,
            trade_type: instrument_type.trade_type(),
            source: TradeSource::Fills,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_core::{Side, TradeType};
    use serde_json::json;

    fn fill() -> Value {
        json!({
            "instType": "SPOT", "instId": "BTC-USDT", "tradeId": "123", "ordId": "456",
            "clOrdId": "", "billId": "789", "side": "buy", "fillSz": "0.01", "fillPx": "30000",
            "fee": "-0.00001", "feeCcy": "BTC", "ts": "1700000000500", "fillTime": "1700000000000"
        })
    }

    #[test]
    fn formats_native_fill() {
        let t = FillFormatter::default().format(&fill()).unwrap();
        assert_eq!(t.id, "123");
        assert_eq!(t.order_id.as_deref(), Some("456"));
        assert_eq!(t.client_order_id, None);
        assert_eq!(t.symbol, "BTC/USDT");
        assert_eq!(t.side, Side::Buy);
        assert_eq!(t.quantity, 0.01);
        assert_eq!(t.price, 30000.0);
        assert_eq!(t.total_value, 0.01 * 30000.0);
        assert_eq!(t.timestamp, 1_700_000_000_000);
        assert_eq!(t.datetime, "2023-11-14T22:13:20.000Z");
        assert_eq!(t.fee, 0.00001);
        assert_eq!(t.fee_sign, -1);
        assert_eq!(t.fee_currency, "BTC");
        assert_eq!(t.trade_type, TradeType::Spot);
        assert_eq!(t.source, TradeSource::Fills);
    }

    #[test]
    fn fill_time_preferred_then_ts() {
        let mut raw = fill();
        raw["fillTime"] = json!("");
        let t = FillFormatter::default().format(&raw).unwrap();
        assert_eq!(t.timestamp, 1_700_000_000_500);
        assert_eq!(RawFill::new(&raw).cursor(), Some(1_700_000_000_500));
    }

    #[test]
    fn missing_times_render_empty_datetime() {
        let mut raw = fill();
        raw["fillTime"] = json!(null);
        raw["ts"] = json!(null);
        let t = FillFormatter::default().format(&raw).unwrap();
        assert_eq!(t.timestamp, 0);
        assert_eq!(t.datetime, "");
        assert_eq!(RawFill::new(&raw).cursor(), None);
    }

    #[test]
    fn instrument_type_from_record_or_default() {
        let mut raw = fill();
        raw["instType"] = json!("SWAP");
        raw["instId"] = json!("BTC-USDT-SWAP");
        let t = FillFormatter::default().format(&raw).unwrap();
        assert_eq!(t.instrument_type, InstrumentType::Swap);
        assert_eq!(t.trade_type, TradeType::Derivatives);

        raw.as_object_mut().unwrap().remove("instType");
        let t = FillFormatter::new(InstrumentType::Margin).format(&raw).unwrap();
        assert_eq!(t.instrument_type, InstrumentType::Margin);
    }

    #[test]
    fn junk_numbers_become_zero() {
        let mut raw = fill();
        raw["fillSz"] = json!(null);
        raw["fillPx"] = json!("n/a");
        raw["fee"] = json!("");
        let t = FillFormatter::default().format(&raw).unwrap();
        assert_eq!((t.quantity, t.price, t.total_value, t.fee, t.fee_sign), (0.0, 0.0, 0.0, 0.0, 0));
    }

    #[test]
    fn malformed_records_are_dropped() {
        let f = FillFormatter::default();
        assert!(f.format(&json!("not a record")).is_none());
        assert!(f.format(&json!(null)).is_none());

        let mut no_side = fill();
        no_side["side"] = json!("hold");
        assert!(f.format(&no_side).is_none());

        let mut no_symbol = fill();
        no_symbol.as_object_mut().unwrap().remove("instId");
        assert!(f.format(&no_symbol).is_none());
    }
}
