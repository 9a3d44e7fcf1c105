//! Native order-history records (`/api/v5/trade/orders-history`).
//!
//! ```json
//! {"instType":"SPOT","instId":"ETH-USDT","ordId":"42","clOrdId":"b1",
//!  "side":"sell","sz":"1","px":"2000","accFillSz":"1","avgPx":"2001.5",
//!  "fillSz":"0.4","fillPx":"2002","state":"filled","fee":"-2.0015",
//!  "feeCcy":"USDT","cTime":"1700000000000","uTime":"1700000001000"}
//! ```
//!
//! Order records describe the whole order, so accumulated size and average
//! price win over the last leaf fill, and creation time wins over update time.

use pt_core::error::PtResult;
use pt_core::time_util::iso_from_ms;
use pt_core::{InstrumentType, Trade, TradeSource, to_canonical_format};
use serde_json::Value;

use super::{RecordFormatter, require_object, require_side, require_symbol, resolve_fee};
use super::{resolve_instrument_type, resolve_total_value};
use crate::raw::{f64_or_zero, first_nonzero_f64, first_timestamp, non_negative, opt_str, parse_str_i64};

/// Terminal state of a fully executed order.
pub const FILLED_STATE: &str = "filled";

/// Typed view over one raw native order.
#[derive(Debug, Clone, Copy)]
pub struct RawOrder<'a>(&'a Value);

impl<'a> RawOrder<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self(raw)
    }

    /// `true` for filled orders with a non-zero accumulated fill.
    pub fn is_filled(&self) -> bool {
        self.0.get("state").and_then(Value::as_str) == Some(FILLED_STATE)
            && f64_or_zero(self.0, "accFillSz") > 0.0
    }

    pub fn quantity(&self) -> f64 {
        non_negative(first_nonzero_f64(self.0, &["accFillSz", "fillSz"]))
    }

    pub fn price(&self) -> f64 {
        non_negative(first_nonzero_f64(self.0, &["avgPx", "fillPx", "px"]))
    }

    pub fn timestamp(&self) -> i64 {
        first_timestamp(self.0, &["cTime", "uTime"])
    }

    /// Pagination cursor: the order's creation time.
    pub fn cursor(&self) -> Option<i64> {
        parse_str_i64(self.0.get("cTime")).filter(|ts| *ts > 0)
    }

    fn inst_id(&self) -> Option<&'a str> {
        self.0.get("instId").and_then(Value::as_str)
    }

    fn inst_type(&self) -> Option<&'a str> {
        self.0.get("instType").and_then(Value::as_str)
    }
}

/// Formatter for native filled orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFormatter {
    pub default_instrument_type: InstrumentType,
}

impl OrderFormatter {
    pub fn new(default_instrument_type: InstrumentType) -> Self {
        Self { default_instrument_type }
    }
}

impl RecordFormatter for OrderFormatter {
    const LABEL: &'static str = "orders";

    fn try_format(&self, raw: &Value) -> PtResult<Trade> {
        require_object(raw)?;
        let order = RawOrder::new(raw);

        let symbol = require_symbol(to_canonical_format(order.inst_id()))?;
        let side = require_side(raw, "side")?;
        let instrument_type = resolve_instrument_type(order.inst_type(), self.default_instrument_type);

        let quantity = order.quantity();
        let price = order.price();
        let fee = resolve_fee(raw, "fee", "feeCcy");
        let timestamp = order.timestamp();
        let order_id = opt_str(raw, "ordId");

        Ok(Trade {
            id: order_id.clone().unwrap_or_default(),
            order_id,
            client_order_id: opt_str(raw, "clOrdId"),
            symbol,
            instrument_type,
            side,
            quantity,
            price,
            total_value: resolve_total_value(0.0, quantity, price),
            timestamp,
            datetime: iso_from_ms(timestamp),
            fee: fee.fee,
            fee_sign: fee.sign,
            fee_currency: fee.currency,
            trade_type: instrument_type.trade_type(),
            source: TradeSource::Orders,
        })
    }
}
