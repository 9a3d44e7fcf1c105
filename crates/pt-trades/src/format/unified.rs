//! Exchange-neutral records returned by the generic fallback calls.
//!
//! Trades:
//!
//! ```json
//! {"id":"123","order":"456","symbol":"BTC/USDT","side":"buy","amount":0.01,
//!  "price":30000,"cost":300.5,"fee":{"cost":0.3,"currency":"USDT"},
//!  "timestamp":1700000000000,"info":{"instType":"SPOT"}}
//! ```
//!
//! Closed orders add `status`, `filled`, `average` and `lastTradeTimestamp`.
//! The fee may be a mapping, `null`, or missing entirely.

use pt_core::error::PtResult;
use pt_core::time_util::iso_from_ms;
use pt_core::{InstrumentType, Trade, TradeSource, to_canonical_format};
use serde_json::Value;

use super::{RecordFormatter, require_object, require_side, require_symbol, resolve_fee};
use super::{resolve_instrument_type, resolve_total_value};
use crate::raw::{as_mapping, f64_or_zero, first_nonzero_f64, first_timestamp, non_negative, opt_str};

/// Status of a closed (fully executed) order.
pub const CLOSED_STATUS: &str = "closed";

fn symbol_of(raw: &Value) -> Option<String> {
    to_canonical_format(raw.get("symbol").and_then(Value::as_str))
}

/// Instrument type reported inside the raw exchange payload (`info`).
fn info_inst_type(raw: &Value) -> Option<&str> {
    as_mapping(raw.get("info"))?.get("instType")?.as_str()
}

fn client_order_id(raw: &Value) -> Option<String> {
    opt_str(raw, "clientOrderId").or_else(|| raw.get("info").and_then(|info| opt_str(info, "clOrdId")))
}

// ---------------------------------------------------------------------------
// Trades
// ---------------------------------------------------------------------------

/// Typed view over one exchange-neutral trade.
#[derive(Debug, Clone, Copy)]
pub struct RawUnifiedTrade<'a>(&'a Value);

impl<'a> RawUnifiedTrade<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self(raw)
    }

    pub fn timestamp(&self) -> i64 {
        first_timestamp(self.0, &["timestamp"])
    }
}

/// Formatter for exchange-neutral trades.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnifiedTradeFormatter {
    pub default_instrument_type: InstrumentType,
}

impl UnifiedTradeFormatter {
    pub fn new(default_instrument_type: InstrumentType) -> Self {
        Self { default_instrument_type }
    }
}

impl RecordFormatter for UnifiedTradeFormatter {
    const LABEL: &'static str = "fallback-trades";

    fn try_format(&self, raw: &Value) -> PtResult<Trade> {
        require_object(raw)?;
        let trade = RawUnifiedTrade::new(raw);

        let symbol = require_symbol(symbol_of(raw))?;
        let side = require_side(raw, "side")?;
        let instrument_type = resolve_instrument_type(info_inst_type(raw), self.default_instrument_type);

        let quantity = non_negative(f64_or_zero(raw, "amount"));
        let price = non_negative(f64_or_zero(raw, "price"));
        let notional = non_negative(f64_or_zero(raw, "cost"));
        let fee = resolve_fee(raw, "fee", "feeCurrency");
        let timestamp = trade.timestamp();

        Ok(Trade {
            id: opt_str(raw, "id").unwrap_or_default(),
            order_id: opt_str(raw, "order"),
            client_order_id: client_order_id(raw),
            symbol,
            instrument_type,
            side,
            quantity,
            price,
            total_value: resolve_total_value(notional, quantity, price),
            timestamp,
            datetime: iso_from_ms(timestamp),
            fee: fee.fee,
            fee_sign: fee.sign,
            fee_currency: fee.currency,
            trade_type: instrument_type.trade_type(),
            source: TradeSource::Fallback,
        })
    }
}

// ---------------------------------------------------------------------------
// Closed orders
// ---------------------------------------------------------------------------

/// Typed view over one exchange-neutral order.
#[derive(Debug, Clone, Copy)]
pub struct RawUnifiedOrder<'a>(&'a Value);

impl<'a> RawUnifiedOrder<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self(raw)
    }

    /// `true` for closed orders with a non-zero filled amount.
    pub fn is_closed_and_filled(&self) -> bool {
        self.0.get("status").and_then(Value::as_str) == Some(CLOSED_STATUS)
            && f64_or_zero(self.0, "filled") > 0.0
    }

    pub fn quantity(&self) -> f64 {
        non_negative(first_nonzero_f64(self.0, &["filled", "amount"]))
    }

    pub fn price(&self) -> f64 {
        non_negative(first_nonzero_f64(self.0, &["average", "price"]))
    }

    /// Last execution time, falling back to the order timestamp.
    pub fn timestamp(&self) -> i64 {
        first_timestamp(self.0, &["lastTradeTimestamp", "timestamp"])
    }
}

/// Formatter for exchange-neutral closed orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnifiedOrderFormatter {
    pub default_instrument_type: InstrumentType,
}

impl UnifiedOrderFormatter {
    pub fn new(default_instrument_type: InstrumentType) -> Self {
        Self { default_instrument_type }
    }
}

impl RecordFormatter for UnifiedOrderFormatter {
    const LABEL: &'static str = "fallback-orders";

    fn try_format(&self, raw: &Value) -> PtResult<Trade> {
        require_object(raw)?;
        let order = RawUnifiedOrder::new(raw);

        let symbol = require_symbol(symbol_of(raw))?;
        let side = require_side(raw, "side")?;
        let instrument_type = resolve_instrument_type(info_inst_type(raw), self.default_instrument_type);

        let quantity = order.quantity();
        let price = order.price();
        let notional = non_negative(f64_or_zero(raw, "cost"));
        let fee = resolve_fee(raw, "fee", "feeCurrency");
        let timestamp = order.timestamp();
        let order_id = opt_str(raw, "id");

        Ok(Trade {
            id: order_id.clone().unwrap_or_default(),
            order_id,
            client_order_id: client_order_id(raw),
            symbol,
            instrument_type,
            side,
            quantity,
            price,
            total_value: resolve_total_value(notional, quantity, price),
            timestamp,
            datetime: iso_from_ms(timestamp),
            fee: fee.fee,
            fee_sign: fee.sign,
            fee_currency: fee.currency,
            trade_type: instrument_type.trade_type(),
            source: TradeSource::Fallback,
        })
    }
}
