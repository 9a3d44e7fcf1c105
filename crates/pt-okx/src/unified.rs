//! Native OKX records → exchange-neutral records.
//!
//! The generic "my trades" and "closed orders" calls return the neutral shape
//! consumed by the fallback formatters: numbers as JSON numbers, canonical
//! symbols, a `{cost, currency}` fee mapping and the untouched native record
//! under `info`.
//!
//! OKX reports fees as signed balance changes (negative = charged). The neutral
//! shape uses the opposite convention, so the cost is negated here.

use pt_core::to_canonical_format;
use serde_json::{Map, Value, json};

fn text<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn num(raw: &Value, key: &str) -> Option<f64> {
    match raw.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => fast_float2::parse::<f64, _>(s.trim()).ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn millis(raw: &Value, key: &str) -> Option<i64> {
    match raw.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .filter(|ts| *ts > 0)
}

fn fee(raw: &Value) -> Value {
    match num(raw, "fee") {
        Some(cost) => json!({"cost": -cost, "currency": text(raw, "feeCcy")}),
        None => Value::Null,
    }
}

fn notional(amount: Option<f64>, price: Option<f64>) -> Value {
    match (amount, price) {
        (Some(a), Some(p)) if a > 0.0 && p > 0.0 => json!(a * p),
        _ => Value::Null,
    }
}

/// Neutral order status for an OKX order `state`.
pub fn order_status(state: &str) -> &str {
    match state {
        "filled" => "closed",
        "canceled" | "mmp_canceled" => "canceled",
        "live" | "partially_filled" => "open",
        other => other,
    }
}

/// Map one native fill (`fills` / `fills-history`).
pub fn fill_to_unified(raw: &Value) -> Value {
    let amount = num(raw, "fillSz");
    let price = num(raw, "fillPx");
    let mut out = Map::new();
    out.insert("id".into(), json!(text(raw, "tradeId")));
    out.insert("order".into(), json!(text(raw, "ordId")));
    out.insert("clientOrderId".into(), json!(text(raw, "clOrdId")));
    out.insert("symbol".into(), json!(to_canonical_format(text(raw, "instId"))));
    out.insert("side".into(), json!(text(raw, "side")));
    out.insert("amount".into(), json!(amount));
    out.insert("price".into(), json!(price));
    out.insert("cost".into(), notional(amount, price));
    out.insert("fee".into(), fee(raw));
    out.insert("timestamp".into(), json!(millis(raw, "fillTime").or_else(|| millis(raw, "ts"))));
    out.insert("info".into(), raw.clone());
    Value::Object(out)
}

/// Map one native order (`orders-history` / `orders-history-archive`).
pub fn order_to_unified(raw: &Value) -> Value {
    let filled = num(raw, "accFillSz");
    let average = num(raw, "avgPx");
    let mut out = Map::new();
    out.insert("id".into(), json!(text(raw, "ordId")));
    out.insert("clientOrderId".into(), json!(text(raw, "clOrdId")));
    out.insert("symbol".into(), json!(to_canonical_format(text(raw, "instId"))));
    out.insert("side".into(), json!(text(raw, "side")));
    out.insert("status".into(), json!(text(raw, "state").map(order_status)));
    out.insert("amount".into(), json!(num(raw, "sz")));
    out.insert("filled".into(), json!(filled));
    out.insert("price".into(), json!(num(raw, "px")));
    out.insert("average".into(), json!(average));
    out.insert("cost".into(), notional(filled, average));
    out.insert("fee".into(), fee(raw));
    out.insert("timestamp".into(), json!(millis(raw, "cTime")));
    out.insert(
        "lastTradeTimestamp".into(),
        json!(millis(raw, "fillTime").or_else(|| millis(raw, "uTime"))),
    );
    out.insert("info".into(), raw.clone());
    Value::Object(out)
}
