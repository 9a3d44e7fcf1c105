//! Test doubles and raw-record fixtures.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use pt_core::client::{ExchangeClient, NativeQuery};
use pt_core::{FetchRequest, Trade, TradeSource};
use serde_json::{Value, json};

use crate::fetcher::TradeFetcher;

// ---------------------------------------------------------------------------
// Mock exchange client
// ---------------------------------------------------------------------------

/// One recorded client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fills(NativeQuery),
    Orders(NativeQuery),
    MyTrades { symbol: Option<String>, since: Option<i64>, limit: usize },
    ClosedOrders { symbol: Option<String>, since: Option<i64>, limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Fills,
    Orders,
    MyTrades,
    ClosedOrders,
}

impl Call {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::Fills(_) => CallKind::Fills,
            Self::Orders(_) => CallKind::Orders,
            Self::MyTrades { .. } => CallKind::MyTrades,
            Self::ClosedOrders { .. } => CallKind::ClosedOrders,
        }
    }
}

type Reply = std::result::Result<Vec<Value>, String>;

/// Scripted [`ExchangeClient`].
///
/// Native endpoints pop replies from a queue (empty page once exhausted).
/// Generic calls answer per symbol (`None` key for symbol-less calls) and
/// return an empty list for unknown symbols.
#[derive(Default)]
pub struct MockClient {
    fills: Mutex<VecDeque<Reply>>,
    orders: Mutex<VecDeque<Reply>>,
    my_trades: Mutex<HashMap<Option<String>, Reply>>,
    closed_orders: Mutex<HashMap<Option<String>, Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl MockClient {
    pub fn push_fills(&self, page: Vec<Value>) {
        self.fills.lock().unwrap().push_back(Ok(page));
    }

    pub fn push_fills_err(&self, msg: &str) {
        self.fills.lock().unwrap().push_back(Err(msg.to_string()));
    }

    pub fn push_orders(&self, page: Vec<Value>) {
        self.orders.lock().unwrap().push_back(Ok(page));
    }

    pub fn push_orders_err(&self, msg: &str) {
        self.orders.lock().unwrap().push_back(Err(msg.to_string()));
    }

    pub fn set_my_trades(&self, symbol: Option<&str>, rows: Vec<Value>) {
        self.my_trades.lock().unwrap().insert(symbol.map(str::to_string), Ok(rows));
    }

    pub fn set_my_trades_err(&self, symbol: Option<&str>, msg: &str) {
        self.my_trades.lock().unwrap().insert(symbol.map(str::to_string), Err(msg.to_string()));
    }

    pub fn set_closed_orders(&self, symbol: Option<&str>, rows: Vec<Value>) {
        self.closed_orders.lock().unwrap().insert(symbol.map(str::to_string), Ok(rows));
    }

    pub fn set_closed_orders_err(&self, symbol: Option<&str>, msg: &str) {
        self.closed_orders.lock().unwrap().insert(symbol.map(str::to_string), Err(msg.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.kind() == kind).count()
    }

    /// Symbols passed to "my trades", in call order.
    pub fn symbols_queried(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Call::MyTrades { symbol, .. } => Some(symbol.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn pop(queue: &Mutex<VecDeque<Reply>>) -> Result<Vec<Value>> {
        match queue.lock().unwrap().pop_front() {
            Some(reply) => reply.map_err(|e| anyhow!(e)),
            None => Ok(Vec::new()),
        }
    }

    fn lookup(map: &Mutex<HashMap<Option<String>, Reply>>, symbol: Option<&str>) -> Result<Vec<Value>> {
        match map.lock().unwrap().get(&symbol.map(str::to_string)) {
            Some(reply) => reply.clone().map_err(|e| anyhow!(e)),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl ExchangeClient for MockClient {
    async fn fetch_fills(&self, query: &NativeQuery) -> Result<Vec<Value>> {
        self.record(Call::Fills(query.clone()));
        Self::pop(&self.fills)
    }

    async fn fetch_orders_history(&self, query: &NativeQuery) -> Result<Vec<Value>> {
        self.record(Call::Orders(query.clone()));
        Self::pop(&self.orders)
    }

    async fn fetch_my_trades(&self, symbol: Option<&str>, since: Option<i64>, limit: usize) -> Result<Vec<Value>> {
        self.record(Call::MyTrades { symbol: symbol.map(str::to_string), since, limit });
        Self::lookup(&self.my_trades, symbol)
    }

    async fn fetch_closed_orders(&self, symbol: Option<&str>, since: Option<i64>, limit: usize) -> Result<Vec<Value>> {
        self.record(Call::ClosedOrders { symbol: symbol.map(str::to_string), since, limit });
        Self::lookup(&self.closed_orders, symbol)
    }
}

// ---------------------------------------------------------------------------
// Stub fetcher
// ---------------------------------------------------------------------------

/// [`TradeFetcher`] returning canned trades and recording every request.
pub struct StubFetcher {
    source: TradeSource,
    trades: Vec<Trade>,
    calls: AtomicUsize,
    requests: Mutex<Vec<FetchRequest>>,
}

impl StubFetcher {
    pub fn new(source: TradeSource, trades: Vec<Trade>) -> Self {
        Self {
            source,
            trades,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn empty(source: TradeSource) -> Self {
        Self::new(source, Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TradeFetcher for StubFetcher {
    fn source(&self) -> TradeSource {
        self.source
    }

    async fn fetch(&self, request: &FetchRequest) -> Vec<Trade> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.trades.clone()
    }
}

/// Minimal canonical trade.
pub fn trade(source: TradeSource, id: &str, timestamp: i64) -> Trade {
    Trade {
        id: id.to_string(),
        order_id: Some(format!("o-{id}")),
        client_order_id: None,
        symbol: "BTC/USDT".into(),
        instrument_type: pt_core::InstrumentType::Spot,
        side: pt_core::Side::Buy,
        quantity: 1.0,
        price: 30_000.0,
        total_value: 30_000.0,
        timestamp,
        datetime: pt_core::time_util::iso_from_ms(timestamp),
        fee: 0.0,
        fee_sign: 0,
        fee_currency: String::new(),
        trade_type: pt_core::TradeType::Spot,
        source,
    }
}

// ---------------------------------------------------------------------------
// Raw record fixtures
// ---------------------------------------------------------------------------

/// Native BTC-USDT buy fill.
pub fn okx_fill(trade_id: &str, ts: i64) -> Value {
    json!({
        "instType": "SPOT", "instId": "BTC-USDT", "tradeId": trade_id,
        "ordId": format!("o-{trade_id}"), "clOrdId": "", "side": "buy",
        "fillSz": "0.01", "fillPx": "30000", "fee": "-0.00001", "feeCcy": "BTC",
        "ts": ts.to_string(), "fillTime": ts.to_string()
    })
}

/// `count` fills `t-{start}..`, newest first, one second apart.
pub fn okx_fills(start: usize, count: usize, newest_ts: i64) -> Vec<Value> {
    (0..count)
        .map(|i| okx_fill(&format!("t-{}", start + i), newest_ts - i as i64 * 1_000))
        .collect()
}

/// Native ETH-USDT sell order; `uTime` trails `cTime` by one second.
pub fn okx_order(ord_id: &str, state: &str, acc_fill_sz: &str, c_time: i64) -> Value {
    json!({
        "instType": "SPOT", "instId": "ETH-USDT", "ordId": ord_id, "clOrdId": "",
        "side": "sell", "sz": acc_fill_sz, "px": "2000", "accFillSz": acc_fill_sz,
        "avgPx": "2000", "fillSz": acc_fill_sz, "fillPx": "2000", "state": state,
        "fee": "-0.5", "feeCcy": "USDT",
        "cTime": c_time.to_string(), "uTime": (c_time + 1_000).to_string()
    })
}

/// `count` filled orders `{start}..`, newest first, one second apart.
pub fn okx_orders(start: usize, count: usize, newest_ts: i64) -> Vec<Value> {
    (0..count)
        .map(|i| okx_order(&(start + i).to_string(), "filled", "1", newest_ts - i as i64 * 1_000))
        .collect()
}

/// Exchange-neutral trade.
pub fn unified_trade(id: &str, symbol: &str, timestamp: i64) -> Value {
    json!({
        "id": id, "order": format!("o-{id}"), "symbol": symbol, "side": "buy",
        "amount": 0.5, "price": 100.0, "cost": 50.0,
        "fee": {"cost": 0.05, "currency": "USDT"},
        "timestamp": timestamp, "info": {"instType": "SPOT"}
    })
}

/// `count` trades for `symbol`, ids `{symbol}-{start}..`, newest first.
pub fn unified_trades(symbol: &str, start: usize, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| unified_trade(&format!("{symbol}-{}", start + i), symbol, 1_700_000_000_000 - i as i64 * 1_000))
        .collect()
}

/// Exchange-neutral order with the given status and filled amount.
pub fn unified_order(id: &str, symbol: &str, status: &str, filled: f64) -> Value {
    json!({
        "id": id, "symbol": symbol, "side": "sell", "status": status,
        "amount": 1.0, "filled": filled, "price": 100.0, "average": 101.0,
        "fee": {"cost": 0.1, "currency": "USDT"},
        "timestamp": 1_700_000_000_000_i64, "lastTradeTimestamp": 1_700_000_001_000_i64
    })
}
