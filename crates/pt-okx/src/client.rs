//! Signed OKX v5 REST client.
//!
//! # Endpoints
//!
//! | Operation                 | Path                                   | Shape   |
//! |---------------------------|----------------------------------------|---------|
//! | Native fills              | `/api/v5/trade/fills`                  | native  |
//! | Native filled orders      | `/api/v5/trade/orders-history`         | native  |
//! | Generic "my trades"       | `/api/v5/trade/fills-history`          | neutral |
//! | Generic "closed orders"   | `/api/v5/trade/orders-history-archive` | neutral |
//!
//! Native calls return `data` rows untouched. Generic calls map each row to the
//! exchange-neutral shape (see [`crate::unified`]).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use pt_core::InstrumentType;
use pt_core::client::{ExchangeClient, NativeQuery};
use pt_core::config::OkxConfig;
use pt_core::error::PtError;
use pt_core::to_exchange_format;
use serde_json::Value;
use tracing::debug;

use crate::auth;
use crate::unified::{fill_to_unified, order_to_unified};

pub const FILLS_PATH: &str = "/api/v5/trade/fills";
pub const ORDERS_HISTORY_PATH: &str = "/api/v5/trade/orders-history";
pub const FILLS_HISTORY_PATH: &str = "/api/v5/trade/fills-history";
pub const ORDERS_ARCHIVE_PATH: &str = "/api/v5/trade/orders-history-archive";

/// Largest page OKX serves on the trade history endpoints.
pub const MAX_PAGE: usize = 100;

type Params = Vec<(&'static str, String)>;

/// Authenticated OKX REST client.
pub struct OkxClient {
    http: reqwest::Client,
    config: OkxConfig,
    /// `instType` sent on every history query.
    inst_type: InstrumentType,
}

impl OkxClient {
    /// Build a client. No request is made until the first fetch.
    pub fn new(config: OkxConfig, inst_type: InstrumentType) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build OKX HTTP client")?;
        Ok(Self {
            http,
            config,
            inst_type,
        })
    }

    pub fn inst_type(&self) -> InstrumentType {
        self.inst_type
    }

    /// Signed GET returning the envelope's `data` rows.
    async fn get(&self, path: &str, params: &[(&'static str, String)]) -> Result<Vec<Value>> {
        let request_path = auth::request_path(path, params);
        let timestamp = auth::iso_timestamp();
        let signature = auth::sign(&self.config.secret_key, &timestamp, "GET", &request_path, "")?;
        let url = format!("{}{request_path}", self.config.rest_url.trim_end_matches('/'));
        debug!("[okx] GET {request_path}");

        let mut req = self
            .http
            .get(&url)
            .header("OK-ACCESS-KEY", &self.config.api_key)
            .header("OK-ACCESS-SIGN", signature)
            .header("OK-ACCESS-TIMESTAMP", &timestamp)
            .header("OK-ACCESS-PASSPHRASE", &self.config.passphrase);
        if self.config.simulated {
            req = req.header("x-simulated-trading", "1");
        }

        let resp = req
            .send()
            .await
            .map_err(|e| PtError::Http(e.to_string()))
            .with_context(|| format!("GET {path} failed"))?;
        let status = resp.status();
        let body = resp.text().await.context("failed to read OKX response body")?;

        match parse_envelope(&body) {
            Ok(rows) if status.is_success() => {
                debug!("[okx] {path}: {} row(s)", rows.len());
                Ok(rows)
            }
            Ok(_) => Err(PtError::Http(format!("HTTP {status} from {path}")).into()),
            Err(e) if status.is_success() => Err(e),
            Err(e) => Err(e.context(format!("HTTP {status} from {path}"))),
        }
    }

    fn native_params(&self, query: &NativeQuery) -> Params {
        let mut params: Params = vec![("instType", query.inst_type.as_str().to_string())];
        if let Some(inst_id) = &query.inst_id {
            params.push(("instId", inst_id.clone()));
        }
        push_window(&mut params, query.since, query.after, query.limit);
        params
    }

    fn generic_params(&self, symbol: Option<&str>, since: Option<i64>, limit: usize) -> Params {
        let mut params: Params = vec![("instType", self.inst_type.as_str().to_string())];
        if let Some(inst_id) = to_exchange_format(symbol) {
            params.push(("instId", inst_id));
        }
        push_window(&mut params, since, None, limit);
        params
    }
}

/// Time window and page size. Both bounds are inclusive, so a continuation
/// page repeats the records sharing the cursor millisecond.
fn push_window(params: &mut Params, since: Option<i64>, after: Option<i64>, limit: usize) {
    if let Some(since) = since.filter(|ts| *ts > 0) {
        params.push(("begin", since.to_string()));
    }
    if let Some(after) = after.filter(|ts| *ts > 0) {
        params.push(("end", after.to_string()));
    }
    params.push(("limit", limit.clamp(1, MAX_PAGE).to_string()));
}

/// Unwrap `{"code":"0","msg":"","data":[...]}`.
///
/// A non-zero `code` becomes [`PtError::Exchange`]; a missing `data` array is
/// an empty result.
pub fn parse_envelope(body: &str) -> Result<Vec<Value>> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| PtError::Parse(format!("invalid OKX response: {e}")))?;

    let code = match v.get("code") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(PtError::Parse("OKX response without code".into()).into()),
    };
    if code != "0" {
        let msg = v.get("msg").and_then(Value::as_str).unwrap_or("").to_string();
        return Err(PtError::Exchange { code, msg }.into());
    }

    match v.get("data") {
        Some(Value::Array(rows)) => Ok(rows.clone()),
        _ => Ok(Vec::new()),
    }
}

#[async_trait]
impl ExchangeClient for OkxClient {
    async fn fetch_fills(&self, query: &NativeQuery) -> Result<Vec<Value>> {
        self.get(FILLS_PATH, &self.native_params(query)).await
    }

    async fn fetch_orders_history(&self, query: &NativeQuery) -> Result<Vec<Value>> {
        let mut params = self.native_params(query);
        params.push(("state", "filled".to_string()));
        self.get(ORDERS_HISTORY_PATH, &params).await
    }

    async fn fetch_my_trades(&self, symbol: Option<&str>, since: Option<i64>, limit: usize) -> Result<Vec<Value>> {
        let rows = self
            .get(FILLS_HISTORY_PATH, &self.generic_params(symbol, since, limit))
            .await?;
        Ok(rows.iter().map(fill_to_unified).collect())
    }

    async fn fetch_closed_orders(&self, symbol: Option<&str>, since: Option<i64>, limit: usize) -> Result<Vec<Value>> {
        let mut params = self.generic_params(symbol, since, limit);
        params.push(("state", "filled".to_string()));
        let rows = self.get(ORDERS_ARCHIVE_PATH, &params).await?;
        Ok(rows.iter().map(order_to_unified).collect())
    }
}
