//! OKX v5 request signing.
//!
//! Every private REST call carries four headers:
//!
//! | Header                 | Value                                    |
//! |------------------------|------------------------------------------|
//! | `OK-ACCESS-KEY`        | API key                                  |
//! | `OK-ACCESS-SIGN`       | Base64 HMAC-SHA256 over the prehash      |
//! | `OK-ACCESS-TIMESTAMP`  | ISO-8601 UTC with milliseconds           |
//! | `OK-ACCESS-PASSPHRASE` | passphrase chosen at key creation        |
//!
//! The prehash string is `timestamp + METHOD + requestPath + body`, where
//! `requestPath` includes the query string for GET requests.

use anyhow::{Result, anyhow};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute an HMAC-SHA256 signature and return it Base64-encoded.
pub fn hmac_sha256_base64(secret: &str, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| anyhow!("invalid HMAC key: {e}"))?;
    mac.update(message.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Sign one request. `request_path` must already contain `?query` if any.
pub fn sign(secret: &str, timestamp: &str, method: &str, request_path: &str, body: &str) -> Result<String> {
    let prehash = format!("{timestamp}{}{request_path}{body}", method.to_ascii_uppercase());
    hmac_sha256_base64(secret, &prehash)
}

/// Current time in the `OK-ACCESS-TIMESTAMP` format (`2020-12-08T09:08:57.715Z`).
#[inline]
pub fn iso_timestamp() -> String {
    pt_core::time_util::now_iso()
}

/// URL-encode `(key, value)` pairs into a query string, preserving order.
pub fn build_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `path` with `?query` appended when there are parameters.
pub fn request_path(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", build_query(params))
    }
}
