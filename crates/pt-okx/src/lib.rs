//! # pt-okx
//!
//! OKX connectivity for the trade retrieval engine.
//!
//! [`OkxClient`] implements [`ExchangeClient`](pt_core::client::ExchangeClient)
//! over the signed v5 REST API:
//!
//! - **Signing** (`auth`): HMAC-SHA256 prehash, Base64, ISO timestamps
//! - **Client** (`client`): endpoint routing, query building, envelope unwrapping
//! - **Unified mapping** (`unified`): native rows → exchange-neutral rows

pub mod auth;
pub mod client;
pub mod unified;

pub use client::OkxClient;
