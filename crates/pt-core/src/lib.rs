//! # pt-core
//!
//! Core crate for the portfolio trade tracker, providing:
//!
//! - **Types** (`types`): canonical `Trade`, enums, symbol normalizer
//! - **Client seam** (`client`): `ExchangeClient` trait consumed by the engine
//! - **Deduplication** (`dedup`): composite-key trade deduplicator
//! - **Configuration** (`config`): JSON config deserialization
//! - **Error types** (`error`): domain-specific `PtError` via thiserror
//! - **Time utilities** (`time_util`): epoch-ms ↔ ISO-8601 helpers
//! - **Logging** (`logging`): tracing-based structured logging

pub mod client;
pub mod config;
pub mod dedup;
pub mod error;
pub mod logging;
pub mod time_util;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;
