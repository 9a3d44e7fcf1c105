//! Typed error definitions for the trade retrieval system.
//!
//! [`PtError`] covers failures that callers may want to match on. Transport
//! and setup code still returns `anyhow::Result`; these variants convert into
//! it transparently.

use thiserror::Error;

/// Domain-specific errors.
#[derive(Debug, Error)]
pub enum PtError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// HTTP transport error (connect, timeout, non-2xx status).
    #[error("http error: {0}")]
    Http(String),

    /// The exchange answered with a non-success envelope.
    #[error("exchange error {code}: {msg}")]
    Exchange { code: String, msg: String },

    /// A raw record could not be coerced into the canonical schema.
    #[error("parse error: {0}")]
    Parse(String),

    /// No exchange client has been configured.
    #[error("exchange client not initialized")]
    NotInitialized,
}

pub type PtResult<T> = std::result::Result<T, PtError>;
