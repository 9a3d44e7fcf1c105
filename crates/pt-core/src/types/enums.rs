//! Enumerations used throughout the trade retrieval system.
//!
//! String forms follow the exchange-neutral vocabulary used in the canonical
//! [`Trade`](super::trade::Trade) record: upper-case instrument types and sides,
//! lower-case trade types and provenance tags.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Instrument types
// ---------------------------------------------------------------------------

/// Instrument (product) category of a traded pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstrumentType {
    #[default]
    Spot,
    Margin,
    Swap,
    Futures,
    Option,
}

impl InstrumentType {
    /// Exchange wire label (`SPOT`, `MARGIN`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spot => "SPOT",
            Self::Margin => "MARGIN",
            Self::Swap => "SWAP",
            Self::Futures => "FUTURES",
            Self::Option => "OPTION",
        }
    }

    /// Parse an exchange label, case-insensitively.
    ///
    /// Returns `None` for unknown labels so callers can fall back to a
    /// configured default.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "SPOT" => Some(Self::Spot),
            "MARGIN" => Some(Self::Margin),
            "SWAP" => Some(Self::Swap),
            "FUTURES" => Some(Self::Futures),
            "OPTION" => Some(Self::Option),
            _ => None,
        }
    }

    /// Spot and margin trade the underlying pair; everything else is a
    /// derivative.
    pub fn trade_type(self) -> TradeType {
        match self {
            Self::Spot | Self::Margin => TradeType::Spot,
            Self::Swap | Self::Futures | Self::Option => TradeType::Derivatives,
        }
    }
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Trade metadata
// ---------------------------------------------------------------------------

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Parse a side label (`buy` / `BUY` / `Sell` ...).
    pub fn parse(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("buy") {
            Some(Self::Buy)
        } else if label.eq_ignore_ascii_case("sell") {
            Some(Self::Sell)
        } else {
            None
        }
    }
}

/// Coarse trade category derived from [`InstrumentType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Spot,
    Derivatives,
}

/// Which data source produced a trade record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSource {
    /// Native per-fill endpoint.
    Fills,
    /// Native filled-orders history endpoint.
    Orders,
    /// Generic exchange-neutral calls.
    Fallback,
}

impl TradeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fills => "fills",
            Self::Orders => "orders",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for TradeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
