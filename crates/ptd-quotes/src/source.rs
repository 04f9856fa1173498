//! Quote-source boundary.
//!
//! This module defines **only** the source trait, the fundamentals record and
//! the error type. No concrete providers, no caching, no symbol handling.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a [`QuoteSource`] implementation may return.
#[derive(Debug)]
pub enum QuoteError {
    /// Network or transport failure.
    Transport(String),
    /// A response payload could not be decoded.
    Decode(String),
    /// The source has no usable data for this symbol.
    NotFound(String),
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteError::Transport(msg) => write!(f, "transport error: {msg}"),
            QuoteError::Decode(msg) => write!(f, "decode error: {msg}"),
            QuoteError::NotFound(symbol) => write!(f, "no quote data for {symbol}"),
        }
    }
}

impl std::error::Error for QuoteError {}

// ---------------------------------------------------------------------------
// Fundamentals
// ---------------------------------------------------------------------------

/// Company snapshot for the deep-dive view.
///
/// Every field is optional: sources routinely omit any of them, and a partial
/// snapshot is still worth rendering. Prices are micros; ratios stay as the
/// source's floating-point values (they are display-only and never enter the
/// ledger).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub symbol: String,
    pub long_name: Option<String>,
    /// Whole rupees, not micros: large caps would overflow an i64 of micros.
    pub market_cap: Option<i64>,
    pub previous_close_micros: Option<i64>,
    pub fifty_two_week_high_micros: Option<i64>,
    pub fifty_two_week_low_micros: Option<i64>,
    pub volume: Option<i64>,
    pub trailing_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub profit_margin: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub business_summary: Option<String>,
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Pluggable quote source.
///
/// Implementations must be object-safe (`Box<dyn QuoteSource>`) and
/// `Send + Sync` so they can be shared across async task boundaries.
#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    /// Human-readable name identifying this source (e.g. `"yahoo"`).
    fn source_name(&self) -> &'static str;

    /// Latest traded price for `symbol`, in micros.
    async fn last_price(&self, symbol: &str) -> Result<i64, QuoteError>;

    /// Company fundamentals for `symbol`.
    ///
    /// Sources without fundamentals may return `NotFound`; the default does
    /// exactly that.
    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, QuoteError> {
        Err(QuoteError::NotFound(symbol.to_string()))
    }
}
