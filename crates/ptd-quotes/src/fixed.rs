//! Deterministic in-memory quote source.
//!
//! Backs `--offline` sessions and tests: prices come from a fixed table, so a
//! whole session replays identically. Unknown symbols are `NotFound`, the
//! same contract as a live source.

use std::collections::BTreeMap;

use crate::source::{Fundamentals, QuoteError, QuoteSource};

pub struct FixedQuoteSource {
    prices_micros: BTreeMap<String, i64>,
}

impl FixedQuoteSource {
    pub fn new() -> Self {
        Self {
            prices_micros: BTreeMap::new(),
        }
    }

    /// Reference table with a handful of liquid NSE names, for demo sessions.
    pub fn with_reference_prices() -> Self {
        const M: i64 = 1_000_000;
        let mut s = Self::new();
        s.set("RELIANCE.NS", 2_950 * M);
        s.set("TCS.NS", 3_245 * M);
        s.set("INFY.NS", 1_520 * M);
        s.set("HDFCBANK.NS", 1_640 * M);
        s.set("SBIN.NS", 815 * M);
        s.set("TATAMOTORS.NS", 975 * M);
        s
    }

    pub fn set(&mut self, symbol: &str, price_micros: i64) {
        self.prices_micros.insert(symbol.to_string(), price_micros);
    }
}

impl Default for FixedQuoteSource {
    fn default() -> Self {
        Self::with_reference_prices()
    }
}

#[async_trait::async_trait]
impl QuoteSource for FixedQuoteSource {
    fn source_name(&self) -> &'static str {
        "fixed"
    }

    async fn last_price(&self, symbol: &str) -> Result<i64, QuoteError> {
        self.prices_micros
            .get(symbol)
            .copied()
            .ok_or_else(|| QuoteError::NotFound(symbol.to_string()))
    }

    async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, QuoteError> {
        let price = self.last_price(symbol).await?;
        Ok(Fundamentals {
            symbol: symbol.to_string(),
            previous_close_micros: Some(price),
            ..Fundamentals::default()
        })
    }
}
