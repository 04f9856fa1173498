//! ptd-quotes
//!
//! Market-data boundary for the paper-trading terminal. This crate owns the
//! quote-source abstraction and concrete providers; it knows nothing about
//! accounts or fees. Callers (CLI) fetch prices and hand them to the ledger.
//!
//! - `source`: object-safe async quote-source trait + error type
//! - `symbols`: exchange-qualifier normalization for user input
//! - `price`: deterministic rupee/micro conversions
//! - `cache`: TTL wrapper over any source
//! - `yahoo`: Yahoo Finance chart/quoteSummary provider
//! - `fixed`: deterministic in-memory source for offline sessions and tests

pub mod cache;
pub mod fixed;
pub mod price;
pub mod source;
pub mod symbols;
pub mod yahoo;

pub use cache::QuoteCache;
pub use fixed::FixedQuoteSource;
pub use price::{micros_from_quote, parse_price_micros, PriceParseError};
pub use source::{Fundamentals, QuoteError, QuoteSource};
pub use symbols::normalize;
pub use yahoo::YahooQuoteSource;
