//! Deterministic rupee/micro conversions.
//!
//! User-entered decimal strings convert without floating-point at any stage.
//! Provider quotes arrive as JSON numbers, so those are rounded to the
//! nearest micro exactly once, at this boundary; everything downstream is
//! integer arithmetic.

use std::fmt;

/// Errors from parsing a user-entered decimal price.
#[derive(Debug, PartialEq, Eq)]
pub enum PriceParseError {
    Empty,
    /// Non-numeric characters or multiple `.` separators.
    Invalid(String),
    /// More than 6 decimal places would require rounding user input.
    TooManyDecimalPlaces(String),
    Overflow(String),
}

impl fmt::Display for PriceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceParseError::Empty => write!(f, "price is empty"),
            PriceParseError::Invalid(raw) => write!(f, "price could not be parsed: '{raw}'"),
            PriceParseError::TooManyDecimalPlaces(raw) => {
                write!(f, "price has more than 6 decimal places: '{raw}'")
            }
            PriceParseError::Overflow(raw) => write!(f, "price out of range: '{raw}'"),
        }
    }
}

impl std::error::Error for PriceParseError {}

/// Convert a decimal rupee string to integer micros deterministically.
///
/// Accepts an optional fractional part separated by `.`; rejects signs,
/// empty strings, more than 6 decimal places, and anything non-numeric.
pub fn parse_price_micros(s: &str) -> Result<i64, PriceParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(PriceParseError::Empty);
    }

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(PriceParseError::Invalid(s.to_string()));
    }
    if frac.len() > 6 {
        return Err(PriceParseError::TooManyDecimalPlaces(s.to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(PriceParseError::Invalid(s.to_string()));
    }

    let whole_part: i64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| PriceParseError::Overflow(s.to_string()))?
    };
    // Right-pad the fraction to exactly 6 digits worth of micros.
    let mut frac_micros: i64 = 0;
    for c in frac.chars() {
        frac_micros = frac_micros * 10 + (c as i64 - '0' as i64);
    }
    for _ in frac.len()..6 {
        frac_micros *= 10;
    }

    whole_part
        .checked_mul(1_000_000)
        .and_then(|w| w.checked_add(frac_micros))
        .ok_or_else(|| PriceParseError::Overflow(s.to_string()))
}

/// Round a provider's floating-point quote to the nearest micro.
///
/// Returns `None` for non-finite or non-positive values; a quote of zero is
/// as unusable as a missing one.
pub fn micros_from_quote(px: f64) -> Option<i64> {
    if !px.is_finite() || px <= 0.0 {
        return None;
    }
    let micros = (px * 1_000_000.0).round();
    if micros > i64::MAX as f64 {
        return None;
    }
    Some(micros as i64)
}
