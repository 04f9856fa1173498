//! Symbol normalization for user input.
//!
//! Users type tickers loosely ("reliance", "m&m ", "TATA-MOTORS"); providers
//! want a single canonical form with an exchange qualifier. Normalization is
//! applied once at the input boundary so the ledger and quote cache only ever
//! see canonical symbols.

/// Fallback instrument when the input is empty.
pub const DEFAULT_SYMBOL: &str = "RELIANCE.NS";

/// Exchange qualifiers accepted as already-canonical.
const KNOWN_SUFFIXES: [&str; 2] = [".NS", ".BO"];

/// Canonicalize a user-entered ticker.
///
/// Upper-cases, strips whitespace and hyphens, and appends `.NS` unless the
/// input already carries a recognized exchange qualifier. Empty input falls
/// back to [`DEFAULT_SYMBOL`].
pub fn normalize(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase();

    if cleaned.is_empty() {
        return DEFAULT_SYMBOL.to_string();
    }
    if KNOWN_SUFFIXES.iter().any(|s| cleaned.ends_with(s)) {
        return cleaned;
    }
    format!("{cleaned}.NS")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_default_exchange_qualifier() {
        assert_eq!(normalize("reliance"), "RELIANCE.NS");
        assert_eq!(normalize("TCS"), "TCS.NS");
    }

    #[test]
    fn keeps_existing_qualifiers() {
        assert_eq!(normalize("infy.ns"), "INFY.NS");
        assert_eq!(normalize("SENSEX.BO"), "SENSEX.BO");
    }

    #[test]
    fn strips_whitespace_and_hyphens() {
        assert_eq!(normalize("  tata motors "), "TATAMOTORS.NS");
        assert_eq!(normalize("TATA-MOTORS"), "TATAMOTORS.NS");
        assert_eq!(normalize("m&m"), "M&M.NS");
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        assert_eq!(normalize(""), DEFAULT_SYMBOL);
        assert_eq!(normalize("   "), DEFAULT_SYMBOL);
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["reliance", "infy.ns", "  tata motors ", ""] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }
}
