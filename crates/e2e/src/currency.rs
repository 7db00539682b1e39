//! Currency string validation and lenient parsing
//!
//! Validation is strict (used for UI formatting assertions), parsing is
//! lenient (used for numeric equality), so `$1,250.50` and `1250.5` compare
//! equal in value even though only the former passes format validation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading `$`, 1-3 digits, comma-separated 3-digit groups, optional 2-digit cents.
static CURRENCY_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\d{1,3}(,\d{3})*(\.\d{2})?$").expect("valid currency regex"));

/// Returns true iff the trimmed text is a strictly formatted currency string
/// like `$1,234.56`. `None` and empty strings are not valid.
pub fn is_currency_formatted(text: Option<&str>) -> bool {
    match text {
        Some(t) => CURRENCY_FORMAT.is_match(t.trim()),
        None => false,
    }
}

/// Converts a currency string into its raw numeric value by stripping every
/// character that is not a digit or decimal point. Returns `f64::NAN` when
/// nothing parseable remains. No sign handling.
pub fn parse_currency(text: &str) -> f64 {
    let normalized: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    normalized.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strict_currency_formats() {
        for text in ["$0", "$25", "$999", "$1,000", "$25,000.00", "$1,234.56", "$123,456,789.01"] {
            assert!(is_currency_formatted(Some(text)), "expected valid: {text}");
        }
    }

    #[test]
    fn rejects_malformed_currency() {
        for text in [
            "1,234.56",  // missing $
            "$1234,56",  // comma in wrong place
            "$1,23",     // short group
            "$1,2345",   // long group
            "$1,000.5",  // one decimal digit
            "$1,000.500",
            "$",
            "",
            "  ",
            "AUD 25",
        ] {
            assert!(!is_currency_formatted(Some(text)), "expected invalid: {text}");
        }
        assert!(!is_currency_formatted(None));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert!(is_currency_formatted(Some("  $1,250.50 ")));
    }

    #[test]
    fn parses_equivalent_values_equally() {
        assert_eq!(parse_currency("$1,250.50"), 1250.5);
        assert_eq!(parse_currency("1250.5"), 1250.5);
        assert_eq!(parse_currency("$25,000.00"), 25000.0);
        assert_eq!(parse_currency("25000"), 25000.0);
    }

    #[test]
    fn parse_without_digits_is_nan() {
        assert!(parse_currency("no price here").is_nan());
        assert!(parse_currency("").is_nan());
    }
}
