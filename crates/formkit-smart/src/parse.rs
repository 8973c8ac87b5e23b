//! # Smart Parsers
//!
//! Three parsers, one per numeric datatype tag:
//!
//! | Parser | `"250"` | `"250%"` | `"10,5"` | `"abc"` |
//! |--------|---------|----------|----------|---------|
//! | [`parse_smart_int`] | `250` | `2` | none | none |
//! | [`parse_smart_number`] | `250.0` | `2.5` | `10.5` | none |
//! | [`parse_smart_percent`] | `2.5` | `2.5` | `0.105` | none |
//!
//! The integer parser floors the percentage (`"150%"` is `1`). That loses
//! the fraction, unlike the decimal parser, and is kept deliberately so
//! existing forms keep producing the same values.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::SmartInput;

static INT_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]+)\s*%\s*$").expect("valid regex"));
static INT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));
static DECIMAL_PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]*)?)\s*%\s*$").expect("valid regex"));
static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]*)?$").expect("valid regex"));
static BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(?:[.,][0-9]*)?$").expect("valid regex"));

/// Parse an integer, accepting an optional percent suffix.
///
/// `"42"` is `42`. `"250 %"` is `floor(250 / 100)`, i.e. `2`. Digit strings
/// too large for `i64` and anything else yield `None`.
pub fn parse_smart_int<'a>(input: impl Into<SmartInput<'a>>) -> Option<i64> {
    let text = input.into().as_text();

    if let Some(caps) = INT_PERCENT.captures(&text) {
        let n: i64 = caps[1].parse().ok()?;
        return Some(n.div_euclid(100));
    }
    if INT.is_match(&text) {
        return text.parse().ok();
    }
    None
}

/// Parse a decimal number, accepting `,` as the decimal separator and an
/// optional percent suffix.
///
/// Numeric input is returned unchanged. Every comma is replaced, so
/// `"1,000,5"` becomes `"1.000.5"` and yields `None`.
pub fn parse_smart_number<'a>(input: impl Into<SmartInput<'a>>) -> Option<f64> {
    let text = match input.into() {
        SmartInput::Number(n) => return Some(n),
        SmartInput::Text(s) => s.replace(',', "."),
    };

    if let Some(caps) = DECIMAL_PERCENT.captures(&text) {
        return parse_decimal(&caps[1]).map(|n| n / 100.0);
    }
    if DECIMAL.is_match(&text) {
        return parse_decimal(&text);
    }
    None
}

/// Parse a percentage into a fraction.
///
/// A bare number is read as already being a percentage: `"10"` and
/// `"10%"` both yield `0.1`. Input that is not a bare number goes to
/// [`parse_smart_number`] as-is.
pub fn parse_smart_percent<'a>(input: impl Into<SmartInput<'a>>) -> Option<f64> {
    let input = input.into();
    let text = input.as_text();

    if BARE_NUMBER.is_match(&text) {
        let suffixed = format!("{text}%");
        return parse_smart_number(suffixed.as_str());
    }
    parse_smart_number(input)
}

/// `str::parse` rejects nothing the patterns above accept except a
/// trailing `.`, which is trimmed first.
fn parse_decimal(digits: &str) -> Option<f64> {
    digits.trim_end_matches('.').parse().ok()
}
