//! Numeric formatting and lenient parsing for allocation values.
//!
//! # Responsibility
//! - Round accumulated sums to a stable display/storage precision.
//! - Coerce free-form cell input into finite numbers.
//!
//! # Invariants
//! - Every function here is pure and never panics.
//! - Outputs are always finite; non-finite inputs collapse to `0`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Significant decimal digits kept by [`format`].
pub const SIGNIFICANT_DIGITS: usize = 14;

static NUMERIC_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)")
        .expect("valid numeric prefix regex")
});

/// Rounds `value` to 14 significant digits and returns the re-parsed number.
///
/// Guards totals against accumulation residue such as `0.1 + 0.2`.
pub fn format(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value)
        .parse::<f64>()
        .unwrap_or(0.0);
    normalize_zero(rounded)
}

/// Display string for one aggregated value.
///
/// Zero is reported as blank; everything else uses the shortest decimal form
/// of the rounded value (`0.4`, `1`, `12.5`).
pub fn display(value: f64) -> String {
    let rounded = format(value);
    if rounded == 0.0 {
        String::new()
    } else {
        rounded.to_string()
    }
}

/// Canonical storage string for a cell value.
///
/// Unlike [`display`], zero is written as `0` and no rounding is applied so
/// that stored cells survive a decode/encode cycle bit-for-bit.
pub fn to_cell_text(value: f64) -> String {
    normalize_zero(finite_or_zero(value)).to_string()
}

/// Parses the leading numeric prefix of `text`, falling back to `0`.
///
/// Mirrors the permissive behavior users expect from spreadsheet cells:
/// `" 0.5"`, `"0.5MM"` and `".5"` all parse to `0.5`, while `""`, `"abc"`
/// and overflowing exponents yield `0`.
pub fn parse_lenient(text: &str) -> f64 {
    parse_prefix(text).unwrap_or(0.0)
}

/// Parses the leading numeric prefix of `text`, or `None` when absent.
pub fn parse_prefix(text: &str) -> Option<f64> {
    let captures = NUMERIC_PREFIX_RE.captures(text)?;
    let parsed = captures.get(1)?.as_str().parse::<f64>().ok()?;
    parsed.is_finite().then(|| normalize_zero(parsed))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}
