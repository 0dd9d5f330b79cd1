//! Minor-unit money conversions
//!
//! Balances are stored and computed as integer minor units (cents). The
//! wire format is a decimal string with exactly two fractional digits.
//! Conversions here use integer arithmetic only; there is no floating
//! point anywhere on a money path.

/// Minor units per major currency unit.
const SCALE: i64 = 100;

/// Parse a two-fractional-digit decimal string into minor units
///
/// Expects input already shaped like `^[0-9]{1,10}[.][0-9]{2}$` (the
/// request layer validates before calling). Returns `None` for anything
/// else so a validation gap cannot smuggle in a bad amount.
pub fn parse_minor_units(amount: &str) -> Option<i64> {
    let (whole, frac) = amount.split_once('.')?;
    if whole.is_empty() || whole.len() > 10 || frac.len() != 2 {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = frac.parse().ok()?;
    Some(whole * SCALE + frac)
}

/// Format minor units as a decimal string with two fractional digits
pub fn format_minor_units(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.abs();
    format!("{sign}{}.{:02}", abs / SCALE, abs % SCALE)
}
