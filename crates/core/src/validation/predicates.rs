//! Stand-alone acceptance predicates for single field values.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

pub use crate::currency::is_iso4217;

/// Maximum integer digits that fit a `NUMERIC(10,2)` column.
pub const PRICE_MAX_INTEGER_DIGITS: usize = 8;

/// Unsigned decimal with `.` as separator and at most two fractional digits.
pub const PRICE_PATTERN: &str = r"^[0-9]+(\.[0-9]{1,2})?$";

/// ISO-8601 calendar date, date part only.
pub const DATE_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PRICE_PATTERN).expect("valid regex"));

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(DATE_PATTERN).expect("valid regex"));

/// Whether `value` is a decimal with at most two fractional digits.
pub fn is_price(value: &str) -> bool {
    PRICE_RE.is_match(value)
}

/// Whether the integer part of a price fits `NUMERIC(10,2)`.
///
/// Leading zeros do not count. Assumes [`is_price`] already holds.
pub fn price_fits_storage(value: &str) -> bool {
    let integer = value.split('.').next().unwrap_or_default();
    integer.trim_start_matches('0').len() <= PRICE_MAX_INTEGER_DIGITS
}

/// Whether `value` is a real calendar date written as `YYYY-MM-DD`.
pub fn is_iso8601_date(value: &str) -> bool {
    parse_iso8601_date(value).is_some()
}

/// Parse a `YYYY-MM-DD` date, rejecting impossible days such as `2021-02-30`.
pub fn parse_iso8601_date(value: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Whether `value` is non-empty and made of ASCII letters only.
pub fn is_alpha(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
}
