//! Duration override derived from caller-supplied calendar dates.
//!
//! Parsing never fails: absent, empty, or malformed dates yield
//! `None` ("no override") instead of an error, so they never block a request.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

/// Accepted date format for `start_date` / `end_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves an optional month override from two optional date strings.
///
/// Returns `None` if either date is missing, empty, or not a valid
/// `YYYY-MM-DD` calendar date.
#[must_use]
pub fn resolve_duration(start: Option<&str>, end: Option<&str>) -> Option<u32> {
    let (start, end) = (start?, end?);
    if start.is_empty() || end.is_empty() {
        return None;
    }

    match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => Some(months_between(start, end)),
        (start_res, end_res) => {
            debug!(
                start_ok = start_res.is_some(),
                end_ok = end_res.is_some(),
                "ignoring unparsable date range"
            );
            None
        }
    }
}

/// Parses a strict `YYYY-MM-DD` date.
///
/// chrono accepts signs, short years, and unpadded fields under
/// [`DATE_FORMAT`], so the fixed-width shape is checked first.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Whole months from `start` to `end`, counting a partial trailing month as a
/// full one. Never returns less than 1.
#[must_use]
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut months = (i64::from(end.year()) - i64::from(start.year())) * 12
        + (i64::from(end.month()) - i64::from(start.month()));
    if end.day() > start.day() {
        months += 1;
    }
    u32::try_from(months.max(1)).unwrap_or(u32::MAX)
}
