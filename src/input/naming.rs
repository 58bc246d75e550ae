//! Output naming
//!
//! Output filenames are a pure function of the input stem, the run date and
//! the stem role, so re-running on the same day overwrites instead of
//! accumulating copies.

use chrono::{Local, NaiveDate};

/// Identifier used when a stem has no ASCII alphanumerics left
pub const FALLBACK_STEM: &str = "track";

const SEPARATOR: char = '_';

/// Normalize a filename stem into a lowercase, `_`-separated identifier
///
/// Runs of non-alphanumeric characters collapse to one separator, a
/// separator is inserted where a lowercase letter or digit is followed by an
/// uppercase letter, and leading/trailing separators are trimmed.
pub fn normalize_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len() + 4);
    let mut pending_separator = false;
    let mut prev: Option<char> = None;

    for c in stem.chars() {
        if !c.is_ascii_alphanumeric() {
            pending_separator = true;
            prev = None;
            continue;
        }

        if pending_separator {
            if !out.is_empty() {
                out.push(SEPARATOR);
            }
            pending_separator = false;
        } else if c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push(SEPARATOR);
        }

        out.push(c.to_ascii_lowercase());
        prev = Some(c);
    }

    if out.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        out
    }
}

/// Format a calendar date as `YYYYMMDD`
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Today's local date as `YYYYMMDD`
pub fn today_stamp() -> String {
    date_stamp(Local::now().date_naive())
}
