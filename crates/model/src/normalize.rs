//! Field canonicalization — slug derivation, date/time rewriting, email
//! normalization.
//!
//! These are the mechanical halves of the write rules in
//! [`crate::rules`]: each takes raw input and either produces the
//! canonical form or reports that no canonical form exists.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// `H:MM` or `HH:MM`, hour 0–23, minute 0–59, optional `AM`/`PM`
/// (any case) after at most one space.
static TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9](\s?[AaPp][Mm])?$").unwrap());

/// `local@domain.tld` — at least one non-whitespace/non-`@` run on each
/// side of the `@`, and a dot in the domain.
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Formats accepted by [`canonical_date`], tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// Derive a URL-safe slug from an event title.
///
/// Lowercase, strip everything but word characters / whitespace /
/// hyphens, collapse whitespace runs and hyphen runs to single hyphens,
/// trim hyphens at both ends.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = NON_SLUG.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUN.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Parse a permissive calendar-date input and rewrite it as `YYYY-MM-DD`.
///
/// Returns `None` when no accepted format matches.
pub fn canonical_date(input: &str) -> Option<String> {
    let input = input.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    // Full timestamps are accepted too; only the date part is kept.
    if let Ok(stamp) = chrono::DateTime::parse_from_rfc3339(input) {
        return Some(stamp.date_naive().format("%Y-%m-%d").to_string());
    }
    None
}

/// Validate a clock time and return the trimmed original, which is
/// already canonical whenever the pattern matches.
pub fn canonical_time(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if TIME.is_match(trimmed) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Trim and lowercase an email address, then check its shape.
pub fn normalize_email(input: &str) -> Option<String> {
    let normalized = input.trim().to_lowercase();
    if EMAIL.is_match(&normalized) {
        Some(normalized)
    } else {
        None
    }
}
