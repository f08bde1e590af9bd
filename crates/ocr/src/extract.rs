//! Single-line field heuristics. Each returns `None` when the line has no match.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_amount, r"\$?\s*\d+\.?\d*");
re!(re_phone, r"\d{3}[-.]?\d{3}[-.]?\d{4}");

/// Accepted whole-line date layouts, tried in order: `DD/MM/YY`, `DD-MM-YYYY`.
const DATE_FORMATS: [&str; 2] = ["%d/%m/%y", "%d-%m-%Y"];

// ── Amount ───────────────────────────────────────────────────────────────────

/// Parse the first numeric run on the line, with an optional leading `$`.
///
/// Only the first run counts: `"2 x 5.00 = 10.00"` yields `2`.
pub fn extract_amount(line: &str) -> Option<Decimal> {
    let m = re_amount().find(line)?;
    let digits: String = m
        .as_str()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    Decimal::from_str(digits.trim_end_matches('.')).ok()
}

// ── Phone ────────────────────────────────────────────────────────────────────

/// First 3-3-4 digit group, optionally split by `-` or `.`, returned verbatim.
pub fn extract_phone(line: &str) -> Option<String> {
    re_phone().find(line).map(|m| m.as_str().to_string())
}

// ── Date ─────────────────────────────────────────────────────────────────────

/// The whole line must be a date in one of [`DATE_FORMATS`].
pub fn extract_date(line: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(line, fmt).ok())
}

// ── Tests ────────────────────────────────────────────────────────────────────
