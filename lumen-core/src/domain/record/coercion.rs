// lumen-core/src/domain/record/coercion.rs
//
// Lenient readers shared by the quality rules. None of them fail: a value
// that cannot be read is simply treated as absent for the check at hand.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::record::Value;

/// Sentinel written by the cleaning step for unattributed traffic.
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// Date layouts tried in order, before the date-time and ISO-8601 fallbacks.
/// The order resolves ambiguous strings deterministically.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ISO_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const ISO_OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Null, absent, blank text and the `unknown` sentinel all count as missing.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Text(s)) => {
            let trimmed = s.trim();
            trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_SENTINEL)
        }
        Some(_) => false,
    }
}

pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()
        }
        Value::Null | Value::Date(_) | Value::Timestamp(_) => None,
    }
}

pub fn parse_date(value: Option<&Value>) -> Option<NaiveDate> {
    match value? {
        Value::Null => None,
        Value::Date(d) => Some(*d),
        Value::Timestamp(ts) => Some(ts.date()),
        Value::Text(s) => parse_date_text(s),
        Value::Integer(i) => parse_date_text(&i.to_string()),
        // Rendered with its decimal point, so 20240115.0 is not a basic-form date
        value @ Value::Float(_) => parse_date_text(&value.to_string()),
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| parse_iso8601(text))
}

fn parse_iso8601(text: &str) -> Option<NaiveDate> {
    // Offset-aware values keep the calendar date of their own offset.
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    ISO_OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date_naive())
        .or_else(|| {
            ISO_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| parse_basic_date(text))
}

/// ISO-8601 basic form `YYYYMMDD`.
fn parse_basic_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = text[0..4].parse().ok()?;
    let month = text[4..6].parse().ok()?;
    let day = text[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
