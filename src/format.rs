use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};
use regex::Regex;

use crate::model::FieldType;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]").expect("valid non-numeric regex"));

const LONG_DATE_FORMAT: &str = "%B %-d, %Y";

/// Renders a raw value for display and merge. Never fails: anything that cannot be
/// parsed for its type comes back trimmed but otherwise unchanged.
pub fn format_by_type(field_type: FieldType, value: &str) -> String {
    let trimmed = value.trim();

    match field_type {
        FieldType::Currency => match parse_stripped_number(trimmed) {
            Some(amount) => format_currency(amount),
            None => trimmed.to_string(),
        },
        FieldType::Number => match parse_stripped_number(trimmed) {
            Some(number) => format_number(number),
            None => trimmed.to_string(),
        },
        FieldType::Date => match parse_calendar_date(trimmed) {
            Some(date) => date.format(LONG_DATE_FORMAT).to_string(),
            None => trimmed.to_string(),
        },
        FieldType::Text | FieldType::Email | FieldType::Choice => trimmed.to_string(),
    }
}

/// Drops everything except digits, `.` and `-`, then parses what is left.
pub(crate) fn parse_stripped_number(value: &str) -> Option<f64> {
    let stripped = NON_NUMERIC.replace_all(value, "");
    if stripped.is_empty() {
        return None;
    }

    stripped
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Strict calendar date: `YYYY-MM-DD`, an ISO date-time, or compact `YYYYMMDD`.
pub(crate) fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    if value.len() == 8 && value.chars().all(|character| character.is_ascii_digit()) {
        return NaiveDate::parse_from_str(value, "%Y%m%d").ok();
    }

    None
}

fn format_currency(amount: f64) -> String {
    let rendered = format!("{:.2}", amount.abs());
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    let sign = if amount < 0.0 && rendered != "0.00" { "-" } else { "" };

    format!("{sign}${}.{fraction}", group_thousands(integer))
}

fn format_number(number: f64) -> String {
    let rendered = format!("{:.3}", number.abs());
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let is_zero = integer.chars().all(|c| c == '0') && fraction.is_empty();
    let sign = if number < 0.0 && !is_zero { "-" } else { "" };

    if fraction.is_empty() {
        format!("{sign}{}", group_thousands(integer))
    } else {
        format!("{sign}{}.{fraction}", group_thousands(integer))
    }
}

fn group_thousands(digits: &str) -> String {
    match digits.parse::<u128>() {
        Ok(value) => value.to_formatted_string(&Locale::en),
        // Beyond u128 the digits are shown as-is.
        Err(_) => digits.to_string(),
    }
}
