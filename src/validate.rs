use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::format::{parse_calendar_date, parse_stripped_number};
use crate::model::{Field, FieldType};

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static SLASH_DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{2,4}$").expect("valid slash date regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Required,
    InvalidEmail,
    InvalidNumber,
    InvalidAmount,
    InvalidDate,
}

impl ValidationError {
    pub fn message(self) -> &'static str {
        match self {
            ValidationError::Required => "This field is required.",
            ValidationError::InvalidEmail => "Please enter a valid email.",
            ValidationError::InvalidNumber => "Please enter a valid number.",
            ValidationError::InvalidAmount => "Please enter a valid amount.",
            ValidationError::InvalidDate => {
                "Please enter a valid date (YYYY-MM-DD or MM/DD/YYYY)."
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Checks a raw value against a type. Empty input is always `Required` here; use
/// [`validate_field`] when the field may be optional.
pub fn validate_by_type(field_type: FieldType, value: &str) -> Option<ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Some(ValidationError::Required);
    }

    match field_type {
        FieldType::Email => (!EMAIL_SHAPE.is_match(value)).then_some(ValidationError::InvalidEmail),
        FieldType::Number => parse_stripped_number(value)
            .is_none()
            .then_some(ValidationError::InvalidNumber),
        FieldType::Currency => parse_stripped_number(value)
            .is_none()
            .then_some(ValidationError::InvalidAmount),
        FieldType::Date => {
            let accepted =
                parse_calendar_date(value).is_some() || SLASH_DATE_SHAPE.is_match(value);
            (!accepted).then_some(ValidationError::InvalidDate)
        }
        FieldType::Text | FieldType::Choice => None,
    }
}

pub fn validate_field(field: &Field, value: &str) -> Option<ValidationError> {
    if !field.required && value.trim().is_empty() {
        return None;
    }
    validate_by_type(field.field_type, value)
}
