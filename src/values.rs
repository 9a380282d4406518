use std::collections::BTreeMap;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Field, FieldType};
use crate::validate::{ValidationError, validate_field};

/// Raw user answers keyed by field key. A missing or blank entry means unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(BTreeMap<String, String>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub percent: u8,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_answered(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Validates `raw` for `field` and stores it trimmed. A rejected value leaves the
    /// map untouched; an accepted empty answer to an optional field stores nothing.
    pub fn answer(&mut self, field: &Field, raw: &str) -> Result<(), ValidationError> {
        if let Some(error) = validate_field(field, raw) {
            return Err(error);
        }

        let value = raw.trim();
        if !value.is_empty() {
            self.0.insert(field.key.clone(), value.to_string());
        }
        Ok(())
    }

    /// Drops values whose key is no longer among `fields`, returning how many went.
    pub fn retain_fields(&mut self, fields: &[Field]) -> usize {
        let live = fields
            .iter()
            .map(|field| field.key.as_str())
            .collect::<HashSet<&str>>();
        let before = self.0.len();
        self.0.retain(|key, _| live.contains(key.as_str()));
        before - self.0.len()
    }

    /// First field at or after `from` still lacking a value.
    pub fn next_unanswered<'f>(&self, fields: &'f [Field], from: usize) -> Option<(usize, &'f Field)> {
        fields
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, field)| !self.is_answered(&field.key))
    }

    pub fn progress(&self, fields: &[Field]) -> Progress {
        let total = fields.len();
        let answered = fields
            .iter()
            .filter(|field| self.is_answered(&field.key))
            .count();
        let percent = if total == 0 {
            0
        } else {
            ((answered as f64 / total as f64) * 100.0).round() as u8
        };

        Progress {
            answered,
            total,
            percent,
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ValueMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Question asked when walking a user through unanswered fields.
pub fn prompt_for(field: &Field) -> String {
    match field.field_type {
        FieldType::Email => format!("What's the {}? (email)", field.label),
        FieldType::Date => format!("What's the {}? (date)", field.label),
        FieldType::Number => format!("What's the {}? (number)", field.label),
        FieldType::Currency => format!("What's the {}? (amount in USD)", field.label),
        FieldType::Choice if !field.options.is_empty() => {
            format!("Choose a {} ({}).", field.label, field.options.join(", "))
        }
        FieldType::Choice => format!("Choose a {}.", field.label),
        FieldType::Text => format!("What's the {}?", field.label),
    }
}

/// Example input shown next to the prompt.
pub fn input_hint(field: &Field) -> String {
    match field.field_type {
        FieldType::Email => "e.g., founder@company.com".to_string(),
        FieldType::Date => "YYYY-MM-DD".to_string(),
        FieldType::Number => "e.g., 1000000".to_string(),
        FieldType::Currency => "e.g., 250000".to_string(),
        FieldType::Text | FieldType::Choice => field.label.clone(),
    }
}
