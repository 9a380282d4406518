use std::collections::HashMap;

use crate::keys::to_key;
use crate::model::{Field, FieldType};

/// One proposed field from a detection pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Set only when the key cannot come from the label (generic blanks).
    pub key: Option<String>,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
}

impl Candidate {
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: None,
            label: label.into(),
            field_type,
            required: true,
        }
    }

    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn resolved_key(&self) -> String {
        self.key.clone().unwrap_or_else(|| to_key(&self.label))
    }
}

/// Insertion-ordered field map where the first candidate for a key wins.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns `true` when the candidate introduced a new key.
    pub fn insert(&mut self, candidate: Candidate) -> bool {
        let key = candidate.resolved_key();
        if self.index.contains_key(&key) {
            return false;
        }

        let mut field = Field::new(key.clone(), candidate.label, candidate.field_type);
        field.required = candidate.required;
        self.index.insert(key, self.fields.len());
        self.fields.push(field);
        true
    }

    /// Inserts every candidate, returning how many were new.
    pub fn extend<I: IntoIterator<Item = Candidate>>(&mut self, candidates: I) -> usize {
        let mut added = 0;
        for candidate in candidates {
            if self.insert(candidate) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_writer_wins_and_order_is_kept() {
        let mut registry = FieldRegistry::new();
        assert!(registry.insert(Candidate::new("Purchase Amount", FieldType::Currency)));
        assert!(registry.insert(Candidate::new("Company", FieldType::Text).optional()));
        assert!(!registry.insert(Candidate::new("purchase amount", FieldType::Text).optional()));

        let fields = registry.into_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].key, "purchase_amount");
        assert_eq!(fields[0].field_type, FieldType::Currency);
        assert!(fields[0].required);
        assert_eq!(fields[1].key, "company");
        assert!(!fields[1].required);
    }

    #[test]
    fn explicit_keys_bypass_label_normalization() {
        let mut registry = FieldRegistry::new();
        registry.insert(Candidate::new("Fill Field", FieldType::Text).keyed("field_abc"));
        assert!(registry.contains_key("field_abc"));
        assert!(!registry.contains_key("fill_field"));
    }

    #[test]
    fn extend_counts_new_keys_only() {
        let mut registry = FieldRegistry::new();
        let added = registry.extend([
            Candidate::new("Name", FieldType::Text),
            Candidate::new("NAME", FieldType::Text),
            Candidate::new("Title", FieldType::Text),
        ]);
        assert_eq!(added, 2);
        assert_eq!(registry.len(), 2);
    }
}
