use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::detect::Detector;
use crate::normalize::html_to_text;
use crate::util::sha256_hex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Date,
    Number,
    Currency,
    Choice,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Choice => "choice",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "email" => Ok(FieldType::Email),
            "date" => Ok(FieldType::Date),
            "number" => Ok(FieldType::Number),
            "currency" => Ok(FieldType::Currency),
            "choice" => Ok(FieldType::Choice),
            other => bail!("unknown field type: {other}"),
        }
    }
}

fn default_required() -> bool {
    true
}

/// A fillable slot discovered in a template.
///
/// `key` is derived from the label text that produced the field, so two labels that
/// normalize to the same key describe the same field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Field {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            required: true,
            options: Vec::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Explicit type override, the way an editing collaborator retypes a field.
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        if field_type != FieldType::Choice {
            self.options.clear();
        }
        self
    }

    /// Turns the field into a `choice` with the given ordered options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_type = FieldType::Choice;
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub html: String,
    pub text: String,
    pub fields: Vec<Field>,
}

impl Template {
    /// Builds a template from a conversion result. When `text` is absent the scanning
    /// surface is derived from the markup.
    pub fn build(html: &str, text: Option<&str>, detector: &Detector) -> Result<Self> {
        if html.trim().is_empty() {
            bail!("template markup is empty");
        }

        let text = match text {
            Some(value) => value.to_string(),
            None => html_to_text(html),
        };
        let fields = detector.detect(html, &text);

        Ok(Self {
            id: template_id(html),
            html: html.to_string(),
            text,
            fields,
        })
    }
}

pub fn template_id(html: &str) -> String {
    let digest = sha256_hex(html.as_bytes());
    format!("tpl-{}", &digest[..16])
}

/// Fields a caller offers when detection finds nothing.
pub fn starter_fields() -> Vec<Field> {
    vec![
        Field::new("company_name", "Company Name", FieldType::Text),
        Field::new("state", "Incorporation State", FieldType::Text),
    ]
}
