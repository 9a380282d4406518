use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::caption::CAPTION_WINDOW;
use crate::model::FieldType;
use crate::util::read_json;

/// Which pass families a [`super::Detector`] runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionProfile {
    /// Bracketed tokens, captioned blanks and literal tokens, signature block, hints.
    #[default]
    Primary,
    /// Mustache/double-bracket variables, ALL-CAPS phrases and bare underline lines.
    Recall,
    /// `Primary` followed by `Recall`; the recall passes only add unseen keys.
    Combined,
}

impl DetectionProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionProfile::Primary => "primary",
            DetectionProfile::Recall => "recall",
            DetectionProfile::Combined => "combined",
        }
    }

    pub(super) fn runs_primary(self) -> bool {
        matches!(self, DetectionProfile::Primary | DetectionProfile::Combined)
    }

    pub(super) fn runs_recall(self) -> bool {
        matches!(self, DetectionProfile::Recall | DetectionProfile::Combined)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHint {
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "hint_required_default")]
    pub required: bool,
}

fn hint_required_default() -> bool {
    true
}

impl FieldHint {
    fn new(label: &str, field_type: FieldType, required: bool) -> Self {
        Self {
            label: label.to_string(),
            field_type,
            required,
        }
    }
}

/// Immutable tables and tunables for detection. Loaded once and shared by reference,
/// so concurrent detections never see each other's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub profile: DetectionProfile,
    pub caption_window: usize,
    /// Reserved literal standing in for a value, e.g. `by QQQ (the "Discount Rate")`.
    pub literal_token: String,
    pub signature_keywords: Vec<String>,
    pub signature_labels: Vec<String>,
    pub hints: Vec<FieldHint>,
    /// ALL-CAPS phrases that are never fields.
    pub boilerplate_phrases: Vec<String>,
    /// Words marking an ALL-CAPS phrase as a heading or party reference...
    pub entity_words: Vec<String>,
    /// ...unless the phrase also names one of these.
    pub variable_phrases: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            profile: DetectionProfile::Primary,
            caption_window: CAPTION_WINDOW,
            literal_token: "QQQ".to_string(),
            signature_keywords: strings(&["company", "name", "title"]),
            signature_labels: strings(&["Address", "Email", "Name", "Title"]),
            hints: vec![
                FieldHint::new("Post-Money Valuation Cap", FieldType::Currency, true),
                FieldHint::new("Purchase Amount", FieldType::Currency, true),
                FieldHint::new("Date of Safe", FieldType::Date, true),
                FieldHint::new("State of Incorporation", FieldType::Text, false),
                FieldHint::new("Governing Law Jurisdiction", FieldType::Text, false),
            ],
            boilerplate_phrases: strings(&[
                "THIS AGREEMENT",
                "THE COMPANY",
                "THE INVESTOR",
                "GOVERNING LAW",
                "ENTIRE AGREEMENT",
                "LIMITATION OF LIABILITY",
                "CONFIDENTIAL INFORMATION",
            ]),
            entity_words: strings(&[
                "AMENDMENT",
                "SECTION",
                "EXHIBIT",
                "SCHEDULE",
                "AGREEMENT",
                "SAFE",
                "COMPANY",
                "INVESTOR",
                "PARTY",
                "LAW",
                "STATE",
                "COUNTY",
            ]),
            variable_phrases: strings(&[
                "COMPANY NAME",
                "INVESTOR NAME",
                "ADDRESS",
                "STATE",
                "DATE",
                "SIGNATURE",
                "TITLE",
                "EMAIL",
                "VALUATION CAP",
                "PURCHASE AMOUNT",
            ]),
        }
    }
}

impl DetectorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        read_json(path)
    }

    pub fn with_profile(mut self, profile: DetectionProfile) -> Self {
        self.profile = profile;
        self
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
