//! Heuristic placeholder detection.
//!
//! Passes run in a fixed order and feed one [`FieldRegistry`]; the first pass to
//! produce a key owns that field.

use anyhow::Result;
use tracing::debug;

use crate::caption::CaptionScanner;
use crate::model::Field;

mod config;
mod primary;
mod recall;
mod registry;

pub use config::{DetectionProfile, DetectorConfig, FieldHint};
pub use registry::{Candidate, FieldRegistry};

use primary::PrimaryPatterns;
use recall::RecallPatterns;

#[derive(Debug)]
pub struct Detector {
    config: DetectorConfig,
    captions: CaptionScanner,
    primary: PrimaryPatterns,
    recall: RecallPatterns,
}

impl Detector {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        Ok(Self {
            captions: CaptionScanner::new(config.caption_window),
            primary: PrimaryPatterns::new(&config)?,
            recall: RecallPatterns::new(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn profile(&self) -> DetectionProfile {
        self.config.profile
    }

    /// Runs the configured passes. `html` is only read by the signature pass; everything
    /// else scans the normalized `text`.
    pub fn detect(&self, html: &str, text: &str) -> Vec<Field> {
        let mut registry = FieldRegistry::new();

        if self.config.profile.runs_primary() {
            record(
                &mut registry,
                "bracketed",
                primary::bracketed_tokens(text, &self.primary),
            );
            record(
                &mut registry,
                "underscore_blanks",
                primary::underscore_blanks(text, &self.primary, &self.captions),
            );
            record(
                &mut registry,
                "literal_tokens",
                primary::captioned_literal_tokens(text, &self.primary, &self.captions),
            );
            record(
                &mut registry,
                "signature_block",
                primary::signature_block(html, &self.primary),
            );
            record(
                &mut registry,
                "hints",
                primary::hint_ensures(text, &self.config.hints),
            );
        }

        if self.config.profile.runs_recall() {
            record(
                &mut registry,
                "variable_tokens",
                recall::variable_tokens(text, &self.recall),
            );
            record(
                &mut registry,
                "caps_prompts",
                recall::caps_prompts(text, &self.recall),
            );
            record(
                &mut registry,
                "underline_lines",
                recall::underline_lines(text, &self.recall),
            );
            record(
                &mut registry,
                "caps_phrases",
                recall::caps_phrases(text, &self.recall),
            );
        }

        debug!(
            profile = self.config.profile.as_str(),
            fields = registry.len(),
            "detection complete"
        );
        registry.into_fields()
    }
}

fn record(registry: &mut FieldRegistry, pass: &str, candidates: Vec<Candidate>) {
    let found = candidates.len();
    let added = registry.extend(candidates);
    debug!(pass, found, added, "detection pass complete");
}

/// Default-profile detection over a conversion result.
pub fn detect(html: &str, text: &str) -> Result<Vec<Field>> {
    Ok(Detector::new(DetectorConfig::default())?.detect(html, text))
}

/// Recall-profile detection over plain text: variables, caps prompts, blank lines and
/// ALL-CAPS phrases.
pub fn detect_placeholders(text: &str) -> Result<Vec<Field>> {
    let config = DetectorConfig::default().with_profile(DetectionProfile::Recall);
    Ok(Detector::new(config)?.detect("", text))
}
