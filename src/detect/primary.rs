use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

use crate::caption::{CaptionScanner, literal_token_regex, underscore_blank_regex};
use crate::normalize::continues_title_phrase;
use crate::infer::infer_type;
use crate::model::FieldType;

use super::config::{DetectorConfig, FieldHint};
use super::registry::Candidate;

#[derive(Debug)]
pub(super) struct PrimaryPatterns {
    bracketed: Regex,
    underscore_blank: Regex,
    literal_token: Regex,
    signature_bracket: Regex,
    signature_keyword: Option<Regex>,
    signature_labels: Vec<(String, Regex)>,
}

impl PrimaryPatterns {
    pub(super) fn new(config: &DetectorConfig) -> Result<Self> {
        let signature_keyword = if config.signature_keywords.is_empty() {
            None
        } else {
            let alternatives = config
                .signature_keywords
                .iter()
                .map(|keyword| regex::escape(keyword))
                .collect::<Vec<String>>()
                .join("|");
            Some(
                Regex::new(&format!("(?i)(?:{alternatives})"))
                    .context("failed to compile signature keyword regex")?,
            )
        };

        let mut signature_labels = Vec::with_capacity(config.signature_labels.len());
        for label in &config.signature_labels {
            let pattern = format!(r"(?i)\b{}\s*[:\x{{FF1A}}]", regex::escape(label));
            let regex = Regex::new(&pattern)
                .with_context(|| format!("failed to compile signature label regex for {label}"))?;
            signature_labels.push((label.clone(), regex));
        }

        Ok(Self {
            bracketed: Regex::new(r"\[([A-Za-z][^\]\n]{0,60})\]")
                .context("failed to compile bracketed token regex")?,
            underscore_blank: underscore_blank_regex()?,
            literal_token: literal_token_regex(&config.literal_token)?,
            signature_bracket: Regex::new(r"\[([A-Za-z][A-Za-z0-9 \-]{1,50})\]")
                .context("failed to compile signature bracket regex")?,
            signature_keyword,
            signature_labels,
        })
    }
}

fn collapse(value: &str) -> String {
    value.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// `[Company Name]`, `[COMPANY]`, `[name]` anywhere in the text.
pub(super) fn bracketed_tokens(text: &str, patterns: &PrimaryPatterns) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for captures in patterns.bracketed.captures_iter(text) {
        let label = collapse(&captures[1]);
        if label.is_empty() || !seen.insert(label.to_lowercase()) {
            continue;
        }
        let field_type = infer_type(&label);
        candidates.push(Candidate::new(label, field_type));
    }

    candidates
}

/// `$[_____] (the “Purchase Amount”)` and plain `[_____]` blanks followed by a caption.
///
/// `$` blanks are scanned first and always produce `currency`; each variant keeps its
/// own seen-set so one does not hide the other.
pub(super) fn underscore_blanks(
    text: &str,
    patterns: &PrimaryPatterns,
    captions: &CaptionScanner,
) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for currency_pass in [true, false] {
        for captures in patterns.underscore_blank.captures_iter(text) {
            if captures.get(1).is_some() != currency_pass {
                continue;
            }
            let Some(blank) = captures.get(0) else {
                continue;
            };
            let Some(caption) = captions.following(text, blank.end()) else {
                continue;
            };

            let namespace = if currency_pass { "currency" } else { "plain" };
            if !seen.insert(format!("{namespace}:{}", caption.label.to_lowercase())) {
                continue;
            }

            let field_type = if currency_pass {
                FieldType::Currency
            } else {
                infer_type(&caption.label)
            };
            candidates.push(Candidate::new(caption.label, field_type));
        }
    }

    candidates
}

/// `by QQQ (the "Discount Rate")` / `$QQQ (the "Post-Money Valuation Cap")`.
pub(super) fn captioned_literal_tokens(
    text: &str,
    patterns: &PrimaryPatterns,
    captions: &CaptionScanner,
) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for currency_pass in [false, true] {
        for captures in patterns.literal_token.captures_iter(text) {
            if captures.get(1).is_some() != currency_pass {
                continue;
            }
            let Some(token) = captures.get(0) else {
                continue;
            };
            let Some(caption) = captions.nearest(text, token.start(), token.end()) else {
                continue;
            };

            let namespace = if currency_pass { "token$" } else { "token" };
            if !seen.insert(format!("{namespace}:{}", caption.label.to_lowercase())) {
                continue;
            }

            let field_type = if currency_pass {
                FieldType::Currency
            } else {
                infer_type(&caption.label)
            };
            candidates.push(Candidate::new(caption.label, field_type));
        }
    }

    candidates
}

/// Signature placeholders read from the markup, where `[` and its label may sit in
/// separate runs that paragraph splitting would tear apart. A label line such as
/// `Name:` only counts when it is not the tail of a longer label like `Company Name:`.
pub(super) fn signature_block(html: &str, patterns: &PrimaryPatterns) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    if let Some(keyword) = &patterns.signature_keyword {
        for captures in patterns.signature_bracket.captures_iter(html) {
            let label = collapse(&captures[1]);
            if !keyword.is_match(&label) || !seen.insert(label.to_lowercase()) {
                continue;
            }
            let field_type = infer_type(&label);
            candidates.push(Candidate::new(label, field_type).optional());
        }
    }

    for (label, regex) in &patterns.signature_labels {
        let standalone = regex
            .find_iter(html)
            .any(|found| !continues_title_phrase(&html[..found.start()]));
        if standalone && seen.insert(label.to_lowercase()) {
            candidates.push(Candidate::new(label.clone(), infer_type(label)).optional());
        }
    }

    candidates
}

/// Well-known labels that must exist whenever the document mentions them.
pub(super) fn hint_ensures(text: &str, hints: &[FieldHint]) -> Vec<Candidate> {
    let lowered = text.to_lowercase();

    hints
        .iter()
        .filter(|hint| lowered.contains(&hint.label.to_lowercase()))
        .map(|hint| {
            let candidate = Candidate::new(hint.label.clone(), hint.field_type);
            if hint.required {
                candidate
            } else {
                candidate.optional()
            }
        })
        .collect()
}
