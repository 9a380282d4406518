use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

use crate::infer::infer_type;
use crate::keys::{fallback_key, to_label};
use crate::model::FieldType;

use super::config::DetectorConfig;
use super::registry::Candidate;

const GENERIC_LABEL: &str = "Fill Field";
const MAX_HINT_CHARS: usize = 60;
const MIN_CAPS_PHRASE_CHARS: usize = 6;
const MAX_CAPS_PHRASE_CHARS: usize = 60;

#[derive(Debug)]
pub(super) struct RecallPatterns {
    double_braced: Regex,
    double_bracketed: Regex,
    caps_prompt: Regex,
    blank_line: Regex,
    blank_run: Regex,
    hint_punctuation: Regex,
    caps_phrase: Regex,
    boilerplate: HashSet<String>,
    entity_word: Option<Regex>,
    variable_phrase: Option<Regex>,
}

impl RecallPatterns {
    pub(super) fn new(config: &DetectorConfig) -> Result<Self> {
        Ok(Self {
            double_braced: Regex::new(r"\{\{\s*([A-Za-z0-9_. -]{2,60})\s*\}\}")
                .context("failed to compile double-brace regex")?,
            double_bracketed: Regex::new(r"\[\[\s*([A-Za-z0-9_. -]{2,60})\s*\]\]")
                .context("failed to compile double-bracket regex")?,
            caps_prompt: Regex::new(r"\[([A-Z][A-Z0-9 _\-]{2,60})\]")
                .context("failed to compile caps prompt regex")?,
            blank_line: Regex::new(r"(?:^| )_{3,}(?: |$)")
                .context("failed to compile blank line regex")?,
            blank_run: Regex::new(r"_{3,}").context("failed to compile blank run regex")?,
            hint_punctuation: Regex::new(r"[:\-\x{2013}]+")
                .context("failed to compile hint punctuation regex")?,
            caps_phrase: Regex::new(r"\b([A-Z][A-Z]+(?: [A-Z][A-Z]+){1,5})\b")
                .context("failed to compile caps phrase regex")?,
            boilerplate: config.boilerplate_phrases.iter().cloned().collect(),
            entity_word: word_alternation(&config.entity_words)
                .context("failed to compile entity word regex")?,
            variable_phrase: word_alternation(&config.variable_phrases)
                .context("failed to compile variable phrase regex")?,
        })
    }
}

fn word_alternation(words: &[String]) -> Result<Option<Regex>, regex::Error> {
    if words.is_empty() {
        return Ok(None);
    }
    let alternatives = words
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<String>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternatives})\b")).map(Some)
}

fn labelled(raw: &str) -> Option<Candidate> {
    let label = to_label(raw.trim());
    if label.is_empty() {
        return None;
    }
    let field_type = infer_type(&label);
    Some(Candidate::new(label, field_type))
}

/// `{{variable}}` then `[[variable]]`.
pub(super) fn variable_tokens(text: &str, patterns: &RecallPatterns) -> Vec<Candidate> {
    patterns
        .double_braced
        .captures_iter(text)
        .chain(patterns.double_bracketed.captures_iter(text))
        .filter_map(|captures| labelled(&captures[1]))
        .collect()
}

/// Upper-case bracket prompts such as `[COMPANY NAME]` or `[STATE OF INCORPORATION]`.
pub(super) fn caps_prompts(text: &str, patterns: &RecallPatterns) -> Vec<Candidate> {
    patterns
        .caps_prompt
        .captures_iter(text)
        .filter_map(|captures| labelled(&captures[1]))
        .collect()
}

/// Lines carrying a bare underline blank. The rest of the line names the field; when
/// nothing usable is left the blank becomes a generic field with a generated key.
pub(super) fn underline_lines(text: &str, patterns: &RecallPatterns) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if !patterns.blank_line.is_match(line) {
            continue;
        }

        let without_blanks = patterns.blank_run.replace_all(line, "");
        let hint = patterns.hint_punctuation.replace_all(&without_blanks, "");
        let hint = hint.trim();

        let candidate = if !hint.is_empty() && hint.chars().count() <= MAX_HINT_CHARS {
            labelled(hint)
        } else {
            None
        };

        candidates.push(candidate.unwrap_or_else(|| {
            Candidate::new(GENERIC_LABEL, FieldType::Text)
                .keyed(fallback_key(&format!("blank-line:{index}:{line}")))
        }));
    }

    candidates
}

/// ALL-CAPS multi-word phrases. Boilerplate and headings are filtered out; phrases that
/// mention a party or document part only survive when they also name a variable.
pub(super) fn caps_phrases(text: &str, patterns: &RecallPatterns) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for captures in patterns.caps_phrase.captures_iter(text) {
        let phrase = &captures[1];
        if patterns.boilerplate.contains(phrase) {
            continue;
        }

        let length = phrase.chars().count();
        if !(MIN_CAPS_PHRASE_CHARS..=MAX_CAPS_PHRASE_CHARS).contains(&length) {
            continue;
        }

        let mentions_entity = patterns
            .entity_word
            .as_ref()
            .is_some_and(|regex| regex.is_match(phrase));
        let names_variable = patterns
            .variable_phrase
            .as_ref()
            .is_some_and(|regex| regex.is_match(phrase));
        if mentions_entity && !names_variable {
            continue;
        }

        if let Some(candidate) = labelled(phrase) {
            candidates.push(candidate);
        }
    }

    candidates
}
