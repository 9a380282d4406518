use regex::{Match, Regex};
use tracing::warn;

use crate::caption::CaptionScanner;
use crate::model::Field;
use crate::normalize::{continues_title_phrase, fold_label};

use super::rewrite;

/// Rewrites every placeholder naming `field` with `value`, which is already formatted
/// and escaped.
pub(super) fn apply(
    markup: &str,
    field: &Field,
    value: &str,
    captions: &CaptionScanner,
    underscore_blank: &Regex,
    literal_token: &Regex,
) -> (String, usize) {
    let mut current = markup.to_string();
    let mut total = 0;

    for pattern in token_patterns(field) {
        let Some(regex) = compile(&pattern, &field.key) else {
            continue;
        };
        let (next, replaced) = rewrite(&current, &regex, |captures| {
            Some(with_sigil(captures.get(1), value))
        });
        current = next;
        total += replaced;
    }

    if let Some(regex) = label_blank_pattern(field).and_then(|pattern| compile(&pattern, &field.key))
    {
        let (next, replaced) = rewrite(&current, &regex, |captures| {
            let whole = captures.get(0)?;
            if continues_title_phrase(&current[..whole.start()]) {
                return None;
            }
            Some(format!("{}{value}", &captures[1]))
        });
        current = next;
        total += replaced;
    }

    let target = fold_label(&field.label);
    if target.is_empty() {
        return (current, total);
    }

    let (next, replaced) = rewrite(&current, underscore_blank, |captures| {
        let blank = captures.get(0)?;
        let caption = captions.following(&current, blank.end())?;
        (fold_label(&caption.label) == target).then(|| with_sigil(captures.get(1), value))
    });
    current = next;
    total += replaced;

    let (next, replaced) = rewrite(&current, literal_token, |captures| {
        let token = captures.get(0)?;
        let caption = captions.nearest(&current, token.start(), token.end())?;
        (fold_label(&caption.label) == target).then(|| with_sigil(captures.get(1), value))
    });
    total += replaced;

    (next, total)
}

/// `{{key}}`, `{{Label}}`, `[[key]]`, `[[Label]]`, `[LABEL]` and `[Label]`, each with
/// an optional `$` sigil in group 1. Label tokens may wrap their text in inline tags.
fn token_patterns(field: &Field) -> Vec<String> {
    let key = regex::escape(&field.key);
    let tags = INLINE_TAGS;
    let mut patterns = vec![
        format!(r"(?i)(\$\s*)?\{{\{{\s*{key}\s*\}}\}}"),
        format!(r"(?i)(\$\s*)?\[\[\s*{key}\s*\]\]"),
    ];

    if let Some(label) = phrase(&field.label) {
        patterns.push(format!(r"(?i)(\$\s*)?\{{\{{\s*{tags}{label}\s*{tags}\}}\}}"));
        patterns.push(format!(r"(?i)(\$\s*)?\[\[\s*{tags}{label}\s*{tags}\]\]"));
    }
    if let Some(upper) = phrase(&field.label.to_uppercase()) {
        patterns.push(format!(r"(\$\s*)?\[\s*{tags}{upper}\s*{tags}\]"));
    }
    if let Some(label) = phrase(&field.label) {
        patterns.push(format!(r"(?i)(\$\s*)?\[\s*{tags}{label}\s*{tags}\]"));
    }

    patterns
}

/// `Label: ____`, `Label – ____`; group 1 keeps the label and its punctuation.
fn label_blank_pattern(field: &Field) -> Option<String> {
    let label = phrase(&field.label)?;
    let boundary = if field.label.trim_start().starts_with(char::is_alphanumeric) {
        r"\b"
    } else {
        ""
    };
    Some(format!(
        r"(?i)({boundary}{label}(?:\s|&nbsp;)*[:\-\x{{2013}}\x{{2014}}]?(?:\s|&nbsp;)*)(?:\[_{{3,}}\]|_{{3,}})"
    ))
}

// Opening or closing tags, such as `<strong>`, hugging the label inside its brackets.
const INLINE_TAGS: &str = r"(?:<[^>]*>\s*)*";

// Words escaped individually so any run of whitespace or `&nbsp;` between them still
// matches.
fn phrase(text: &str) -> Option<String> {
    let words = text
        .split_whitespace()
        .map(markup_literal)
        .collect::<Vec<String>>();
    (!words.is_empty()).then(|| words.join(r"(?:\s|&nbsp;)+"))
}

// Characters the markup stores as entities match either spelling.
fn markup_literal(word: &str) -> String {
    let mut pattern = String::with_capacity(word.len());
    for ch in word.chars() {
        match ch {
            '&' => pattern.push_str("(?:&amp;|&)"),
            '<' => pattern.push_str("(?:&lt;|<)"),
            '>' => pattern.push_str("(?:&gt;|>)"),
            '"' => pattern.push_str("(?:&quot;|\")"),
            '\'' => pattern.push_str("(?:&#39;|')"),
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern
}

fn compile(pattern: &str, key: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(regex) => Some(regex),
        Err(error) => {
            warn!(key, %error, "skipping merge pattern");
            None
        }
    }
}

// A `$` in front of the blank survives unless the value brings its own.
fn with_sigil(sigil: Option<Match<'_>>, value: &str) -> String {
    match sigil {
        Some(sigil) if !value.trim_start_matches('-').starts_with('$') => {
            format!("{}{value}", sigil.as_str())
        }
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_characters_match_either_spelling() {
        let pattern = phrase("Fees & Costs").expect("phrase");
        let regex = Regex::new(&format!("^{pattern}$")).expect("regex");
        assert!(regex.is_match("Fees &amp; Costs"));
        assert!(regex.is_match("Fees & Costs"));
        assert!(regex.is_match("Fees&nbsp;&amp;  Costs"));
        assert!(!regex.is_match("Fees and Costs"));
    }

    #[test]
    fn plain_words_are_escaped() {
        assert_eq!(markup_literal("a.b"), r"a\.b");
        assert_eq!(phrase("   "), None);
    }
}
