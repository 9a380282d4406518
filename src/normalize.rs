use std::sync::LazyLock;

use regex::Regex;

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</p\s*>|<br\s*/?>").expect("valid paragraph break regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid horizontal space regex"));

/// Converts template markup into the plain-text scanning surface used by the detector.
///
/// Paragraph ends and line breaks become newlines, every other tag is dropped,
/// non-breaking spaces become ordinary spaces and runs of spaces/tabs collapse to one.
pub fn html_to_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let with_breaks = PARAGRAPH_BREAK.replace_all(html, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    let decoded = decode_basic_entities(&stripped);
    HORIZONTAL_SPACE
        .replace_all(&decoded, " ")
        .trim()
        .to_string()
}

fn decode_basic_entities(input: &str) -> String {
    // &amp; goes last so "&amp;lt;" stays a literal "&lt;".
    input
        .replace('\u{00A0}', " ")
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Escapes text for insertion into markup.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Lowercased, whitespace-collapsed form used to compare labels.
pub fn fold_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

/// Whether a label starting right after `before` would only be the tail of a longer
/// capitalized label, as `Name` is in `Company Name`.
pub(crate) fn continues_title_phrase(before: &str) -> bool {
    let trimmed = before.trim_end_matches([' ', '\t', '\u{00A0}']);
    let word = trimmed.rsplit(char::is_whitespace).next().unwrap_or("");
    let word = word.rsplit('>').next().unwrap_or(word);

    word.chars().last().is_some_and(char::is_alphanumeric)
        && word
            .chars()
            .next()
            .is_some_and(|first| first.is_uppercase() || first.is_ascii_digit())
}
