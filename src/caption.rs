use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

/// How far (in characters) a caption may sit from the blank or token it names.
pub const CAPTION_WINDOW: usize = 120;

/// Underscore blank, optionally bracketed, with an optional `$` sigil in group 1.
pub fn underscore_blank_regex() -> Result<Regex> {
    Regex::new(r"(\$\s*)?(\[_{3,}\]|_{3,})").context("failed to compile underscore blank regex")
}

/// Reserved literal token (e.g. `QQQ`) with an optional `$` sigil in group 1.
pub fn literal_token_regex(token: &str) -> Result<Regex> {
    Regex::new(&format!(r"(\$\s*)?\b{}\b", regex::escape(token)))
        .with_context(|| format!("failed to compile literal token regex for {token:?}"))
}

// Quoted captions (`the “Purchase Amount”`) or bare parentheticals (`(the Purchase Amount)`).
// Inline tags are tolerated so the same pattern works on markup and on normalized text.
static CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?:(?i:the)\s+(?:<[^>]*>\s*)*)?[\x{201C}"](?:\s*<[^>]*>)*\s*([A-Za-z][A-Za-z0-9 \-]{0,60}?)\s*(?:<[^>]*>\s*)*[\x{201D}"]"#,
        r"|\(\s*(?i:the)\s+([A-Za-z][A-Za-z0-9 \-]{0,60}?)\s*\)",
    ))
    .expect("valid caption regex")
});

// Headroom beyond the window when looking backwards, so a caption that ends inside the
// window but starts before it is still seen whole.
const LOOKBEHIND_SLACK: usize = 96;
// Longest caption, inline tags included, that can still start inside the window.
const LOOKAHEAD_SLACK: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct CaptionScanner {
    window: usize,
}

impl Default for CaptionScanner {
    fn default() -> Self {
        Self::new(CAPTION_WINDOW)
    }
}

impl CaptionScanner {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// First caption starting at most `window` characters after byte offset `from`.
    pub fn following(&self, haystack: &str, from: usize) -> Option<Caption> {
        let tail = haystack.get(from..)?;
        let region = &tail[..char_offset_forward(tail, self.window + LOOKAHEAD_SLACK)];
        for captures in CAPTION.captures_iter(region) {
            let whole = captures.get(0)?;
            if region[..whole.start()].chars().count() > self.window {
                return None;
            }
            if inside_attribute(region, whole.start()) {
                continue;
            }
            if let Some(label) = caption_label(&captures) {
                return Some(Caption {
                    label,
                    start: from + whole.start(),
                    end: from + whole.end(),
                });
            }
        }
        None
    }

    /// Last caption ending at most `window` characters before byte offset `to`.
    pub fn preceding(&self, haystack: &str, to: usize) -> Option<Caption> {
        let head = haystack.get(..to)?;
        let offset = char_offset_back(head, self.window + LOOKBEHIND_SLACK);
        let region = &head[offset..];

        let mut best = None;
        for captures in CAPTION.captures_iter(region) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if region[whole.end()..].chars().count() > self.window
                || inside_attribute(region, whole.start())
            {
                continue;
            }
            if let Some(label) = caption_label(&captures) {
                best = Some(Caption {
                    label,
                    start: offset + whole.start(),
                    end: offset + whole.end(),
                });
            }
        }
        best
    }

    /// Caption after the span, or failing that, before it.
    pub fn nearest(&self, haystack: &str, start: usize, end: usize) -> Option<Caption> {
        self.following(haystack, end)
            .or_else(|| self.preceding(haystack, start))
    }
}

fn caption_label(captures: &Captures<'_>) -> Option<String> {
    let raw = captures.get(1).or_else(|| captures.get(2))?.as_str();
    let label = raw.split_whitespace().collect::<Vec<&str>>().join(" ");
    (!label.is_empty()).then_some(label)
}

// `class="x"` style attribute values look like quoted captions.
fn inside_attribute(haystack: &str, quote_start: usize) -> bool {
    haystack[..quote_start].trim_end().ends_with('=')
}

fn char_offset_forward(text: &str, count: usize) -> usize {
    text.char_indices()
        .nth(count)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

fn char_offset_back(text: &str, count: usize) -> usize {
    text.char_indices()
        .rev()
        .nth(count.saturating_sub(1))
        .map(|(index, _)| index)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_quoted_caption_after_blank() {
        let text = "the sum of $[_____] (the \u{201C}Purchase Amount\u{201D}) on or about";
        let scanner = CaptionScanner::default();
        let caption = scanner.following(text, text.find(']').expect("blank") + 1);
        assert_eq!(caption.map(|c| c.label), Some("Purchase Amount".to_string()));
    }

    #[test]
    fn finds_bare_parenthetical_caption() {
        let text = "QQQ (the Valuation Cap) applies";
        let caption = CaptionScanner::default().following(text, 3);
        assert_eq!(caption.map(|c| c.label), Some("Valuation Cap".to_string()));
    }

    #[test]
    fn ignores_captions_beyond_window() {
        let text = format!("____{} (the \"Purchase Amount\")", " ".repeat(130));
        assert!(CaptionScanner::default().following(&text, 4).is_none());
        assert!(CaptionScanner::new(200).following(&text, 4).is_some());
    }

    #[test]
    fn following_only_scans_near_the_blank() {
        let far = format!("____{} (the \"Late Caption\")", " x".repeat(5_000));
        assert!(CaptionScanner::default().following(&far, 4).is_none());

        let styled = format!(
            "____{}(the \u{201C}<span style=\"{}\">Closing Date</span>\u{201D})",
            " ".repeat(110),
            "a".repeat(80)
        );
        let caption = CaptionScanner::default().following(&styled, 4);
        assert_eq!(caption.map(|c| c.label), Some("Closing Date".to_string()));
    }

    #[test]
    fn char_offsets_respect_multibyte_text() {
        let text = "\u{201C}ab";
        assert_eq!(char_offset_forward(text, 1), 3);
        assert_eq!(char_offset_forward(text, 10), text.len());
    }

    #[test]
    fn tolerates_inline_markup() {
        let html = "$[____] (the \u{201C}<strong>Purchase Amount</strong>\u{201D})";
        let caption = CaptionScanner::default().following(html, 7);
        assert_eq!(caption.map(|c| c.label), Some("Purchase Amount".to_string()));
    }

    #[test]
    fn skips_attribute_values() {
        let html = "____ <span class=\"Note\">x</span> (the \"Closing Date\")";
        let caption = CaptionScanner::default().following(html, 4);
        assert_eq!(caption.map(|c| c.label), Some("Closing Date".to_string()));
    }

    #[test]
    fn preceding_returns_closest_caption() {
        let text = "the \"Discount Rate\" and the \"Valuation Cap\" equal QQQ";
        let to = text.find("QQQ").expect("token");
        let caption = CaptionScanner::default().preceding(text, to);
        assert_eq!(caption.map(|c| c.label), Some("Valuation Cap".to_string()));
    }
}
