use anyhow::{Context, Result};
use regex::Regex;

use crate::normalize::fold_label;

use super::{Filled, rewrite};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SharedRole {
    Company,
    Name,
    Title,
    Address,
    Email,
}

impl SharedRole {
    fn for_label(label: &str) -> Option<Self> {
        match fold_label(label).as_str() {
            "company" | "[company]" => Some(Self::Company),
            "name" | "[name]" => Some(Self::Name),
            "title" | "[title]" => Some(Self::Title),
            "address" => Some(Self::Address),
            "email" => Some(Self::Email),
            _ => None,
        }
    }
}

/// `[COMPANY]`/`[name]`/`[title]` tokens and `Name:`-style signature lines.
#[derive(Debug)]
pub(super) struct SignaturePatterns {
    company_token: Regex,
    name_token: Regex,
    title_token: Regex,
    name_line: Regex,
    title_line: Regex,
    address_line: Regex,
    email_line: Regex,
}

impl SignaturePatterns {
    pub(super) fn new() -> Result<Self> {
        Ok(Self {
            company_token: token_regex("company")?,
            name_token: token_regex("name")?,
            title_token: token_regex("title")?,
            name_line: line_regex("Name")?,
            title_line: line_regex("Title")?,
            address_line: line_regex("Address")?,
            email_line: line_regex("Email")?,
        })
    }

    fn token(&self, role: SharedRole) -> Option<&Regex> {
        match role {
            SharedRole::Company => Some(&self.company_token),
            SharedRole::Name => Some(&self.name_token),
            SharedRole::Title => Some(&self.title_token),
            SharedRole::Address | SharedRole::Email => None,
        }
    }

    fn line(&self, role: SharedRole) -> Option<&Regex> {
        match role {
            SharedRole::Company => None,
            SharedRole::Name => Some(&self.name_line),
            SharedRole::Title => Some(&self.title_line),
            SharedRole::Address => Some(&self.address_line),
            SharedRole::Email => Some(&self.email_line),
        }
    }
}

fn token_regex(word: &str) -> Result<Regex> {
    Regex::new(&format!(r"(?i)\[\s*{word}\s*\]"))
        .with_context(|| format!("failed to compile signature token regex for {word}"))
}

// Group 1 is the label with its colon, group 2 the spacing after it, group 3 the blank.
fn line_regex(label: &str) -> Result<Regex> {
    Regex::new(&format!(
        r"(?i)\b({label}\s*[:\x{{FF1A}}])((?:[ \t\x{{A0}}]|&nbsp;)*)(\[_{{3,}}\]|_{{3,}})?"
    ))
    .with_context(|| format!("failed to compile signature line regex for {label}"))
}

const RUN_BREAKS: &[&str] = &["</p", "</td", "</th", "</li", "</div", "</h", "<br", "<p", "<td"];

/// Copies signature-block values onto every `[COMPANY]`/`[name]`/`[title]` token and every
/// empty `Name:`/`Title:`/`Address:`/`Email:` line still left in the markup.
pub(super) fn broadcast(
    markup: &str,
    filled: &[Filled<'_>],
    patterns: &SignaturePatterns,
) -> (String, usize) {
    let mut current = markup.to_string();
    let mut total = 0;

    for entry in filled {
        let Some(role) = SharedRole::for_label(&entry.field.label) else {
            continue;
        };
        let value = entry.value.as_str();

        if let Some(token) = patterns.token(role) {
            let (next, replaced) = rewrite(&current, token, |_| Some(value.to_string()));
            current = next;
            total += replaced;
        }

        if let Some(line) = patterns.line(role) {
            let (next, replaced) = rewrite(&current, line, |captures| {
                let whole = captures.get(0)?;
                if !opens_run(&current[..whole.start()]) {
                    return None;
                }
                let spacing = match &captures[2] {
                    "" => " ",
                    spacing => spacing,
                };
                if captures.get(3).is_none() && !run_is_blank(&current[whole.end()..]) {
                    return None;
                }
                Some(format!("{}{spacing}{value}", &captures[1]))
            });
            current = next;
            total += replaced;
        }
    }

    (current, total)
}

// The label must start its line or cell, so `Company Name:` is not taken for `Name:`.
fn opens_run(before: &str) -> bool {
    let before = before.trim_end_matches([' ', '\t', '\u{A0}']);
    before.is_empty() || before.ends_with('>') || before.ends_with('\n')
}

// Nothing but tags, spaces and `&nbsp;` before the run ends.
fn run_is_blank(rest: &str) -> bool {
    let mut remaining = rest;
    loop {
        remaining = remaining.trim_start_matches([' ', '\t', '\u{A0}']);
        if remaining.is_empty() || remaining.starts_with(['\n', '\r']) {
            return true;
        }
        if let Some(after) = remaining.strip_prefix("&nbsp;") {
            remaining = after;
            continue;
        }
        if !remaining.starts_with('<') {
            return false;
        }
        if RUN_BREAKS
            .iter()
            .any(|tag| starts_with_ignore_case(remaining, tag))
        {
            return true;
        }
        match remaining.find('>') {
            Some(end) => remaining = &remaining[end + 1..],
            None => return true,
        }
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_match_exact_folded_labels() {
        assert_eq!(SharedRole::for_label(" Name "), Some(SharedRole::Name));
        assert_eq!(SharedRole::for_label("[COMPANY]"), Some(SharedRole::Company));
        assert_eq!(SharedRole::for_label("Company Name"), None);
    }

    #[test]
    fn signature_patterns_compile() {
        let patterns = SignaturePatterns::new().expect("patterns");
        assert!(patterns.token(SharedRole::Address).is_none());
        assert!(patterns.line(SharedRole::Company).is_none());
        let line = patterns.line(SharedRole::Name).expect("name line");
        assert!(line.is_match("Name\u{FF1A} ____"));
    }

    #[test]
    fn blank_runs_end_at_block_boundaries() {
        assert!(run_is_blank(""));
        assert!(run_is_blank("&nbsp; </p><p>Next</p>"));
        assert!(run_is_blank("<strong> </strong><br/>"));
        assert!(!run_is_blank(" Ada Lovelace</p>"));
        assert!(!run_is_blank("<em>Ada</em>"));
    }

    #[test]
    fn labels_must_open_their_run() {
        assert!(opens_run("<p>"));
        assert!(opens_run(""));
        assert!(opens_run("line one\n  "));
        assert!(!opens_run("<p>Company "));
    }
}
