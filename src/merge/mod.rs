//! Value substitution into template markup.
//!
//! Each answered field rewrites the markup in field order, so a later field only sees
//! placeholders the earlier ones left behind. A final pass broadcasts signature-block
//! values (company, name, title, address, email) to any copies still unfilled.

use anyhow::Result;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::caption::{CAPTION_WINDOW, CaptionScanner, literal_token_regex, underscore_blank_regex};
use crate::detect::DetectorConfig;
use crate::format::format_by_type;
use crate::model::Field;
use crate::normalize::escape_html;
use crate::values::ValueMap;

use signature::SignaturePatterns;

mod signature;
mod substitute;
#[cfg(test)]
mod tests;

const DEFAULT_LITERAL_TOKEN: &str = "QQQ";

#[derive(Debug)]
pub struct Merger {
    captions: CaptionScanner,
    underscore_blank: Regex,
    literal_token: Regex,
    signature: SignaturePatterns,
}

/// A field whose formatted, escaped value went into the markup.
#[derive(Debug)]
pub(crate) struct Filled<'f> {
    pub(crate) field: &'f Field,
    pub(crate) value: String,
}

impl Merger {
    pub fn new(caption_window: usize, literal_token: &str) -> Result<Self> {
        Ok(Self {
            captions: CaptionScanner::new(caption_window),
            underscore_blank: underscore_blank_regex()?,
            literal_token: literal_token_regex(literal_token)?,
            signature: SignaturePatterns::new()?,
        })
    }

    /// Uses the same window and literal token the detector was configured with.
    pub fn from_config(config: &DetectorConfig) -> Result<Self> {
        Self::new(config.caption_window, &config.literal_token)
    }

    pub fn fill(&self, html: &str, fields: &[Field], values: &ValueMap) -> String {
        let mut markup = html.to_string();
        let mut filled = Vec::new();

        for field in fields {
            let Some(raw) = values.get(&field.key).filter(|raw| !raw.trim().is_empty()) else {
                continue;
            };
            let formatted = format_by_type(field.field_type, raw);
            if formatted.is_empty() {
                continue;
            }

            let value = escape_html(&formatted);
            let (rewritten, replaced) = substitute::apply(
                &markup,
                field,
                &value,
                &self.captions,
                &self.underscore_blank,
                &self.literal_token,
            );
            debug!(key = %field.key, replaced, "field merged");

            markup = rewritten;
            filled.push(Filled { field, value });
        }

        let (rewritten, replaced) = signature::broadcast(&markup, &filled, &self.signature);
        debug!(replaced, "shared signature values merged");
        rewritten
    }
}

/// Merges `values` into `html` with the default caption window and literal token.
///
/// Callers merging many documents should build one [`Merger`] and reuse it.
pub fn fill_html(html: &str, fields: &[Field], values: &ValueMap) -> String {
    match Merger::new(CAPTION_WINDOW, DEFAULT_LITERAL_TOKEN) {
        Ok(merger) => merger.fill(html, fields, values),
        Err(error) => {
            warn!(error = %error, "merge patterns unavailable; returning markup unchanged");
            html.to_string()
        }
    }
}

/// Replaces every match for which `replace` returns a value; other matches stay as they
/// are. Returns the rewritten text and the number of replacements.
pub(crate) fn rewrite<F>(haystack: &str, regex: &Regex, mut replace: F) -> (String, usize)
where
    F: FnMut(&Captures<'_>) -> Option<String>,
{
    let mut output = String::with_capacity(haystack.len());
    let mut last = 0;
    let mut replaced = 0;

    for captures in regex.captures_iter(haystack) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let Some(replacement) = replace(&captures) else {
            continue;
        };
        output.push_str(&haystack[last..whole.start()]);
        output.push_str(&replacement);
        last = whole.end();
        replaced += 1;
    }

    if replaced == 0 {
        return (haystack.to_string(), 0);
    }
    output.push_str(&haystack[last..]);
    (output, replaced)
}
