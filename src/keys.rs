use std::sync::LazyLock;

use regex::Regex;

use crate::util::sha256_hex;

const MAX_KEY_LEN: usize = 64;

static QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'\x{2018}\x{2019}\x{201C}\x{201D}]"#).expect("valid quote regex"));
static NON_ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid separator regex"));
static LABEL_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\[\]{}]").expect("valid label noise regex"));

/// Stable identifier for a label: quotes dropped, case folded, punctuation runs collapsed
/// to `_`. Labels with no usable characters get a generated `field_` id.
pub fn to_key(label: &str) -> String {
    let unquoted = QUOTES.replace_all(label.trim(), "");
    let lowered = unquoted.to_lowercase();
    let joined = NON_ALNUM_RUN.replace_all(&lowered, "_");
    let trimmed = joined.trim_matches('_');

    let key = if trimmed.len() > MAX_KEY_LEN {
        trimmed[..MAX_KEY_LEN].trim_end_matches('_')
    } else {
        trimmed
    };

    if key.is_empty() {
        return fallback_key(label);
    }
    key.to_string()
}

/// Generated identifier for labels that normalize to nothing.
///
/// Derived from a digest of the seed so repeated detection over the same document
/// hands out the same ids.
pub fn fallback_key(seed: &str) -> String {
    let digest = sha256_hex(seed.as_bytes());
    format!("field_{}", &digest[..12])
}

/// Display label: underscores and brackets become spaces, whitespace collapses,
/// first character upper-cased.
pub fn to_label(raw: &str) -> String {
    let spaced = LABEL_NOISE.replace_all(raw, " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<&str>>().join(" ");

    let mut characters = collapsed.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_collapses_case_and_punctuation() {
        assert_eq!(to_key("Post-Money Valuation Cap"), "post_money_valuation_cap");
        assert_eq!(to_key("  “Purchase Amount” "), "purchase_amount");
        assert_eq!(to_key("Company's   Name:"), "companys_name");
    }

    #[test]
    fn key_is_idempotent_over_normalized_labels() {
        for label in ["Date of Safe", "STATE OF INCORPORATION", "e-mail (notices)", "[name]"] {
            let key = to_key(label);
            assert_eq!(to_key(&key), key);
            assert_eq!(to_key(&label.to_uppercase()), key);
        }
    }

    #[test]
    fn key_is_truncated_without_trailing_separator() {
        let long = format!("{} tail", "a".repeat(63));
        let key = to_key(&long);
        assert_eq!(key.len(), 63);
        assert!(!key.ends_with('_'));
    }

    #[test]
    fn empty_key_falls_back_to_generated_id() {
        let key = to_key("“”");
        assert!(key.starts_with("field_"));
        assert_eq!(key.len(), "field_".len() + 12);
        assert_eq!(to_key("“”"), key);
        assert_ne!(to_key("!!!"), to_key("???"));
    }

    #[test]
    fn label_strips_markers_and_capitalizes() {
        assert_eq!(to_label("company_name"), "Company name");
        assert_eq!(to_label("[[ investor  email ]]"), "Investor email");
        assert_eq!(to_label("{{}}"), "");
    }
}
