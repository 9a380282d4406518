use crate::model::FieldType;

const EMAIL_KEYWORDS: &[&str] = &["email", "e-mail"];
const DATE_KEYWORDS: &[&str] = &["date"];
const CURRENCY_KEYWORDS: &[&str] = &[
    "amount", "price", "cap", "valuation", "purchase", "cash", "usd", "dollar", "$",
];
const NUMBER_KEYWORDS: &[&str] = &["number", "percent", "qty", "quantity", "count"];

/// Keyword-driven type guess for a label. `choice` is never inferred.
pub fn infer_type(label: &str) -> FieldType {
    let lowered = label.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|keyword| lowered.contains(keyword));

    if mentions(EMAIL_KEYWORDS) {
        FieldType::Email
    } else if mentions(DATE_KEYWORDS) {
        FieldType::Date
    } else if mentions(CURRENCY_KEYWORDS) {
        FieldType::Currency
    } else if mentions(NUMBER_KEYWORDS) {
        FieldType::Number
    } else {
        FieldType::Text
    }
}
