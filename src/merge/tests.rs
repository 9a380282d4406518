use super::*;
use crate::model::FieldType;

fn values<const N: usize>(pairs: [(&str, &str); N]) -> ValueMap {
    pairs.into_iter().collect()
}

#[test]
fn label_blank_and_bracket_token_share_one_value() {
    let fields = [Field::new("signatory_name", "Name", FieldType::Text)];
    let html = "<p>Name: ____</p><p>[name]</p>";

    let merged = fill_html(html, &fields, &values([("signatory_name", "Ada")]));
    assert_eq!(merged, "<p>Name: Ada</p><p>Ada</p>");
}

#[test]
fn unanswered_placeholders_stay_visible() {
    let fields = [
        Field::new("investor_name", "Investor Name", FieldType::Text),
        Field::new("company_name", "Company Name", FieldType::Text),
    ];
    let html = "<p>[Investor Name] invests in [Company Name].</p>";

    let merged = fill_html(
        html,
        &fields,
        &values([("company_name", "Acme"), ("investor_name", "  ")]),
    );
    assert_eq!(merged, "<p>[Investor Name] invests in Acme.</p>");
}

#[test]
fn captioned_currency_blank_takes_formatted_amount() {
    let fields = [Field::new("purchase_amount", "Purchase Amount", FieldType::Currency)];
    let html = "<p>payment of $[_____________] (the \u{201C}<strong>Purchase Amount</strong>\u{201D})</p>";

    let merged = fill_html(html, &fields, &values([("purchase_amount", "250000")]));
    assert_eq!(
        merged,
        "<p>payment of $250,000.00 (the \u{201C}<strong>Purchase Amount</strong>\u{201D})</p>"
    );
}

#[test]
fn sigil_is_kept_when_value_has_none() {
    let fields = [Field::new("payment_terms", "Payment Terms", FieldType::Text)];
    let html = "due $ ______ (the \"Payment Terms\")";

    let merged = fill_html(html, &fields, &values([("payment_terms", "TBD")]));
    assert_eq!(merged, "due $ TBD (the \"Payment Terms\")");
}

#[test]
fn literal_tokens_follow_their_captions() {
    let fields = [
        Field::new("valuation_cap", "Valuation Cap", FieldType::Currency),
        Field::new("discount_rate", "Discount Rate", FieldType::Number),
    ];
    let html = concat!(
        "<p>The discount is QQQ (the \u{201C}Discount Rate\u{201D}).</p>",
        "<p>The cap is $QQQ (the \u{201C}Valuation Cap\u{201D}).</p>",
    );

    let merged = fill_html(
        html,
        &fields,
        &values([("valuation_cap", "5000000"), ("discount_rate", "20")]),
    );
    assert_eq!(
        merged,
        concat!(
            "<p>The discount is 20 (the \u{201C}Discount Rate\u{201D}).</p>",
            "<p>The cap is $5,000,000.00 (the \u{201C}Valuation Cap\u{201D}).</p>",
        )
    );
}

#[test]
fn literal_token_uses_preceding_caption_when_nothing_follows() {
    let fields = [Field::new("conversion_price", "Conversion Price", FieldType::Currency)];
    let html = "The \"Conversion Price\" shall be QQQ.";

    let merged = fill_html(html, &fields, &values([("conversion_price", "1.5")]));
    assert_eq!(merged, "The \"Conversion Price\" shall be $1.50.");
}

#[test]
fn configured_literal_token_is_honoured() {
    let config = DetectorConfig {
        literal_token: "XXX".to_string(),
        ..DetectorConfig::default()
    };
    let merger = Merger::from_config(&config).expect("merger");
    let fields = [Field::new("term_count", "Term Count", FieldType::Number)];
    let html = "a term of XXX (the \"Term Count\") and QQQ (the \"Term Count\")";

    let merged = merger.fill(html, &fields, &values([("term_count", "12")]));
    assert_eq!(merged, "a term of 12 (the \"Term Count\") and QQQ (the \"Term Count\")");
}

#[test]
fn variable_tokens_match_key_or_label() {
    let fields = [Field::new("investor_name", "Investor Name", FieldType::Text)];
    let html = "Dear {{ investor_name }}, {{Investor Name}} and [[INVESTOR NAME]] and [[investor_name]].";

    let merged = fill_html(html, &fields, &values([("investor_name", "Grace")]));
    assert_eq!(merged, "Dear Grace, Grace and Grace and Grace.");
}

#[test]
fn bracketed_labels_tolerate_case_and_spacing() {
    let fields = [Field::new(
        "state_of_incorporation",
        "State of Incorporation",
        FieldType::Text,
    )];
    let html = "a [STATE OF INCORPORATION] and [state  of incorporation] corporation";

    let merged = fill_html(
        html,
        &fields,
        &values([("state_of_incorporation", "Delaware")]),
    );
    assert_eq!(merged, "a Delaware and Delaware corporation");
}

#[test]
fn inserted_values_are_escaped() {
    let fields = [Field::new("company_name", "Company Name", FieldType::Text)];
    let html = "<p>[Company Name]</p>";

    let merged = fill_html(
        html,
        &fields,
        &values([("company_name", "Smith & Sons <LLC>")]),
    );
    assert_eq!(merged, "<p>Smith &amp; Sons &lt;LLC&gt;</p>");
}

#[test]
fn dates_are_written_long_form() {
    let fields = [Field::new("date_of_safe", "Date of Safe", FieldType::Date)];
    let merged = fill_html(
        "on or about [Date of Safe]",
        &fields,
        &values([("date_of_safe", "2024-05-01")]),
    );
    assert_eq!(merged, "on or about May 1, 2024");
}

#[test]
fn label_blanks_skip_longer_labels() {
    let company = Field::new("company_name", "Company Name", FieldType::Text);
    let name = Field::new("name", "Name", FieldType::Text);
    let html = "<p>Company Name: ____</p><p>Name: ____</p>";
    let answers = values([("company_name", "Acme"), ("name", "Ada")]);

    let merged = fill_html(html, &[company.clone(), name.clone()], &answers);
    assert_eq!(merged, "<p>Company Name: Acme</p><p>Name: Ada</p>");

    let reversed = fill_html(html, &[name.clone(), company], &answers);
    assert_eq!(reversed, "<p>Company Name: Acme</p><p>Name: Ada</p>");

    let name_only = fill_html(html, &[name], &answers);
    assert_eq!(name_only, "<p>Company Name: ____</p><p>Name: Ada</p>");
}

#[test]
fn detected_signer_name_leaves_company_line_alone() {
    let html = "<p>Company Name: ______</p><p>Name: ______</p>";
    let text = crate::normalize::html_to_text(html);
    let fields = crate::detect::detect(html, &text).expect("detect");
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].key, "name");

    let merged = fill_html(html, &fields, &values([("name", "Ada")]));
    assert_eq!(merged, "<p>Company Name: ______</p><p>Name: Ada</p>");
}

#[test]
fn labels_with_ampersands_match_escaped_markup() {
    let html = "<p>Pay [Fees &amp; Costs] now.</p><p>Fees &amp; Costs: ____</p>";
    let text = crate::normalize::html_to_text(html);
    let fields = crate::detect::detect(html, &text).expect("detect");
    assert_eq!(fields[0].key, "fees_costs");
    assert_eq!(fields[0].label, "Fees & Costs");

    let merged = fill_html(html, &fields, &values([("fees_costs", "100")]));
    assert_eq!(merged, "<p>Pay 100 now.</p><p>Fees &amp; Costs: 100</p>");
}

#[test]
fn bracketed_labels_may_wrap_inline_tags() {
    let fields = [Field::new("company_name", "Company Name", FieldType::Text)];
    let html = "<p>[<strong>Company Name</strong>] and {{ <em>Company Name</em> }}</p>";

    let merged = fill_html(html, &fields, &values([("company_name", "Acme")]));
    assert_eq!(merged, "<p>Acme and Acme</p>");

    let text = crate::normalize::html_to_text(html);
    let detected = crate::detect::detect(html, &text).expect("detect");
    assert_eq!(detected[0].key, "company_name");
    let round_trip = fill_html(html, &detected, &values([("company_name", "Acme")]));
    assert!(round_trip.starts_with("<p>Acme and"));
}

#[test]
fn shared_signature_values_fill_empty_lines() {
    let fields = [
        Field::new("company", "COMPANY", FieldType::Text),
        Field::new("address", "Address", FieldType::Text).optional(),
        Field::new("email", "Email", FieldType::Email).optional(),
        Field::new("name", "Name", FieldType::Text),
    ];
    let html = concat!(
        "<p>[COMPANY]</p>",
        "<p>Company Name:</p>",
        "<p>Name:</p>",
        "<p>Address:&nbsp;</p>",
        "<p>Email: ________</p>",
        "<p>Email: already@set.com</p>",
    );
    let answers = values([
        ("company", "Acme Inc."),
        ("address", "1 Main St"),
        ("email", "ceo@acme.com"),
        ("name", "Ada"),
    ]);

    let merged = fill_html(html, &fields, &answers);
    assert_eq!(
        merged,
        concat!(
            "<p>Acme Inc.</p>",
            "<p>Company Name:</p>",
            "<p>Name: Ada</p>",
            "<p>Address:&nbsp;1 Main St</p>",
            "<p>Email: ceo@acme.com</p>",
            "<p>Email: already@set.com</p>",
        )
    );
}

#[test]
fn shared_signature_tokens_reach_other_labels() {
    let fields = [Field::new("title", "[title]", FieldType::Text)];
    let html = "<p>Title: [TITLE]</p><td>Title:</td>";

    let merged = fill_html(html, &fields, &values([("title", "CEO")]));
    assert_eq!(merged, "<p>Title: CEO</p><td>Title: CEO</td>");
}

#[test]
fn merge_is_idempotent() {
    let fields = [
        Field::new("investor_name", "Investor Name", FieldType::Text),
        Field::new("purchase_amount", "Purchase Amount", FieldType::Currency),
        Field::new("valuation_cap", "Valuation Cap", FieldType::Currency),
        Field::new("name", "Name", FieldType::Text),
        Field::new("email", "Email", FieldType::Email).optional(),
    ];
    let html = concat!(
        "<p>[Investor Name] pays $[_____] (the \u{201C}Purchase Amount\u{201D}).</p>",
        "<p>Cap: $QQQ (the \u{201C}Valuation Cap\u{201D}).</p>",
        "<p>Name: [name]</p>",
        "<p>Email:</p>",
    );
    let answers = values([
        ("investor_name", "Grace"),
        ("purchase_amount", "100000"),
        ("valuation_cap", "$8,000,000"),
        ("name", "Ada"),
        ("email", "ada@example.com"),
    ]);

    let once = fill_html(html, &fields, &answers);
    let twice = fill_html(&once, &fields, &answers);
    assert_eq!(once, twice);
    assert!(once.contains("Grace pays $100,000.00"));
    assert!(once.contains("Cap: $8,000,000.00"));
    assert!(once.contains("<p>Email: ada@example.com</p>"));
}

#[test]
fn detected_fields_merge_back_into_their_template() {
    let html = concat!(
        "<p>By [Investor Name] of $[_____] (the \u{201C}Purchase Amount\u{201D}) on [Date of Safe].</p>",
        "<p>[COMPANY]</p>",
        "<p>Name: [name]</p>",
        "<p>Email:</p>",
    );
    let text = crate::normalize::html_to_text(html);
    let fields = crate::detect::detect(html, &text).expect("detect");
    let answers = values([
        ("investor_name", "Grace"),
        ("purchase_amount", "100000"),
        ("date_of_safe", "2024-05-01"),
        ("company", "Acme"),
        ("name", "Ada"),
        ("email", "ada@acme.com"),
    ]);

    let merged = fill_html(html, &fields, &answers);
    assert_eq!(
        merged,
        concat!(
            "<p>By Grace of $100,000.00 (the \u{201C}Purchase Amount\u{201D}) on May 1, 2024.</p>",
            "<p>Acme</p>",
            "<p>Name: Ada</p>",
            "<p>Email: ada@acme.com</p>",
        )
    );
}
