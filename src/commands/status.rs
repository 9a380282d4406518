use std::io::{self, Write};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use lexfill::ValueMap;
use lexfill::model::Template;
use lexfill::util::read_json;
use lexfill::values::{input_hint, prompt_for};

use crate::cli::StatusArgs;

use super::write_stdout_json;

#[derive(Debug, Serialize)]
struct StatusReport {
    template_id: String,
    generated_at: DateTime<Utc>,
    answered: usize,
    total: usize,
    percent: u8,
    missing_required: Vec<String>,
    next: Option<NextQuestion>,
}

#[derive(Debug, Serialize)]
struct NextQuestion {
    index: usize,
    key: String,
    prompt: String,
    hint: String,
}

pub fn run(args: StatusArgs) -> Result<()> {
    let template: Template = read_json(&args.template)?;
    let values: ValueMap = match &args.values {
        Some(path) => read_json(path)?,
        None => ValueMap::new(),
    };

    let report = build_report(&template, &values);
    info!(
        template_id = %report.template_id,
        answered = report.answered,
        total = report.total,
        "status computed"
    );

    if args.json {
        write_stdout_json(&report)
    } else {
        write_text_report(&report)
    }
}

fn build_report(template: &Template, values: &ValueMap) -> StatusReport {
    let progress = values.progress(&template.fields);
    let missing_required = template
        .fields
        .iter()
        .filter(|field| field.required && !values.is_answered(&field.key))
        .map(|field| field.key.clone())
        .collect();
    let next = values
        .next_unanswered(&template.fields, 0)
        .map(|(index, field)| NextQuestion {
            index,
            key: field.key.clone(),
            prompt: prompt_for(field),
            hint: input_hint(field),
        });

    StatusReport {
        template_id: template.id.clone(),
        generated_at: Utc::now(),
        answered: progress.answered,
        total: progress.total,
        percent: progress.percent,
        missing_required,
        next,
    }
}

fn write_text_report(report: &StatusReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "Template: {}", report.template_id)?;
    writeln!(
        output,
        "Progress: {}/{} ({}%)",
        report.answered, report.total, report.percent
    )?;
    if !report.missing_required.is_empty() {
        writeln!(output, "Missing required: {}", report.missing_required.join(", "))?;
    }
    match &report.next {
        Some(next) => {
            writeln!(output, "Next: {}", next.prompt)?;
            writeln!(output, "\tkey={} hint={}", next.key, next.hint)?;
        }
        None => writeln!(output, "All fields answered.")?,
    }

    output.flush()?;
    Ok(())
}
