use anyhow::Result;
use tracing::{info, warn};

use lexfill::model::Template;
use lexfill::util::{read_json, write_text};
use lexfill::{Merger, ValueMap, validate_field};

use crate::cli::FillArgs;

use super::{load_config, write_stdout_text};

pub fn run(args: FillArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let merger = Merger::from_config(&config)?;

    let template: Template = read_json(&args.template)?;
    let mut values: ValueMap = read_json(&args.values)?;

    let stale = values.retain_fields(&template.fields);
    if stale > 0 {
        warn!(stale, "ignoring values for fields not in the template");
    }

    for field in &template.fields {
        match values.get(&field.key) {
            Some(raw) => {
                if let Some(error) = validate_field(field, raw) {
                    warn!(key = %field.key, error = %error, "value failed validation");
                }
            }
            None if field.required => {
                warn!(key = %field.key, label = %field.label, "required field unanswered");
            }
            None => {}
        }
    }

    let merged = merger.fill(&template.html, &template.fields, &values);
    let progress = values.progress(&template.fields);
    info!(
        template_id = %template.id,
        answered = progress.answered,
        total = progress.total,
        "merge complete"
    );

    match &args.output {
        Some(path) => {
            write_text(path, &merged)?;
            info!(path = %path.display(), "wrote filled document");
        }
        None => write_stdout_text(&merged)?,
    }

    Ok(())
}
