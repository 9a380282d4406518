use anyhow::Result;
use tracing::{info, warn};

use lexfill::Detector;
use lexfill::model::{Template, starter_fields};
use lexfill::util::{read_text, write_json_pretty};

use crate::cli::DetectArgs;

use super::{load_config, write_stdout_json};

pub fn run(args: DetectArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(profile) = args.profile {
        config = config.with_profile(profile.into());
    }
    let detector = Detector::new(config)?;

    let html = read_text(&args.html)?;
    let text = args.text.as_deref().map(read_text).transpose()?;
    let mut template = Template::build(&html, text.as_deref(), &detector)?;

    if template.fields.is_empty() {
        if args.starter_fallback {
            template.fields = starter_fields();
            warn!(
                template_id = %template.id,
                fields = template.fields.len(),
                "no placeholders detected; using starter fields"
            );
        } else {
            warn!(template_id = %template.id, "no placeholders detected");
        }
    }

    let required = template.fields.iter().filter(|field| field.required).count();
    info!(
        template_id = %template.id,
        profile = detector.profile().as_str(),
        fields = template.fields.len(),
        required,
        "detection complete"
    );

    match &args.output {
        Some(path) => {
            write_json_pretty(path, &template)?;
            info!(path = %path.display(), "wrote template");
        }
        None => write_stdout_json(&template)?,
    }

    Ok(())
}
