use anyhow::{Result, bail};
use tracing::info;

use lexfill::model::Field;
use lexfill::validate_field;

use crate::cli::CheckArgs;

use super::write_stdout_text;

pub fn run(args: CheckArgs) -> Result<()> {
    let mut field = Field::new("value", "Value", args.field_type.into());
    if args.optional {
        field = field.optional();
    }

    if let Some(error) = validate_field(&field, &args.value) {
        bail!("{} value rejected: {error}", field.field_type);
    }

    info!(field_type = %field.field_type, "value accepted");
    write_stdout_text("valid")
}
