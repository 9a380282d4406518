use anyhow::Result;

use lexfill::format_by_type;

use crate::cli::FormatArgs;

use super::write_stdout_text;

pub fn run(args: FormatArgs) -> Result<()> {
    write_stdout_text(&format_by_type(args.field_type.into(), &args.value))
}
