use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use lexfill::DetectorConfig;

pub mod check;
pub mod detect;
pub mod fill;
pub mod format;
pub mod status;

fn load_config(path: Option<&Path>) -> Result<DetectorConfig> {
    match path {
        Some(path) => DetectorConfig::load(path),
        None => Ok(DetectorConfig::default()),
    }
}

fn write_stdout_json<T: Serialize>(value: &T) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, value).context("failed to serialize json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_stdout_text(contents: &str) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    output.write_all(contents.as_bytes())?;
    if !contents.ends_with('\n') {
        writeln!(output)?;
    }
    output.flush()?;
    Ok(())
}
