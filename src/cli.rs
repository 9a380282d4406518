use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use lexfill::{DetectionProfile, FieldType};

#[derive(Parser, Debug)]
#[command(
    name = "lexfill",
    version,
    about = "Legal template placeholder detection and merge tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Detect(DetectArgs),
    Fill(FillArgs),
    Check(CheckArgs),
    Format(FormatArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[arg(long)]
    pub html: PathBuf,

    /// Plain-text rendering of the same document; derived from the markup when omitted.
    #[arg(long)]
    pub text: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub starter_fallback: bool,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    #[arg(long)]
    pub template: PathBuf,

    #[arg(long)]
    pub values: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(long = "type", value_enum)]
    pub field_type: FieldTypeArg,

    #[arg(long)]
    pub value: String,

    #[arg(long, default_value_t = false)]
    pub optional: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FormatArgs {
    #[arg(long = "type", value_enum)]
    pub field_type: FieldTypeArg,

    #[arg(long)]
    pub value: String,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long)]
    pub template: PathBuf,

    #[arg(long)]
    pub values: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ProfileArg {
    Primary,
    Recall,
    Combined,
}

impl From<ProfileArg> for DetectionProfile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Primary => DetectionProfile::Primary,
            ProfileArg::Recall => DetectionProfile::Recall,
            ProfileArg::Combined => DetectionProfile::Combined,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FieldTypeArg {
    Text,
    Email,
    Date,
    Number,
    Currency,
    Choice,
}

impl From<FieldTypeArg> for FieldType {
    fn from(value: FieldTypeArg) -> Self {
        match value {
            FieldTypeArg::Text => FieldType::Text,
            FieldTypeArg::Email => FieldType::Email,
            FieldTypeArg::Date => FieldType::Date,
            FieldTypeArg::Number => FieldType::Number,
            FieldTypeArg::Currency => FieldType::Currency,
            FieldTypeArg::Choice => FieldType::Choice,
        }
    }
}
