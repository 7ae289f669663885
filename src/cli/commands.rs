// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// One subcommand per NDA operation, plus template maintenance.
//
// Field values for `generate` come from a JSON object, either a
// file (--fields-file) or inline (--fields), optionally topped up
// with repeated --set key=value pairs.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::domain::nda::NdaVariant;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill a template and store the generated document
    Generate(GenerateArgs),

    /// Store a signed copy of a generated NDA
    UploadSigned(UploadSignedArgs),

    /// Mark an NDA with a signed copy as submitted
    Submit(IdArgs),

    /// Print an NDA's metadata record as JSON
    Status(IdArgs),

    /// Print a time-limited link to a generated document
    DownloadLink(DownloadLinkArgs),

    /// Manage the templates in the store
    #[command(subcommand)]
    Templates(TemplateCommands),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// NDA variant: eng or ru_en
    #[arg(long, value_parser = parse_variant)]
    pub variant: NdaVariant,

    /// Existing NDA to regenerate into (a new one is created if omitted)
    #[arg(long)]
    pub id: Option<Uuid>,

    /// JSON file holding the field values
    #[arg(long, conflicts_with = "fields")]
    pub fields_file: Option<PathBuf>,

    /// Field values as an inline JSON object
    #[arg(long)]
    pub fields: Option<String>,

    /// Extra field value, key=value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Also write the generated document here
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UploadSignedArgs {
    #[arg(long)]
    pub id: Uuid,

    /// Signed file to upload
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    #[arg(long)]
    pub id: Uuid,
}

#[derive(Args, Debug)]
pub struct DownloadLinkArgs {
    #[arg(long)]
    pub id: Uuid,

    #[arg(long, value_parser = parse_variant)]
    pub variant: NdaVariant,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Upload the catalog's template files from a directory
    Upload {
        #[arg(long, default_value = "templates")]
        dir: PathBuf,
    },

    /// Check that every template exists and all its placeholders are mapped
    Check,
}

fn parse_variant(s: &str) -> Result<NdaVariant, String> {
    s.parse().map_err(|e: crate::error::NdaError| e.to_string())
}

/// Split a --set argument at its first '='.
pub fn parse_assignment(raw: &str) -> Option<(&str, &str)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some((key, value))
}
