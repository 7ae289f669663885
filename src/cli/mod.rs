// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application).
//
// Commands:
//   generate        fill a template, store it, print the NDA id
//   upload-signed   store a signed copy
//   submit          final lifecycle step
//   status          print the metadata record
//   download-link   print a time-limited link
//   templates       upload | check
//
// Settings come from defaults, then --config, then NDA_*
// environment variables, then the flags below.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use commands::{Commands, GenerateArgs, TemplateCommands, UploadSignedArgs};

use crate::application::generator::DocumentGenerator;
use crate::application::templates::{provision_templates, ProvisionOutcome};
use crate::application::workflow::NdaWorkflow;
use crate::data::inflection::Inflector;
use crate::domain::catalog::FieldCatalog;
use crate::domain::fields::FieldDictionary;
use crate::domain::traits::ObjectStore;
use crate::infra::fs_store::FsObjectStore;
use crate::infra::settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "nda-docgen",
    version = "0.1.0",
    about = "Generate NDA documents from .docx templates and track them through signing."
)]
pub struct Cli {
    /// JSON settings file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Object store root directory (overrides settings)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Resolve settings, open the store, and dispatch.
    pub fn run(self) -> Result<()> {
        let mut settings = Settings::load(self.config.as_deref())?;
        if let Some(dir) = self.store_dir {
            settings.store_dir = dir;
        }

        let store: Arc<dyn ObjectStore> = Arc::new(
            FsObjectStore::open(&settings.store_dir)
                .with_context(|| format!("Cannot open store at '{}'", settings.store_dir.display()))?,
        );
        let catalog   = FieldCatalog::builtin().context("Built-in field catalog is invalid")?;
        let generator = DocumentGenerator::new(catalog, Inflector::russian(), store.clone());
        let workflow  = NdaWorkflow::new(
            generator,
            store.clone(),
            settings.upload_policy(),
            settings.presigned_expiry(),
        );

        match self.command {
            Commands::Generate(args)     => run_generate(&workflow, args),
            Commands::UploadSigned(args) => run_upload_signed(&workflow, args),
            Commands::Submit(args) => {
                let status = workflow.submit(args.id)?;
                println!("{} {}", args.id, status);
                Ok(())
            }
            Commands::Status(args) => {
                let record = workflow.status(args.id)?;
                println!("{}", serde_json::to_string_pretty(&record)?);
                Ok(())
            }
            Commands::DownloadLink(args) => {
                let link = workflow.download_link(args.id, args.variant)?;
                println!("{}", link.url);
                println!("expires in {}s", link.expires_in_seconds);
                Ok(())
            }
            Commands::Templates(TemplateCommands::Upload { dir }) => {
                let outcomes = provision_templates(store.as_ref(), workflow.generator().catalog(), &dir)
                    .with_context(|| format!("Cannot upload templates from '{}'", dir.display()))?;
                for (name, outcome) in outcomes {
                    match outcome {
                        ProvisionOutcome::Uploaded { bytes } => println!("uploaded  {name} ({bytes} bytes)"),
                        ProvisionOutcome::Missing            => println!("missing   {name}"),
                    }
                }
                Ok(())
            }
            Commands::Templates(TemplateCommands::Check) => {
                let reports = workflow.generator().check_templates()?;
                let mut ok  = true;
                for r in &reports {
                    ok &= r.is_ok();
                    match (r.found, r.unmapped.is_empty()) {
                        (false, _)    => println!("{:<6} missing   {}", r.variant, r.template),
                        (true, true)  => println!("{:<6} ok        {}", r.variant, r.template),
                        (true, false) => println!("{:<6} unmapped  {} {:?}", r.variant, r.template, r.unmapped),
                    }
                }
                if !ok {
                    bail!("template check failed");
                }
                Ok(())
            }
        }
    }
}

fn run_generate(workflow: &NdaWorkflow, args: GenerateArgs) -> Result<()> {
    let fields = read_fields(&args)?;
    if fields.is_empty() {
        tracing::warn!("No fields supplied; every placeholder stays in the output");
    } else {
        tracing::info!("Generating '{}' NDA with {} fields", args.variant, fields.len());
    }

    let generated = workflow.generate(args.id, args.variant, &fields)?;
    if let Some(path) = &args.output {
        fs::write(path, &generated.bytes)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        println!("wrote {}", path.display());
    }

    println!("{} {} {}", generated.record_id, generated.status, generated.file_name);
    Ok(())
}

fn run_upload_signed(workflow: &NdaWorkflow, args: UploadSignedArgs) -> Result<()> {
    let bytes = fs::read(&args.file)
        .with_context(|| format!("Cannot read '{}'", args.file.display()))?;
    let filename = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let status = workflow.upload_signed(args.id, &bytes, &filename)?;
    println!("{} {}", args.id, status);
    Ok(())
}

/// Fields from --fields-file / --fields, then --set pairs on top.
fn read_fields(args: &GenerateArgs) -> Result<FieldDictionary> {
    let json = match (&args.fields_file, &args.fields) {
        (Some(path), _) => Some(
            fs::read_to_string(path).with_context(|| format!("Cannot read '{}'", path.display()))?,
        ),
        (None, inline) => inline.clone(),
    };

    let mut fields = match json {
        Some(json) => {
            let value: serde_json::Value = serde_json::from_str(&json).context("Fields are not valid JSON")?;
            match FieldDictionary::from_json(&value) {
                Some(fields) => fields,
                None         => bail!("Fields must be a JSON object"),
            }
        }
        None => FieldDictionary::new(),
    };

    for raw in &args.set {
        let Some((key, value)) = commands::parse_assignment(raw) else {
            bail!("--set expects KEY=VALUE, got '{raw}'");
        };
        fields.insert(key, Some(value.to_string()));
    }
    Ok(fields)
}
