use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use folio::config::Config;
use folio::db::create_pool;
use folio::dom::{Document, SharedDocument};
use folio::entitlement::EntitlementGate;
use folio::errors::ExportError;
use folio::export::{default_filename, Exporter, GenerationOptions, Orientation, PageKind};
use folio::models::{Account, PlanTier, ResumeData, TemplateKind};
use folio::store::{
    DocumentStore, FallbackDocumentStore, LocalStore, PgDocumentStore, PlanLookup,
    SessionProvider, StaticSession,
};
use folio::templates::{self, PREVIEW_ELEMENT_ID, THUMBNAIL_SCALE};
use folio::validation::validate;

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Render resumes to single-page PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a resume and save it as a PDF in the download directory
    Export(RenderArgs),
    /// Render a resume and print it as a data: URI
    Preview(RenderArgs),
    /// Check the required contact fields without rendering
    Validate(InputArgs),
    /// Show the signed-in account's plan, or record a new one in the local store
    Plan {
        /// free or pro
        tier: Option<PlanTier>,
    },
    /// List the signed-in account's recent activity from the local store
    Activity,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Resume JSON file
    #[arg(long, conflicts_with = "sample", required_unless_present = "sample")]
    data: Option<PathBuf>,

    /// Use the built-in sample resume
    #[arg(long)]
    sample: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// corporate, modern or creative
    #[arg(long, default_value = "modern")]
    template: TemplateKind,

    /// a4 or letter
    #[arg(long, default_value = "a4")]
    format: PageKind,

    /// portrait or landscape
    #[arg(long, default_value = "portrait")]
    orientation: Orientation,

    /// Capture pixel density (defaults to 3 for export and 2 for preview)
    #[arg(long)]
    quality: Option<f32>,

    /// Download name (defaults to <full name>_<template>.pdf)
    #[arg(long)]
    filename: Option<String>,

    /// Output directory for export, or output file for preview
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Validate(input) => {
            let data = load_resume(&input).await?;
            ensure_valid(&data)?;
            println!("Resume is valid");
            Ok(())
        }
        Command::Plan { tier } => {
            let account_id = signed_in_account(&config)?;
            let local = LocalStore::new(config.store_dir.clone());
            if let Some(tier) = tier {
                local.set_plan(account_id, tier).await?;
                info!(%account_id, %tier, "Recorded plan");
            }
            println!("{}", local.plan_tier(account_id).await?);
            Ok(())
        }
        Command::Activity => {
            let account_id = signed_in_account(&config)?;
            let local = LocalStore::new(config.store_dir.clone());
            for entry in local.activity(account_id).await {
                match &entry.details {
                    Some(details) => println!("{}  {}: {details}", entry.time, entry.action),
                    None => println!("{}  {}", entry.time, entry.action),
                }
            }
            Ok(())
        }
        Command::Export(args) => {
            if let Some(dir) = &args.out {
                config.download_dir = dir.clone();
            }
            let data = load_resume(&args.input).await?;
            ensure_valid(&data)?;

            let exporter = build_exporter(&config).await?;
            let live = mount_live_view(&data, args.template);
            let filename = args.filename.clone().unwrap_or_else(|| {
                default_filename(&data.contact.full_name, args.template.as_str())
            });
            let options = GenerationOptions {
                filename: Some(filename),
                ..render_options(&args, GenerationOptions::export())
            };

            let path = exporter
                .generate_file(&live, PREVIEW_ELEMENT_ID, &options)
                .await
                .map_err(explain)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Preview(args) => {
            let data = load_resume(&args.input).await?;
            ensure_valid(&data)?;

            let exporter = build_exporter(&config).await?;
            let live = mount_live_view(&data, args.template);
            let options = render_options(&args, GenerationOptions::preview());

            let uri = exporter
                .generate_preview(&live, PREVIEW_ELEMENT_ID, &options)
                .await
                .map_err(explain)?;
            match &args.out {
                Some(path) => {
                    tokio::fs::write(path, &uri)
                        .await
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "Wrote preview data URI");
                }
                None => println!("{uri}"),
            }
            Ok(())
        }
    }
}

fn render_options(args: &RenderArgs, base: GenerationOptions) -> GenerationOptions {
    GenerationOptions {
        quality: args.quality.unwrap_or(base.quality),
        format: args.format,
        orientation: args.orientation,
        ..base
    }
}

async fn load_resume(input: &InputArgs) -> Result<ResumeData> {
    match &input.data {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(ResumeData::sample()),
    }
}

/// Prints every validation problem at once and fails if there are any.
fn ensure_valid(data: &ResumeData) -> Result<()> {
    let report = validate(data);
    if report.is_valid {
        return Ok(());
    }
    for error in &report.errors {
        eprintln!("  - {error}");
    }
    bail!("Resume is missing required fields")
}

fn signed_in_account(config: &Config) -> Result<Uuid> {
    config
        .account_id
        .context("Sign in first: set FOLIO_ACCOUNT_ID to your account id.")
}

/// The editor view: the chosen template mounted as a scaled thumbnail.
fn mount_live_view(data: &ResumeData, template: TemplateKind) -> SharedDocument {
    let mut doc = Document::new();
    templates::mount_preview(&mut doc, template, data, PREVIEW_ELEMENT_ID, THUMBNAIL_SCALE);
    doc.into_shared()
}

async fn build_exporter(config: &Config) -> Result<Exporter> {
    let local = Arc::new(LocalStore::new(config.store_dir.clone()));

    let documents: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => match create_pool(url).await {
            Ok(pool) => Arc::new(FallbackDocumentStore::new(
                Arc::new(PgDocumentStore::new(pool)),
                local.clone(),
            )),
            Err(e) => {
                warn!("PostgreSQL unavailable, using local store only: {e}");
                local.clone()
            }
        },
        None => local.clone(),
    };

    let session: Arc<dyn SessionProvider> = match config.account_id {
        Some(id) => Arc::new(StaticSession::signed_in(Account {
            email: config.account_email.clone(),
            ..Account::new(id)
        })),
        None => Arc::new(StaticSession::signed_out()),
    };

    let gate = Arc::new(EntitlementGate::new(session, local, documents));
    Ok(Exporter::from_config(config, gate))
}

/// Adds the next step for gate refusals.
fn explain(err: ExportError) -> anyhow::Error {
    match &err {
        ExportError::AuthRequired => {
            eprintln!("Sign in first: set FOLIO_ACCOUNT_ID to your account id.");
        }
        ExportError::UpgradeRequired(message) => {
            eprintln!("{message}. Upgrade to Pro to export more resumes.");
        }
        _ => {}
    }
    anyhow::Error::new(err)
}
