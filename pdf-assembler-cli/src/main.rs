use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pdf_assembler::{
    Assembler, AssemblerConfig, FinalizeOutcome, HttpBackend, TracingNotifier,
    DEFAULT_OUTPUT_NAME,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod script;

use script::{settle, EditPlan};

#[derive(Parser)]
#[command(
    name = "pdfasm",
    about = "Assemble pages from several PDFs into one document",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the page strip the assembler would display
    Previews {
        /// Input PDF files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Base URL of the preview service
        #[arg(short, long)]
        backend: String,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload PDFs, rearrange their pages and build one document
    Assemble {
        /// Input PDF files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Base URL of the preview and build service
        #[arg(short, long)]
        backend: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Pages to put first, e.g. "5,1,2" (numbers as uploaded)
        #[arg(long)]
        order: Option<String>,

        /// Pages to leave out, e.g. "3,4"
        #[arg(long)]
        remove: Option<String>,

        /// Rotate a page clockwise, e.g. "2:90"; may be repeated
        #[arg(long, value_name = "PAGE:DEGREES")]
        rotate: Vec<String>,

        /// Document name sent to the build service
        #[arg(short, long)]
        name: Option<String>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as JSON
    Config,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_assembler=info,pdfasm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AssemblerConfig> {
    match path {
        Some(path) => AssemblerConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(AssemblerConfig::default()),
    }
}

/// Upload `files` and wait for the new pages to be revealed
async fn upload(
    assembler: &mut Assembler,
    files: Vec<PathBuf>,
    backend: &HttpBackend,
) -> Result<()> {
    let summary = assembler
        .ingest(files, backend, &TracingNotifier)
        .await?;
    settle(assembler).await;

    for skipped in &summary.skipped {
        eprintln!("Skipped {}: {}", skipped.name, skipped.error);
    }
    if assembler.pages().is_empty() {
        bail!("No pages could be loaded");
    }

    debug!(files = summary.added_files, pages = summary.added_pages.len(), "upload finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Previews {
            files,
            backend,
            config,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let backend = HttpBackend::new(backend);
            let mut assembler = Assembler::new(config)?;

            upload(&mut assembler, files, &backend).await?;
            let view = assembler.view();

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("Pages: {}", view.pages.len());
                println!("Strip width: {:.1}", view.content_width);
                println!("--------------------");
                for page in &view.pages {
                    let file = &assembler.files()[page.origin.file];
                    println!(
                        "{:>3}. {} page {} ({:.1} x {:.1} at x={:.1})",
                        page.number,
                        file.name,
                        page.origin.page + 1,
                        page.width,
                        page.height,
                        page.position.x
                    );
                }
            }
        }

        Commands::Assemble {
            files,
            backend,
            output,
            order,
            remove,
            rotate,
            name,
            config,
        } => {
            let plan = EditPlan::parse(order.as_deref(), remove.as_deref(), &rotate)?;
            let config = load_config(config.as_deref())?;
            let backend = HttpBackend::new(backend);
            let mut assembler = Assembler::new(config)?;

            upload(&mut assembler, files, &backend).await?;

            if !plan.is_empty() {
                plan.apply(&mut assembler)?;
                settle(&mut assembler).await;
            }

            let name = name
                .or_else(|| {
                    output
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                })
                .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string());
            let pages = assembler.pages().len();

            match assembler.finalize(name, &backend, &TracingNotifier).await? {
                FinalizeOutcome::Download { name, bytes } => {
                    std::fs::write(&output, &bytes).with_context(|| {
                        format!("Failed to write output file {}", output.display())
                    })?;
                    info!(%name, size = bytes.len(), "document written");
                    println!("✓ Assembled {} pages into {}", pages, output.display());
                }
                FinalizeOutcome::Reset => {
                    println!("The build service returned no document");
                }
                FinalizeOutcome::Failed(message) => bail!(message),
            }
        }

        Commands::Config => {
            println!(
                "{}",
                serde_json::to_string_pretty(&AssemblerConfig::default())?
            );
        }
    }

    Ok(())
}
