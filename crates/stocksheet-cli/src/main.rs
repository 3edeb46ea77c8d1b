//! Stocksheet CLI
//!
//! Command-line interface for the inventory report pipeline

mod manifest;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stocksheet_pipeline::{InventoryService, PipelineConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stocksheet")]
#[command(about = "Stocksheet - barcode inventory reports and photo archives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a report and photo archive from a batch manifest
    Generate {
        /// Manifest file: one `barcode,stock-count[,photo-path]` per line
        #[arg(long)]
        manifest: PathBuf,

        /// Pipeline configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Staging directory for uploads and transient images
        #[arg(long)]
        staging_dir: Option<PathBuf>,

        /// Output directory for generated artifacts
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Report title
        #[arg(long)]
        title: Option<String>,
    },
    /// Encode a single barcode to a PNG (operator preview)
    Encode {
        /// Text to encode
        #[arg(long)]
        text: String,

        /// Output PNG path
        #[arg(long)]
        out: PathBuf,
    },
}

fn expand(path: &PathBuf) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            manifest,
            config,
            staging_dir,
            output_dir,
            title,
        } => {
            let submissions = manifest::load_manifest(&expand(&manifest))?;

            let mut config: PipelineConfig = match config {
                Some(path) => toml::from_str(&std::fs::read_to_string(expand(&path))?)?,
                None => PipelineConfig::default(),
            };
            if let Some(staging_dir) = staging_dir {
                config.staging_dir = expand(&staging_dir);
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = expand(&output_dir);
            }
            if let Some(title) = title {
                config.report_title = title;
            }
            let service = InventoryService::new(config)?;

            let session_id = "cli-batch";
            for submission in submissions {
                service.add_entry(session_id, submission).await?;
            }

            let artifacts = service.generate(session_id).await?;
            if artifacts.report.blocks_rendered == 0 {
                println!("No entries rendered (title-only report)");
            }
            if artifacts.report.blocks_skipped > 0 {
                println!(
                    "Skipped {} entries with unencodable barcodes",
                    artifacts.report.blocks_skipped
                );
            }
            println!("Document: {}", artifacts.document.display());
            println!(
                "Archive:  {} ({} photos)",
                artifacts.archive.display(),
                artifacts.photos_archived
            );
        }
        Commands::Encode { text, out } => {
            let png = stocksheet_barcode::encode(&text)?;
            let out = expand(&out);
            std::fs::write(&out, png)?;
            println!("Wrote {}", out.display());
        }
    }

    Ok(())
}
