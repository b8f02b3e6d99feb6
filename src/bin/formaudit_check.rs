//! Check a local PDF without running the HTTP server
//!
//! Usage: formaudit-check path/to/form.pdf [--strategy region] [--dpi 300]
//!
//! Environment configuration (OCR_LANGUAGE, MIN_INK_PIXELS, FIELD_RULES_PATH,
//! ...) applies first; command-line flags override it. The result is printed
//! as the same JSON object the `/extract` endpoint returns.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use formaudit::{analysis::signature::SignatureStrategy, analysis::DocumentAnalyzer, config::Config};

#[derive(Parser)]
#[command(name = "formaudit-check")]
#[command(about = "Report missing fields in a medical justification PDF")]
struct Args {
    /// PDF file to check
    pdf: PathBuf,

    /// Signature detection strategy: full_page or region
    #[arg(short, long)]
    strategy: Option<SignatureStrategy>,

    /// Rendering resolution for the first page
    #[arg(long)]
    dpi: Option<u32>,

    /// Tesseract language code
    #[arg(long)]
    lang: Option<String>,

    /// Pretty-print the JSON result
    #[arg(short, long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("formaudit=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(strategy) = args.strategy {
        config.analysis.signature.strategy = strategy;
    }
    if let Some(dpi) = args.dpi {
        anyhow::ensure!(dpi > 0, "--dpi must be greater than zero");
        config.render_dpi = dpi;
    }
    if let Some(lang) = args.lang {
        config.ocr_language = lang;
    }

    let bytes = tokio::fs::read(&args.pdf)
        .await
        .with_context(|| format!("Failed to read {}", args.pdf.display()))?;

    let analyzer = DocumentAnalyzer::from_config(&config)?;
    info!("Checking {}", args.pdf.display());
    let response = analyzer.analyze_bytes(&bytes).await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    Ok(())
}
