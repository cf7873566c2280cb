//! MenuLens - reconstruct menu items from an OCR provider response
//!
//! Reads a recognition payload (file or stdin) and prints the recovered
//! items as JSON. The binary never calls an OCR provider itself.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use menu_lens::config::{self, AppConfig};
use menu_lens::{MenuPipeline, Provider};

/// MenuLens - menu item reconstruction from OCR output
#[derive(Parser, Debug)]
#[command(name = "menu-lens")]
#[command(about = "Groups OCR text fragments from a menu photo into menu items")]
struct Args {
    /// Provider payload JSON file ("-" reads stdin)
    input: PathBuf,

    /// Configuration file (defaults to the user config dir if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Payload shape: cloud_vision or fragments
    #[arg(short, long)]
    provider: Option<Provider>,

    /// Confidence floor for the fragment filter (0.0 - 1.0)
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Keep low-confidence fragments
    #[arg(long)]
    no_filter: bool,

    /// Vertical line tolerance in pixels
    #[arg(long)]
    line_threshold: Option<f64>,

    /// Include proximity clusters in the output
    #[arg(long)]
    clusters: bool,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_or_default_config(args.config.as_deref())?;
    if let Some(provider) = args.provider {
        config.ocr.provider = provider;
    }
    if let Some(min_confidence) = args.min_confidence {
        config.ocr.min_confidence = min_confidence;
    }
    if args.no_filter {
        config.ocr.filter_low_confidence = false;
    }
    if let Some(line_threshold) = args.line_threshold {
        config.grouping.line_threshold = line_threshold;
    }
    if args.clusters {
        config.layout.include_clusters = true;
    }

    let pipeline = MenuPipeline::new(config)?;

    let content = read_input(&args.input)?;
    let payload: serde_json::Value =
        serde_json::from_str(&content).context("Input is not valid JSON")?;

    let scan = pipeline.process_payload(&payload)?;

    let output = if args.compact {
        serde_json::to_string(&scan)?
    } else {
        serde_json::to_string_pretty(&scan)?
    };
    println!("{}", output);

    Ok(())
}

/// Load configuration from an explicit path, the user config dir, or defaults
fn load_or_default_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        let config = config::load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    if let Ok(path) = config::default_config_path() {
        if path.exists() {
            let config = config::load_config(&path)?;
            info!("Loaded configuration from {:?}", path);
            return Ok(config);
        }
    }

    info!("Using default configuration");
    Ok(AppConfig::default())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read payload from stdin")?;
        return Ok(content);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read payload {:?}", path))
}
