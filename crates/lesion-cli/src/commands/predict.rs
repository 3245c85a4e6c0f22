//! Predict command - classify every image in a batch.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use lesion_adapters::FsImageSource;
use lesion_core::inference::get_device;
use lesion_core::{run_batch, BatchSummary, ImageSource, LazyClassifier, LesionPredictor};
use tracing::{debug, info};

use super::ModelArgs;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar, TextOutput};

/// Output format for batch results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `Testing on:` blocks, one per image
    #[default]
    Text,
    /// JSON Lines (one JSON object per line)
    Jsonl,
    /// Single JSON array
    Json,
}

impl OutputFormat {
    /// Parses the config spelling.
    pub fn from_config(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "jsonl" => Some(Self::Jsonl),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Arguments for batch prediction.
#[derive(Args, Clone, Default)]
pub struct PredictArgs {
    /// Image files or directories to classify
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl PredictArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        if !self.recursive {
            self.recursive = config.general.recursive.unwrap_or(false);
        }

        if self.format.is_none() {
            self.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }
        if !self.pretty {
            self.pretty = config.output.pretty.unwrap_or(false);
        }
        if !self.progress {
            self.progress = config.output.progress.unwrap_or(false);
        }

        self.model = self.model.with_config(config);
        self
    }

    /// Get output format with fallback to text.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Run the predict command.
///
/// Expects `args` to have been processed through `with_config()` first.
///
/// # Errors
///
/// Fails before any image is read if a named path is missing or the model
/// weights are not installed.
pub fn run(args: &PredictArgs) -> Result<BatchSummary> {
    info!("Running predict command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    source.verify().context("Input path missing")?;

    let model_path = args.model.resolve();
    if !model_path.is_file() {
        anyhow::bail!(
            "Model not found at {}. Run `lesion-classify models fetch --url <URL>` or pass --model.",
            model_path.display()
        );
    }
    let classifier = Arc::new(LazyClassifier::new(&model_path, get_device()));
    debug!("Using model {}", classifier.path().display());
    let predictor = LesionPredictor::new(classifier);

    let total = source.count_hint();
    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let summary = match args.format() {
        OutputFormat::Text => run_batch(
            &source,
            &predictor,
            &TextOutput::stdout(),
            &progress,
            iso_timestamp,
        )?,
        OutputFormat::Jsonl => run_batch(
            &source,
            &predictor,
            &JsonOutput::stdout(false, false),
            &progress,
            iso_timestamp,
        )?,
        OutputFormat::Json => run_batch(
            &source,
            &predictor,
            &JsonOutput::stdout(true, args.pretty),
            &progress,
            iso_timestamp,
        )?,
    };

    Ok(summary)
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
