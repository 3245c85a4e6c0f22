//! Assess command - one image and/or a symptom checklist.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, ValueEnum};
use lesion_adapters::is_supported_image;
use lesion_core::inference::get_device;
use lesion_core::{
    assess, ImageInfo, InputPolicy, LazyClassifier, LesionError, LesionPredictor, Symptom,
    SymptomSelection,
};
use tracing::{debug, info};

use super::{ExitCode, ModelArgs};
use crate::config::AppConfig;

/// Output format for a single report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Prediction line, blank line, symptom line
    #[default]
    Text,
    /// One JSON object
    Json,
}

/// Arguments for a single assessment.
#[derive(Args, Clone, Default)]
pub struct AssessArgs {
    /// Lesion photo to classify
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Checked symptom, by name or slug (repeatable)
    #[arg(short, long = "symptom", value_name = "SYMPTOM")]
    pub symptoms: Vec<Symptom>,

    /// Which inputs are mandatory: either, both or image
    #[arg(long, value_name = "POLICY")]
    pub require: Option<InputPolicy>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: ReportFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl AssessArgs {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        if self.require.is_none() {
            self.require = config.assess.require;
        }
        if !self.pretty {
            self.pretty = config.output.pretty.unwrap_or(false);
        }
        self.model = self.model.with_config(config);
        self
    }
}

/// Run the assess command.
///
/// A missing input is reported on stderr and mapped to
/// [`ExitCode::MissingInput`]; every other failure is returned as an error.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded or the model is needed
/// but unavailable.
pub fn run(args: &AssessArgs) -> Result<ExitCode> {
    let policy = args.require.unwrap_or_default();
    let symptoms: SymptomSelection = args.symptoms.iter().copied().collect();
    info!(
        "Assessing (policy {policy}, image: {}, symptoms: {})",
        args.image.is_some(),
        symptoms.len()
    );

    // Missing inputs are reported before touching the image file.
    if let Err(LesionError::MissingInput(missing)) =
        policy.check(args.image.is_some(), &symptoms)
    {
        eprintln!("{missing}");
        return Ok(ExitCode::MissingInput);
    }

    if let Some(path) = args.image.as_deref().filter(|p| !is_supported_image(p)) {
        anyhow::bail!(
            "Unsupported image type: {} (expected .jpg, .jpeg or .png)",
            path.display()
        );
    }
    let image = args.image.as_ref().map(ImageInfo::open).transpose()?;

    let classifier = Arc::new(LazyClassifier::new(args.model.resolve(), get_device()));
    let shared: Arc<LazyClassifier> = Arc::clone(&classifier);
    let predictor = LesionPredictor::new(shared);

    let report = assess(&predictor, policy, image.as_ref(), symptoms)?;
    debug!(
        "Model {} loaded: {}",
        classifier.path().display(),
        classifier.is_loaded()
    );

    match args.format {
        ReportFormat::Text => println!("{report}"),
        ReportFormat::Json if args.pretty => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Json => println!("{}", serde_json::to_string(&report)?),
    }

    Ok(ExitCode::Success)
}
