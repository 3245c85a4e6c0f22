//! CLI command definitions and handlers.

pub mod assess;
pub mod models;
pub mod predict;
pub mod symptoms;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lesion_adapters::{model_path, set_models_dir};
use tracing::debug;

use crate::config::AppConfig;

/// Lesion Classify - Skin lesion image classification
#[derive(Parser)]
#[command(name = "lesion-classify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Batch prediction arguments used when no subcommand is given.
    #[command(flatten)]
    pub predict: predict::PredictArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Classify every image in the given files or directories
    Predict(predict::PredictArgs),
    /// Assess a single image and/or a set of symptoms
    Assess(assess::AssessArgs),
    /// List the symptom checklist
    Symptoms,
    /// Manage the classifier weights
    Models(models::ModelsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed.
    Success = 0,
    /// Fatal error (missing model, missing path, decode failure, bad arguments).
    Error = 1,
    /// An assessment was missing a required input.
    MissingInput = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Where to find the classifier weights.
#[derive(Args, Clone, Default)]
pub struct ModelArgs {
    /// Path to the model weights (overrides models directory and config)
    #[arg(long, value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR")]
    pub models_dir: Option<PathBuf>,

    /// Weights filename inside the models directory, from config.
    #[arg(skip)]
    pub file: Option<String>,
}

impl ModelArgs {
    /// Fills unset values from the config file.
    #[must_use]
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        if self.models_dir.is_none() {
            self.models_dir.clone_from(&config.models.dir);
        }
        if self.file.is_none() {
            self.file.clone_from(&config.models.file);
        }
        self
    }

    /// Applies `--models-dir` as the process-wide models directory.
    pub fn apply_models_dir(&self) {
        if let Some(dir) = &self.models_dir {
            debug!("Using custom models directory: {}", dir.display());
            set_models_dir(Some(dir.clone()));
        }
    }

    /// Resolves the weights path.
    ///
    /// `--model` wins outright. Otherwise the configured file is looked up
    /// in the models directory, the same place `models fetch` writes to.
    #[must_use]
    pub fn resolve(&self) -> PathBuf {
        if let Some(model) = &self.model {
            return model.clone();
        }

        self.apply_models_dir();
        model_path(self.file.as_deref())
    }
}
