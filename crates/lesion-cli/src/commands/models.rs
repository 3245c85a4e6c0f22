//! Models command - manage the classifier weights.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use lesion_adapters::models::{fetch_model, ModelSource, ProgressCallback, MODEL};
use lesion_adapters::{model_path, models_dir};

use super::ModelArgs;
use crate::config::AppConfig;

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    /// Custom models directory (overrides default and config)
    #[arg(long, value_name = "DIR", global = true)]
    pub models_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Models subcommands
#[derive(Subcommand)]
pub enum ModelsCommand {
    /// Download the classifier weights
    Fetch {
        /// Download URL (overrides config `models.url`)
        #[arg(long)]
        url: Option<String>,
        /// Expected SHA-256 of the file (overrides config `models.sha256`)
        #[arg(long)]
        sha256: Option<String>,
        /// Re-download even if the file exists
        #[arg(long)]
        force: bool,
    },
    /// List installed models
    List,
    /// Print model directory path
    Path,
}

/// Run the models command.
pub fn run(args: &ModelsArgs, config: &AppConfig) -> Result<()> {
    // Resolved exactly like predict and assess.
    let model = ModelArgs {
        models_dir: args.models_dir.clone(),
        ..ModelArgs::default()
    }
    .with_config(config);
    model.apply_models_dir();
    let file = model.file.as_deref();

    match &args.command {
        ModelsCommand::Fetch { url, sha256, force } => {
            let url = url
                .clone()
                .or_else(|| config.models.url.clone())
                .context("No download URL. Pass --url or set models.url in the config file.")?;
            let source = ModelSource {
                url,
                sha256: sha256.clone().or_else(|| config.models.sha256.clone()),
            };
            fetch(file, &source, *force)
        }
        ModelsCommand::List => {
            list_models(file);
            Ok(())
        }
        ModelsCommand::Path => {
            println!("{}", models_dir().display());
            Ok(())
        }
    }
}

fn fetch(file: Option<&str>, source: &ModelSource, force: bool) -> Result<()> {
    let pb = Arc::new(ProgressBar::new(0));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}")
            .map_err(|e| anyhow::anyhow!("Invalid progress template: {e}"))?
            .progress_chars("#>-"),
    );

    let pb_clone = Arc::clone(&pb);
    let progress: ProgressCallback =
        Box::new(move |name: &str, downloaded: u64, total: Option<u64>| {
            if downloaded == 0 || pb_clone.message().is_empty() {
                pb_clone.set_message(name.to_string());
            }
            if let Some(t) = total {
                pb_clone.set_length(t);
            }
            pb_clone.set_position(downloaded);
        });

    let path = fetch_model(file, source, force, Some(&progress))?;

    pb.finish_with_message(format!("Saved to {}", path.display()));
    Ok(())
}

fn list_models(file: Option<&str>) {
    let path = model_path(file);
    let filename = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let installed = path.is_file();

    println!("Models directory: {}", models_dir().display());
    println!();

    let status = if installed { "✓" } else { "✗" };
    println!("  {status} {} ({filename}) {}", MODEL.name, MODEL.description);

    println!();
    println!("{}/1 models installed", u8::from(installed));
}
