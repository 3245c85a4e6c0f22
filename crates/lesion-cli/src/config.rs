//! Configuration file support for lesion-classify.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/lesion-classify/config.toml` (lowest priority)
//! - Project-local: `.lesion-classify.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use lesion_core::InputPolicy;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Project-local config filename.
const PROJECT_CONFIG: &str = ".lesion-classify.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Model settings.
    pub models: ModelsConfig,
    /// Single-assessment settings.
    pub assess: AssessConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Model configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom models directory path.
    pub dir: Option<PathBuf>,
    /// Weights filename inside the models directory.
    pub file: Option<String>,
    /// Download URL used by `models fetch`.
    pub url: Option<String>,
    /// Expected SHA-256 of the downloaded weights.
    pub sha256: Option<String>,
}

/// Assessment configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AssessConfig {
    /// Which inputs are mandatory.
    pub require: Option<InputPolicy>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/lesion-classify/config.toml`
    /// 2. Project-local: `.lesion-classify.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Unreadable files and invalid
    /// values are reported as warnings and ignored.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        for problem in config.sanitize() {
            eprintln!("warning: {problem}");
        }

        config
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref f) = self.output.format {
            if !matches!(f.as_str(), "text" | "json" | "jsonl") {
                return Err(format!(
                    "output.format must be 'text', 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        if let Some(ref sha) = self.models.sha256 {
            if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!(
                    "models.sha256 must be 64 hex characters, got '{sha}'"
                ));
            }
        }

        if let Some(ref file) = self.models.file {
            if file.is_empty() || file.contains(['/', '\\']) {
                return Err(format!("models.file must be a bare filename, got '{file}'"));
            }
        }

        Ok(())
    }

    /// Drops invalid values one at a time, returning a message for each.
    fn sanitize(&mut self) -> Vec<String> {
        let mut problems = Vec::new();
        while let Err(e) = self.validate() {
            if e.starts_with("output.format") {
                self.output.format = None;
            } else if e.starts_with("models.sha256") {
                self.models.sha256 = None;
            } else if e.starts_with("models.file") {
                self.models.file = None;
            } else {
                problems.push(e);
                break;
            }
            problems.push(format!("{e} (ignored)"));
        }
        problems
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Models
        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());
        self.models.file = other.models.file.or_else(|| self.models.file.take());
        self.models.url = other.models.url.or_else(|| self.models.url.take());
        self.models.sha256 = other.models.sha256.or_else(|| self.models.sha256.take());

        // Assess
        self.assess.require = other.assess.require.or(self.assess.require);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lesion-classify").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.lesion-classify.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG))
        .find(|path| path.exists())
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("warning: ignoring config file {}: {e}", path.display());
            None
        }
    }
}
