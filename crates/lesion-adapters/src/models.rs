//! Model location, download and checksum verification.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Model metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name/identifier.
    pub name: &'static str,
    /// Filename in models directory.
    pub filename: &'static str,
    /// Short description for listings.
    pub description: &'static str,
}

/// The lesion classifier weights.
pub const MODEL: ModelInfo = ModelInfo {
    name: "lesion_cnn",
    filename: "lesion_cnn.safetensors",
    description: "Skin lesion classifier (basal_cell_carcinoma, melanoma, nevus)",
};

/// Where to download a model from.
#[derive(Debug, Clone)]
pub struct ModelSource {
    /// Download URL.
    pub url: String,
    /// Expected SHA-256 in lowercase hex; verification is skipped when absent.
    pub sha256: Option<String>,
}

/// Download progress callback: `(file_name, bytes_downloaded, total_bytes)`.
pub type ProgressCallback = Box<dyn Fn(&str, u64, Option<u64>) + Send + Sync>;

static MODELS_DIR_OVERRIDE: Lazy<RwLock<Option<PathBuf>>> = Lazy::new(|| RwLock::new(None));

/// Overrides the models directory for the rest of the process.
///
/// Passing `None` restores the default.
pub fn set_models_dir(dir: Option<PathBuf>) {
    *MODELS_DIR_OVERRIDE
        .write()
        .unwrap_or_else(PoisonError::into_inner) = dir;
}

/// Returns the models directory path.
///
/// Uses the override from [`set_models_dir`] if set, otherwise
/// `XDG_DATA_HOME/lesion-classify/models` or `~/.local/share/lesion-classify/models`.
#[must_use]
pub fn models_dir() -> PathBuf {
    let guard = MODELS_DIR_OVERRIDE
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    resolve_models_dir(guard.as_deref())
}

fn resolve_models_dir(override_dir: Option<&Path>) -> PathBuf {
    override_dir.map_or_else(
        || {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("lesion-classify")
                .join("models")
        },
        Path::to_path_buf,
    )
}

/// Returns the path of the weights file inside the models directory.
///
/// `file` replaces the default filename, e.g. from the `models.file` config
/// entry. Fetching, listing and loading all go through this path.
#[must_use]
pub fn model_path(file: Option<&str>) -> PathBuf {
    models_dir().join(file.unwrap_or(MODEL.filename))
}

/// Rejects filenames that would escape the models directory.
fn check_filename(file: &str) -> Result<()> {
    let bare = Path::new(file).file_name().and_then(|n| n.to_str()) == Some(file);
    if bare && !file.contains(['/', '\\']) {
        Ok(())
    } else {
        anyhow::bail!("Invalid model filename: {file}")
    }
}

/// Downloads the weights into the models directory.
///
/// The file is saved where [`model_path`] points for `file`. An existing file is kept
/// unless `force` is set. The download is written to a temporary name and
/// renamed once the checksum matches.
///
/// # Errors
///
/// Returns an error if:
/// - The filename is not a bare filename
/// - The models directory cannot be created
/// - The download fails
/// - The checksum doesn't match
pub fn fetch_model(
    file: Option<&str>,
    source: &ModelSource,
    force: bool,
    progress: Option<&ProgressCallback>,
) -> Result<PathBuf> {
    let filename = file.unwrap_or(MODEL.filename);
    check_filename(filename)?;

    let dir = models_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create models directory {}", dir.display()))?;

    let path = dir.join(filename);
    if path.exists() && !force {
        debug!("Model {} already exists at {}", MODEL.name, path.display());
        return Ok(path);
    }

    let bytes = download(filename, &source.url, progress)?;

    match &source.sha256 {
        Some(expected) => verify_checksum(&bytes, expected).with_context(|| {
            format!("Checksum mismatch for {filename}. Try re-running to download a fresh copy.")
        })?,
        None => debug!("No checksum configured for {filename}, skipping verification"),
    }

    let tmp = path.with_extension("part");
    fs::write(&tmp, &bytes).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("Failed to move {}", path.display()))?;

    info!("Downloaded {filename} ({} bytes)", bytes.len());
    Ok(path)
}

/// Downloads `url` into memory, reporting progress per chunk.
fn download(name: &str, url: &str, progress: Option<&ProgressCallback>) -> Result<Vec<u8>> {
    info!("Downloading model {name} from {url}");

    let mut response =
        reqwest::blocking::get(url).with_context(|| format!("Failed to download {name}"))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status: {}", response.status());
    }

    let total = response.content_length();
    let mut bytes = Vec::with_capacity(total.and_then(|t| usize::try_from(t).ok()).unwrap_or(0));
    let mut chunk = [0u8; 64 * 1024];

    loop {
        let n = response
            .read(&mut chunk)
            .with_context(|| format!("Failed to read response for {name}"))?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        if let Some(cb) = progress {
            cb(name, bytes.len() as u64, total);
        }
    }

    Ok(bytes)
}

/// Verifies that `bytes` hash to `expected` (hex SHA-256, case-insensitive).
///
/// # Errors
///
/// Returns an error naming both hashes on mismatch.
pub fn verify_checksum(bytes: &[u8], expected: &str) -> Result<()> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let actual = format!("{:x}", hasher.finalize());

    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        anyhow::bail!("expected sha256 {expected}, got {actual}")
    }
}
