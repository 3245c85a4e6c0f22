//! Filesystem adapter for loading images.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use lesion_core::{ImageInfo, ImageSource, LesionError};
use tracing::{debug, warn};

/// Extensions the classifier front-ends accept.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Filesystem image source adapter.
///
/// The paths are scanned once, on first use; later calls reuse that listing.
pub struct FsImageSource {
    paths: Vec<PathBuf>,
    recursive: bool,
    files: OnceLock<Vec<PathBuf>>,
}

impl FsImageSource {
    /// Creates a new filesystem image source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self {
            paths,
            recursive,
            files: OnceLock::new(),
        }
    }

    /// Checks that every configured path exists.
    ///
    /// # Errors
    ///
    /// Returns [`LesionError::NotFound`] for the first missing path.
    pub fn verify(&self) -> Result<(), LesionError> {
        match self.paths.iter().find(|p| !p.exists()) {
            Some(missing) => Err(LesionError::NotFound(missing.clone())),
            None => Ok(()),
        }
    }

    /// Image files under the configured paths, scanned on first call.
    fn files(&self) -> &[PathBuf] {
        self.files.get_or_init(|| {
            let files = self.collect_files();
            debug!("Found {} image files", files.len());
            files
        })
    }

    /// Collects all image files from the configured paths, sorted per
    /// directory so output order is stable.
    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                if is_supported_image(path) {
                    files.push(path.clone());
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut files);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();

        for path in paths {
            if path.is_file() && is_supported_image(&path) {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }
}

impl ImageSource for FsImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, LesionError>> + Send + '_> {
        Box::new(self.files().iter().map(ImageInfo::open))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.files().len())
    }
}

/// Checks if a path has a supported image extension (`jpg`, `jpeg` or
/// `png`, any case).
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}
