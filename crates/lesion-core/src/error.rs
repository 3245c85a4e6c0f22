//! Error types for the classification pipeline.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by preprocessing, inference and assessment.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LesionError {
    /// The file could not be read or parsed as an image.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        /// Path of the offending file.
        path: String,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The classifier failed to load or was never initialized.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// A required input was absent at prediction time.
    #[error("{0}")]
    MissingInput(MissingInput),

    /// Tensor construction or a forward pass failed.
    #[error("tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),

    /// The classifier returned a score vector of the wrong length.
    #[error("classifier returned {actual} scores, expected {expected}")]
    ScoreCount {
        /// Number of classes in the label set.
        expected: usize,
        /// Number of scores actually returned.
        actual: usize,
    },

    /// The classifier returned NaN or an infinite score.
    #[error("classifier returned a non-finite score")]
    NonFiniteScore,

    /// A path named by the caller does not exist.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),
}

impl LesionError {
    /// The file this error is about, for variants that name one.
    #[must_use]
    pub fn path(&self) -> Option<String> {
        match self {
            Self::Decode { path, .. } => Some(path.clone()),
            Self::NotFound(path) => Some(path.display().to_string()),
            _ => None,
        }
    }
}

/// Which input was missing when an assessment was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    /// No image was supplied.
    Image,
    /// No symptom was selected.
    Symptoms,
    /// Neither an image nor any symptom was supplied.
    ImageOrSymptoms,
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Image => "Please upload an image.",
            Self::Symptoms => "Please select at least one symptom.",
            Self::ImageOrSymptoms => "Please select symptoms or upload an image (or both).",
        };
        f.write_str(msg)
    }
}

/// Convenience alias for results carrying a [`LesionError`].
pub type Result<T, E = LesionError> = std::result::Result<T, E>;
