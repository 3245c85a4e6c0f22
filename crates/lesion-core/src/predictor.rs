//! The prediction capability shared by every front-end.
//!
//! Front-ends hold a [`Predictor`] and call [`assess`]; they never touch the
//! classifier or the tensor directly.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ImageInfo, Prediction, Report, SymptomSelection};
use crate::error::{LesionError, MissingInput, Result};
use crate::inference::{predict, Classifier};
use crate::preprocess::prepare;

/// Something that can classify a lesion image.
pub trait Predictor: Send + Sync {
    /// Classifies one decoded image.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails.
    fn predict_image(&self, image: &ImageInfo) -> Result<Prediction>;
}

/// Standard predictor: [`prepare`] followed by [`predict`].
#[derive(Clone)]
pub struct LesionPredictor {
    classifier: Arc<dyn Classifier>,
}

impl LesionPredictor {
    /// Creates a predictor around an already constructed classifier.
    #[must_use]
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

impl Predictor for LesionPredictor {
    fn predict_image(&self, image: &ImageInfo) -> Result<Prediction> {
        debug!("Classifying {} ({}x{})", image.path, image.width, image.height);
        let input = prepare(&image.image)?;
        predict(&input, self.classifier.as_ref())
    }
}

/// Which inputs must be present before an assessment runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// An image, symptoms, or both.
    #[default]
    Either,
    /// An image and at least one symptom.
    Both,
    /// An image; symptoms are optional.
    #[serde(rename = "image")]
    ImageRequired,
}

impl InputPolicy {
    /// Checks the supplied inputs against this policy.
    ///
    /// # Errors
    ///
    /// Returns [`LesionError::MissingInput`] naming what is absent. Under
    /// [`InputPolicy::Both`] missing symptoms are reported before a missing
    /// image.
    pub fn check(self, has_image: bool, symptoms: &SymptomSelection) -> Result<()> {
        let has_symptoms = !symptoms.is_empty();
        let missing = match self {
            Self::Either if !has_image && !has_symptoms => Some(MissingInput::ImageOrSymptoms),
            Self::Both if !has_symptoms => Some(MissingInput::Symptoms),
            Self::Both | Self::ImageRequired if !has_image => Some(MissingInput::Image),
            _ => None,
        };
        missing.map_or(Ok(()), |m| Err(LesionError::MissingInput(m)))
    }

    /// Config and CLI spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Either => "either",
            Self::Both => "both",
            Self::ImageRequired => "image",
        }
    }
}

impl fmt::Display for InputPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "either" => Ok(Self::Either),
            "both" => Ok(Self::Both),
            "image" => Ok(Self::ImageRequired),
            other => Err(format!(
                "'{other}' is not a valid policy (expected either, both or image)"
            )),
        }
    }
}

/// Runs one assessment request.
///
/// The policy is checked before any inference. The classifier is only
/// invoked when an image is present, so a symptoms-only request never needs
/// a loaded model.
///
/// # Errors
///
/// Returns [`LesionError::MissingInput`] if the policy is not met, or any
/// error from [`Predictor::predict_image`].
pub fn assess(
    predictor: &dyn Predictor,
    policy: InputPolicy,
    image: Option<&ImageInfo>,
    symptoms: SymptomSelection,
) -> Result<Report> {
    policy.check(image.is_some(), &symptoms)?;

    let prediction = image.map(|img| predictor.predict_image(img)).transpose()?;

    Ok(Report {
        prediction,
        symptoms,
    })
}
