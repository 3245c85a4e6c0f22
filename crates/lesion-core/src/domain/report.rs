//! Text report combining an image prediction with the symptom checklist.

use std::fmt;

use serde::Serialize;

use super::{summarize, Prediction, SymptomSelection};

/// First line of a report when no image was supplied.
pub const NO_IMAGE: &str = "No image uploaded.";

/// Outcome of one assessment request.
///
/// The prediction and the symptoms are independent; they are only placed
/// next to each other for display.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Image-based prediction, if an image was supplied.
    pub prediction: Option<Prediction>,
    /// Symptoms checked by the user.
    pub symptoms: SymptomSelection,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prediction {
            Some(p) => write!(f, "{p}")?,
            None => f.write_str(NO_IMAGE)?,
        }
        f.write_str("\n\n")?;
        if self.symptoms.is_empty() {
            f.write_str(&summarize(&self.symptoms))
        } else {
            write!(f, "Symptoms selected: {}", summarize(&self.symptoms))
        }
    }
}
