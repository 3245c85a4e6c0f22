//! Prediction types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DiseaseLabel;

/// Classifier output reduced to a single label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Highest-scoring class.
    pub label: DiseaseLabel,
    /// Score of that class, taken as the classifier's certainty.
    pub confidence: f32,
    /// Raw per-class scores, in [`DiseaseLabel::ALL`] order.
    pub scores: Vec<f32>,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image Prediction: {} (Confidence: {:.4})",
            self.label, self.confidence
        )
    }
}

/// A prediction tied to the file it was made for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Path to the classified image.
    pub path: String,
    /// Timestamp of classification (RFC 3339).
    pub timestamp: String,
    /// The prediction itself.
    #[serde(flatten)]
    pub prediction: Prediction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_four_decimals() {
        let prediction = Prediction {
            label: DiseaseLabel::Melanoma,
            confidence: 0.7,
            scores: vec![0.1, 0.7, 0.2],
        };
        assert_eq!(
            prediction.to_string(),
            "Image Prediction: melanoma (Confidence: 0.7000)"
        );
    }
}
