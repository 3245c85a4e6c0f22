//! The closed set of disease classes the classifier predicts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Disease class predicted from a lesion image.
///
/// Declaration order is the classifier's output order, fixed when the model
/// was trained. Reordering variants without retraining silently mislabels
/// every prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseLabel {
    /// Basal cell carcinoma.
    BasalCellCarcinoma,
    /// Melanoma.
    Melanoma,
    /// Benign melanocytic nevus (mole).
    Nevus,
}

impl DiseaseLabel {
    /// All labels, in model output order.
    pub const ALL: [Self; 3] = [Self::BasalCellCarcinoma, Self::Melanoma, Self::Nevus];

    /// Number of classes in the label set.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns the label at a score-vector index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Machine name, as used in output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BasalCellCarcinoma => "basal_cell_carcinoma",
            Self::Melanoma => "melanoma",
            Self::Nevus => "nevus",
        }
    }
}

impl fmt::Display for DiseaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_order_is_fixed() {
        let names: Vec<_> = DiseaseLabel::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(names, ["basal_cell_carcinoma", "melanoma", "nevus"]);
    }

    #[test]
    fn test_from_index() {
        for (i, label) in DiseaseLabel::ALL.iter().enumerate() {
            assert_eq!(DiseaseLabel::from_index(i), Some(*label));
        }
        assert_eq!(DiseaseLabel::from_index(DiseaseLabel::COUNT), None);
    }
}
