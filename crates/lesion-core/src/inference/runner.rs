//! Reduces classifier output to a single labelled prediction.

use candle_core::Tensor;
use tracing::debug;

use super::Classifier;
use crate::domain::{DiseaseLabel, Prediction};
use crate::error::{LesionError, Result};

/// Runs the classifier once and picks the highest-scoring label.
///
/// Confidence is the winning score as returned; no renormalization is
/// applied. Ties go to the earliest label in [`DiseaseLabel::ALL`] order.
///
/// # Errors
///
/// - Any error from the classifier, including
///   [`LesionError::ModelUnavailable`]
/// - [`LesionError::ScoreCount`] if the score vector length is not the
///   number of labels
/// - [`LesionError::NonFiniteScore`] if a score is NaN or infinite
pub fn predict(input: &Tensor, classifier: &dyn Classifier) -> Result<Prediction> {
    let scores = classifier.infer(input)?;

    if scores.len() != DiseaseLabel::COUNT {
        return Err(LesionError::ScoreCount {
            expected: DiseaseLabel::COUNT,
            actual: scores.len(),
        });
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(LesionError::NonFiniteScore);
    }

    let (index, confidence) = argmax(&scores).ok_or(LesionError::ScoreCount {
        expected: DiseaseLabel::COUNT,
        actual: 0,
    })?;
    let label = DiseaseLabel::from_index(index).ok_or(LesionError::ScoreCount {
        expected: DiseaseLabel::COUNT,
        actual: scores.len(),
    })?;

    debug!("Scores {scores:?} -> {label} ({confidence:.4})");

    Ok(Prediction {
        label,
        confidence,
        scores,
    })
}

/// Index and value of the maximum score; the first maximum wins ties.
///
/// Returns `None` for an empty slice.
#[must_use]
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, s)| match best {
            Some((_, b)) if s <= b => best,
            _ => Some((i, s)),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};

    struct Fixed(Vec<f32>);

    impl Classifier for Fixed {
        fn infer(&self, _input: &Tensor) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    struct Unloaded;

    impl Classifier for Unloaded {
        fn infer(&self, _input: &Tensor) -> Result<Vec<f32>> {
            Err(LesionError::ModelUnavailable("not initialized".into()))
        }
    }

    fn input() -> Tensor {
        Tensor::zeros((1, 224, 224, 3), DType::F32, &Device::Cpu).unwrap()
    }

    #[test]
    fn test_predict_picks_max() {
        let prediction = predict(&input(), &Fixed(vec![0.1, 0.7, 0.2])).unwrap();
        assert_eq!(prediction.label, DiseaseLabel::Melanoma);
        assert_eq!(prediction.confidence, 0.7);
        assert_eq!(prediction.scores, vec![0.1, 0.7, 0.2]);
    }

    #[test]
    fn test_tie_break_prefers_earlier_label() {
        let p = predict(&input(), &Fixed(vec![0.4, 0.4, 0.2])).unwrap();
        assert_eq!(p.label, DiseaseLabel::BasalCellCarcinoma);

        let p = predict(&input(), &Fixed(vec![0.2, 0.4, 0.4])).unwrap();
        assert_eq!(p.label, DiseaseLabel::Melanoma);

        let third = 1.0 / 3.0;
        let p = predict(&input(), &Fixed(vec![third; 3])).unwrap();
        assert_eq!(p.label, DiseaseLabel::BasalCellCarcinoma);
    }

    #[test]
    fn test_confidence_is_not_renormalized() {
        let p = predict(&input(), &Fixed(vec![0.1, 0.1, 0.3])).unwrap();
        assert_eq!(p.label, DiseaseLabel::Nevus);
        assert_eq!(p.confidence, 0.3);
    }

    #[test]
    fn test_wrong_score_count() {
        let err = predict(&input(), &Fixed(vec![0.5, 0.5])).unwrap_err();
        assert!(matches!(
            err,
            LesionError::ScoreCount {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_non_finite_score() {
        let err = predict(&input(), &Fixed(vec![0.1, f32::NAN, 0.2])).unwrap_err();
        assert!(matches!(err, LesionError::NonFiniteScore));
    }

    #[test]
    fn test_unloaded_model_propagates() {
        let err = predict(&input(), &Unloaded).unwrap_err();
        assert!(matches!(err, LesionError::ModelUnavailable(_)));
    }

    #[test]
    fn test_predict_is_deterministic() {
        let classifier = Fixed(vec![0.25, 0.35, 0.4]);
        let a = predict(&input(), &classifier).unwrap();
        let b = predict(&input(), &classifier).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(argmax(&[]), None);
    }
}
