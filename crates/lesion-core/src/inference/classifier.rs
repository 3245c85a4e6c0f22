//! Classifier port.

use candle_core::Tensor;

use crate::error::Result;

/// A loaded model mapping an input tensor to per-class scores.
///
/// Implementations are read-only during inference and may be shared across
/// callers behind an `Arc`.
pub trait Classifier: Send + Sync {
    /// Runs one forward pass.
    ///
    /// # Arguments
    ///
    /// * `input` - Tensor of shape `(1, 224, 224, 3)` from [`prepare`](crate::prepare)
    ///
    /// # Returns
    ///
    /// One score per class, in [`DiseaseLabel::ALL`](crate::DiseaseLabel::ALL) order.
    ///
    /// # Errors
    ///
    /// Returns [`LesionError::ModelUnavailable`](crate::LesionError::ModelUnavailable)
    /// if the model is not loaded, or a tensor error if the forward pass fails.
    fn infer(&self, input: &Tensor) -> Result<Vec<f32>>;
}
