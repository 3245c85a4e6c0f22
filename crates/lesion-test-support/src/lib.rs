//! Test support utilities for lesion-classify.
//!
//! Provides a stub classifier, mock port implementations and synthetic image
//! builders for exercising the classification pipeline without real weights.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lesion_core::{LesionPredictor, Predictor};
//! use lesion_test_support::{StubClassifier, SyntheticImageBuilder};
//!
//! let predictor = LesionPredictor::new(Arc::new(StubClassifier::new(vec![0.1, 0.7, 0.2])));
//! let prediction = predictor
//!     .predict_image(&SyntheticImageBuilder::black_rgb(224, 224))
//!     .unwrap();
//! assert_eq!(prediction.label.as_str(), "melanoma");
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{MockImageSource, MockProgressSink, MockResultOutput, StubClassifier};
