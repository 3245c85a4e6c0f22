//! Lesion Core - Preprocessing, inference and reporting for skin lesion classification
//!
//! This crate holds the pipeline every front-end shares: image normalization,
//! classifier invocation, confidence-based label selection, and the symptom
//! summary that is echoed next to the prediction.

pub mod domain;
pub mod error;
pub mod inference;
pub mod pipeline;
pub mod ports;
pub mod predictor;
pub mod preprocess;

pub use domain::{
    summarize, DiseaseLabel, ImageInfo, Prediction, PredictionRecord, Report, Symptom,
    SymptomSelection, NO_IMAGE, NO_SYMPTOMS,
};
pub use error::{LesionError, MissingInput};
pub use inference::{predict, Classifier, LazyClassifier};
pub use pipeline::{run_batch, BatchSummary};
pub use ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
pub use predictor::{assess, InputPolicy, LesionPredictor, Predictor};
pub use preprocess::{prepare, INPUT_SIZE};
