//! Core domain types for lesion classification.

mod image_info;
mod label;
mod prediction;
mod report;
mod symptom;

pub use image_info::ImageInfo;
pub use label::DiseaseLabel;
pub use prediction::{Prediction, PredictionRecord};
pub use report::{Report, NO_IMAGE};
pub use symptom::{summarize, Symptom, SymptomSelection, UnknownSymptom, NO_SYMPTOMS};
