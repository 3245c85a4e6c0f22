//! ML inference using Candle.
//!
//! Provides:
//! - the [`Classifier`] port every model implementation sits behind
//! - `LesionCnn`, the convolutional lesion classifier
//! - lazy safetensors loading and device selection
//! - the runner reducing a score vector to a [`Prediction`](crate::Prediction)

mod classifier;
mod cnn;
mod device;
mod loader;
mod runner;

pub use classifier::Classifier;
pub use cnn::{LesionCnn, LesionCnnConfig};
pub use device::get_device;
pub use loader::{load_safetensors, LazyClassifier};
pub use runner::{argmax, predict};
