//! Lesion Adapters - External adapters for lesion-classify.
//!
//! This crate provides adapters for:
//! - Filesystem image source (`.jpg`, `.jpeg`, `.png`)
//! - Model location, download and checksum verification

pub mod fs;
pub mod models;

pub use fs::{is_supported_image, FsImageSource};
pub use models::{model_path, models_dir, set_models_dir};
