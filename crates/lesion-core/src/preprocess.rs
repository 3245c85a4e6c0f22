//! Image normalization into the classifier's input tensor.
//!
//! The steps and their order are fixed by how the model was trained:
//! resize, scale to `[0, 1]`, coerce to three channels, add a batch axis.

// Allow common image code patterns
#![allow(clippy::cast_possible_truncation)]

use candle_core::{Device, Tensor};
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::trace;

use crate::error::Result;

/// Side length of the square model input.
pub const INPUT_SIZE: usize = 224;

/// Number of color channels the model expects.
pub const INPUT_CHANNELS: usize = 3;

/// Default resampling filter (bicubic).
const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Converts a decoded image into a `(1, 224, 224, 3)` tensor in `[0, 1]`.
///
/// - Images already at 224x224 are not resampled.
/// - Single-channel data is replicated into three identical channels.
/// - A fourth (alpha) channel is dropped; grayscale+alpha keeps only luma.
/// - Samples wider than 8 bits are reduced to 8 bits first so the division
///   by 255 stays within range.
///
/// The tensor is created on the CPU in NHWC layout.
///
/// # Errors
///
/// Returns an error if tensor creation fails.
pub fn prepare(image: &DynamicImage) -> Result<Tensor> {
    let size = INPUT_SIZE as u32;
    let resized = if image.width() == size && image.height() == size {
        image.clone()
    } else {
        trace!(
            "Resizing {}x{} -> {size}x{size}",
            image.width(),
            image.height()
        );
        image.resize_exact(size, size, RESAMPLE_FILTER)
    };

    let (raw, channels) = into_raw_u8(resized);

    let mut data = Vec::with_capacity(INPUT_SIZE * INPUT_SIZE * INPUT_CHANNELS);
    for pixel in raw.chunks_exact(channels) {
        match channels {
            1 | 2 => {
                let v = f32::from(pixel[0]) / 255.0;
                data.extend_from_slice(&[v, v, v]);
            }
            _ => data.extend(pixel[..INPUT_CHANNELS].iter().map(|&c| f32::from(c) / 255.0)),
        }
    }

    Ok(Tensor::from_vec(
        data,
        (1, INPUT_SIZE, INPUT_SIZE, INPUT_CHANNELS),
        &Device::Cpu,
    )?)
}

/// Flattens an image to interleaved 8-bit samples, keeping its channel count.
fn into_raw_u8(image: DynamicImage) -> (Vec<u8>, usize) {
    match image {
        DynamicImage::ImageLuma8(buf) => (buf.into_raw(), 1),
        DynamicImage::ImageLumaA8(buf) => (buf.into_raw(), 2),
        DynamicImage::ImageRgb8(buf) => (buf.into_raw(), 3),
        DynamicImage::ImageRgba8(buf) => (buf.into_raw(), 4),
        other => {
            let color = other.color();
            match (color.has_color(), color.has_alpha()) {
                (false, false) => (other.to_luma8().into_raw(), 1),
                (false, true) => (other.to_luma_alpha8().into_raw(), 2),
                (true, false) => (other.to_rgb8().into_raw(), 3),
                (true, true) => (other.to_rgba8().into_raw(), 4),
            }
        }
    }
}
