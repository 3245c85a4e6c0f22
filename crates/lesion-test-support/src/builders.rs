//! Synthetic image builders for testing.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
use lesion_core::domain::ImageInfo;

/// Builder for synthetic lesion-like test images.
///
/// Covers each channel layout the preprocessor has to handle: RGB,
/// grayscale, grayscale with alpha, and RGBA.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === RGB ===

    /// Creates an all-black RGB image.
    #[must_use]
    pub fn black_rgb(width: u32, height: u32) -> ImageInfo {
        ImageInfo::new("synthetic://black", DynamicImage::new_rgb8(width, height))
    }

    /// Creates a uniform RGB image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, Rgb([r, g, b]));
        ImageInfo::new("synthetic://rgb_uniform", DynamicImage::ImageRgb8(img))
    }

    /// Creates a dark round blotch on skin-toned background.
    #[must_use]
    pub fn lesion(width: u32, height: u32) -> ImageInfo {
        let cx = i64::from(width / 2);
        let cy = i64::from(height / 2);
        let r = i64::from(width.min(height) / 4);

        let img = RgbImage::from_fn(width, height, |x, y| {
            let dx = i64::from(x) - cx;
            let dy = i64::from(y) - cy;
            if dx * dx + dy * dy <= r * r {
                Rgb([70, 40, 30])
            } else {
                Rgb([225, 180, 160])
            }
        });
        ImageInfo::new("synthetic://lesion", DynamicImage::ImageRgb8(img))
    }

    /// Creates an RGB gradient with distinct values per channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn rgb_gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let r = ((255 * x) / width.max(1)) as u8;
            let g = ((255 * y) / height.max(1)) as u8;
            Rgb([r, g, r / 2 + g / 2])
        })
    }

    // === Grayscale ===

    /// Creates a horizontal grayscale gradient.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn gray_gradient(width: u32, height: u32) -> ImageInfo {
        let img = GrayImage::from_fn(width, height, |x, _| {
            Luma([((255 * x) / width.max(1)) as u8])
        });
        ImageInfo::new("synthetic://gray_gradient", DynamicImage::ImageLuma8(img))
    }

    /// Creates a grayscale image with a varying alpha channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn gray_alpha(width: u32, height: u32, value: u8) -> ImageInfo {
        let img: ImageBuffer<LumaA<u8>, Vec<u8>> =
            ImageBuffer::from_fn(width, height, |x, _| LumaA([value, (x % 256) as u8]));
        ImageInfo::new("synthetic://gray_alpha", DynamicImage::ImageLumaA8(img))
    }

    // === Alpha ===

    /// Adds an alpha channel to `rgb`, varying per pixel.
    ///
    /// Color data is copied unchanged, so preprocessing should match the
    /// plain RGB image exactly.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_varying_alpha(rgb: &RgbImage) -> RgbaImage {
        RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
            let [r, g, b] = rgb.get_pixel(x, y).0;
            Rgba([r, g, b, ((x * 3 + y) % 256) as u8])
        })
    }
}
