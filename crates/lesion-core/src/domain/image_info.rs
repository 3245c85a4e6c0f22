//! Decoded image held for the duration of one prediction request.

use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageReader};

use crate::error::{LesionError, Result};

/// Basic image information extracted during loading.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path to the image file.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: DynamicImage,
}

impl ImageInfo {
    /// Wraps an already decoded image.
    #[must_use]
    pub fn new(path: impl Into<String>, image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            path: path.into(),
            width,
            height,
            image,
        }
    }

    /// Opens and decodes an image file.
    ///
    /// The format is detected from the file contents, so a mislabelled
    /// extension still decodes.
    ///
    /// # Errors
    ///
    /// Returns [`LesionError::Decode`] if the file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.to_string_lossy().into_owned();
        let decode_err = |source| LesionError::Decode {
            path: display.clone(),
            source,
        };

        let image = ImageReader::open(path)
            .map_err(|e| decode_err(image::ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| decode_err(image::ImageError::IoError(e)))?
            .decode()
            .map_err(decode_err)?;

        Ok(Self::new(display, image))
    }
}

impl std::ops::Deref for ImageInfo {
    type Target = DynamicImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_records_dimensions() {
        let info = ImageInfo::new("a.png", DynamicImage::new_rgb8(30, 20));
        assert_eq!(info.width, 30);
        assert_eq!(info.height, 20);
    }

    #[test]
    fn test_open_round_trips_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        DynamicImage::new_rgb8(12, 9).save(&path).unwrap();

        let info = ImageInfo::open(&path).expect("png should decode");
        assert_eq!((info.width, info.height), (12, 9));
    }

    #[test]
    fn test_open_corrupt_file_is_decode_error() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(b"definitely not a jpeg").unwrap();

        let err = ImageInfo::open(file.path()).unwrap_err();
        assert!(matches!(err, LesionError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn test_open_missing_file_is_decode_error() {
        let err = ImageInfo::open("/nonexistent/lesion.png").unwrap_err();
        assert!(matches!(err, LesionError::Decode { .. }));
    }
}
