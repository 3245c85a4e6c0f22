//! Image source port for loading images from various sources.

use crate::domain::ImageInfo;
use crate::error::LesionError;

/// Port for loading images from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source.
    ///
    /// # Errors
    ///
    /// Individual items are [`LesionError::Decode`] if an image fails to load,
    /// or [`LesionError::NotFound`] if it vanished. Both name the file, which
    /// is what the batch pipeline reports when skipping it; any other error
    /// is reported by its position in the batch.
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, LesionError>> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
