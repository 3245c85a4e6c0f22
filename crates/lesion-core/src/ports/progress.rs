//! Progress reporting port for UI integration.

use crate::domain::PredictionRecord;

/// Events emitted during a batch run.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Classification started for an image.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// Classification completed for an image.
    Completed {
        /// The prediction record.
        record: PredictionRecord,
    },
    /// An image was skipped due to an error.
    Skipped {
        /// Path to the image, when known.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All images have been processed.
    Finished {
        /// Total images classified successfully.
        processed: usize,
        /// Total images skipped.
        skipped: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
