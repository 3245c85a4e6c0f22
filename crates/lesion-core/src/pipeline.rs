//! Batch classification over an image source.

use anyhow::Result;
use tracing::{info, warn};

use crate::domain::PredictionRecord;
use crate::error::LesionError;
use crate::ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
use crate::predictor::Predictor;

/// Counts from a finished batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Images classified successfully.
    pub processed: usize,
    /// Images that failed to decode or classify.
    pub skipped: usize,
}

/// Classifies every image from `source`, one at a time.
///
/// Undecodable images are reported through `progress` as skipped and the run
/// continues. An unavailable model stops the run, since no later image could
/// succeed either.
///
/// `timestamp` supplies the RFC 3339 time stamped on each record.
///
/// # Errors
///
/// Returns an error if the model is unavailable or writing output fails.
pub fn run_batch<F>(
    source: &dyn ImageSource,
    predictor: &dyn Predictor,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
    timestamp: F,
) -> Result<BatchSummary>
where
    F: Fn() -> String,
{
    let total = source.count_hint();
    let mut summary = BatchSummary::default();

    for (index, loaded) in source.images().enumerate() {
        let image = match loaded {
            Ok(img) => img,
            Err(e) => {
                let path = e.path().unwrap_or_else(|| format!("image {index}"));
                progress.on_event(ProgressEvent::Skipped {
                    path,
                    reason: e.to_string(),
                });
                summary.skipped += 1;
                continue;
            }
        };

        progress.on_event(ProgressEvent::Started {
            path: image.path.clone(),
            index,
            total,
        });

        let prediction = match predictor.predict_image(&image) {
            Ok(p) => p,
            Err(e @ LesionError::ModelUnavailable(_)) => return Err(e.into()),
            Err(e) => {
                warn!("Classification failed for {}: {e}", image.path);
                progress.on_event(ProgressEvent::Skipped {
                    path: image.path.clone(),
                    reason: e.to_string(),
                });
                summary.skipped += 1;
                continue;
            }
        };

        let record = PredictionRecord {
            path: image.path,
            timestamp: timestamp(),
            prediction,
        };

        output.write(&record)?;
        progress.on_event(ProgressEvent::Completed { record });
        summary.processed += 1;
    }

    output.flush()?;

    info!(
        "Batch finished: {} processed, {} skipped",
        summary.processed, summary.skipped
    );
    progress.on_event(ProgressEvent::Finished {
        processed: summary.processed,
        skipped: summary.skipped,
    });

    Ok(summary)
}
