//! Mock implementations of core ports and the classifier.

use std::sync::{Arc, Mutex, PoisonError};

use candle_core::Tensor;
use lesion_core::domain::{ImageInfo, PredictionRecord};
use lesion_core::ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
use lesion_core::{Classifier, LesionError};

/// Classifier returning a fixed score vector.
///
/// Records the shape of every tensor it receives so tests can assert on what
/// reached the model.
pub struct StubClassifier {
    scores: Option<Vec<f32>>,
    seen_shapes: Mutex<Vec<Vec<usize>>>,
}

impl StubClassifier {
    /// Creates a stub that always returns `scores`.
    #[must_use]
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            scores: Some(scores),
            seen_shapes: Mutex::new(Vec::new()),
        }
    }

    /// Creates a stub that behaves like a model that never loaded.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            scores: None,
            seen_shapes: Mutex::new(Vec::new()),
        }
    }

    /// Number of inference calls made.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.seen_shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Shapes of the input tensors received, in call order.
    #[must_use]
    pub fn seen_shapes(&self) -> Vec<Vec<usize>> {
        self.seen_shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Classifier for StubClassifier {
    fn infer(&self, input: &Tensor) -> lesion_core::error::Result<Vec<f32>> {
        self.seen_shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input.dims().to_vec());
        self.scores
            .clone()
            .ok_or_else(|| LesionError::ModelUnavailable("stub classifier not loaded".into()))
    }
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images, optionally interleaved with load failures.
pub struct MockImageSource {
    entries: Vec<Entry>,
    iteration_count: Arc<Mutex<usize>>,
}

enum Entry {
    Image(ImageInfo),
    Corrupt(String),
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            entries: images.into_iter().map(Entry::Image).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an entry that fails to decode.
    #[must_use]
    pub fn with_corrupt(mut self, path: impl Into<String>) -> Self {
        self.entries.push(Entry::Corrupt(path.into()));
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, LesionError>> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(self.entries.iter().map(|entry| match entry {
            Entry::Image(info) => Ok(info.clone()),
            Entry::Corrupt(path) => Err(LesionError::Decode {
                path: path.clone(),
                source: image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "corrupt test image",
                )),
            }),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures records for later assertions.
pub struct MockResultOutput {
    records: Arc<Mutex<Vec<PredictionRecord>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured records.
    #[must_use]
    pub fn records(&self) -> Vec<PredictionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, record: &PredictionRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};

    #[test]
    fn test_stub_classifier_records_calls() {
        let stub = StubClassifier::new(vec![0.2, 0.3, 0.5]);
        let input = Tensor::zeros((1, 224, 224, 3), DType::F32, &Device::Cpu).unwrap();

        assert_eq!(stub.infer(&input).unwrap(), vec![0.2, 0.3, 0.5]);
        assert_eq!(stub.calls(), 1);
        assert_eq!(stub.seen_shapes(), vec![vec![1, 224, 224, 3]]);
    }

    #[test]
    fn test_unavailable_stub() {
        let stub = StubClassifier::unavailable();
        let input = Tensor::zeros((1, 224, 224, 3), DType::F32, &Device::Cpu).unwrap();
        assert!(matches!(
            stub.infer(&input),
            Err(LesionError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_mock_image_source_with_corrupt_entry() {
        let source = MockImageSource::new(vec![ImageInfo::new(
            "a.png",
            image::DynamicImage::new_rgb8(4, 4),
        )])
        .with_corrupt("broken.jpg");

        assert_eq!(source.count_hint(), Some(2));
        let loaded: Vec<_> = source.images().collect();
        assert!(loaded[0].is_ok());
        assert!(matches!(loaded[1], Err(LesionError::Decode { .. })));
        assert_eq!(source.iteration_count(), 1);
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();
        sink.on_event(ProgressEvent::Started {
            path: "lesion.jpg".into(),
            index: 0,
            total: Some(1),
        });
        sink.on_event(ProgressEvent::Finished {
            processed: 1,
            skipped: 0,
        });

        assert_eq!(sink.started_count(), 1);
        assert_eq!(sink.finished_counts(), Some((1, 0)));
    }
}
