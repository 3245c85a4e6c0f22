//! Result output port for writing predictions.

use crate::domain::PredictionRecord;

/// Port for outputting prediction records.
pub trait ResultOutput: Send + Sync {
    /// Writes a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, record: &PredictionRecord) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
