//! Plain-text batch output.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use lesion_core::{PredictionRecord, ResultOutput};

/// Writes one `Testing on:` block per prediction.
pub struct TextOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl TextOutput {
    /// Creates a text output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a text output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

/// Final component of `path`, or the whole path if it has none.
fn display_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

impl ResultOutput for TextOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, record: &PredictionRecord) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "Testing on: {}", display_name(&record.path))?;
        writeln!(writer, "{}", record.prediction)?;
        writeln!(writer)?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
