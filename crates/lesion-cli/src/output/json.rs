//! JSON output adapter.

use anyhow::Result;
use lesion_core::{PredictionRecord, ResultOutput};
use std::io::{self, Write};
use std::sync::Mutex;

/// JSON output adapter.
///
/// In line mode every record is written as soon as it arrives. In array mode
/// records are collected and written as one array on [`ResultOutput::flush`].
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    pending: Option<Mutex<Vec<PredictionRecord>>>,
    pretty: bool,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(array: bool, pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), array, pretty)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, array: bool, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            pending: array.then(|| Mutex::new(Vec::new())),
            pretty,
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_line(&self, json: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, record: &PredictionRecord) -> Result<()> {
        if let Some(pending) = &self.pending {
            pending
                .lock()
                .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
                .push(record.clone());
            return Ok(());
        }
        self.write_line(&serde_json::to_string(record)?)
    }

    fn flush(&self) -> Result<()> {
        if let Some(pending) = &self.pending {
            let records = std::mem::take(
                &mut *pending
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
            );
            let json = if self.pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            self.write_line(&json)?;
        }

        self.writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
            .flush()?;
        Ok(())
    }
}
