use std::io::Write;

use salary_core::PayrollService;
use tracing::info;

use crate::batch::{BatchCalculator, BatchError};

/// Dumps stored calculation history as CSV, in the same layout the batch
/// calculator writes.
pub struct HistoryExporter;

impl HistoryExporter {
    /// Writes the `limit` most recent results, newest first, and returns how
    /// many were written. `limit` is clamped the same way as the HTTP history.
    pub async fn export<W: Write>(
        service: &PayrollService,
        limit: u32,
        writer: W,
    ) -> Result<usize, BatchError> {
        let results = service.history(limit).await?;
        let written = BatchCalculator::write_results(writer, &results)?;

        info!(written, limit, "history exported");
        Ok(written)
    }
}
