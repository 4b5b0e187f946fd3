mod batch;
mod export;

pub use batch::{BatchCalculator, BatchError, BatchRecord, ResultRow};
pub use export::HistoryExporter;
