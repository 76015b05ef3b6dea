//! Per-run orchestration: fetch, band, detect, dedup, deliver, record.

mod pipeline;
mod summary;

pub use pipeline::{AlertPipeline, PipelineConfig, SymbolOutcome};
pub use summary::RunSummary;
