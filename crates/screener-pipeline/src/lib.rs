//! Indicator pipeline and batch driver.
//!
//! For each symbol the pipeline selects the most recent trading days from a
//! calendar, fetches the matching bars from a price source, computes KDJ,
//! MACD and returns into an [`IndicatorFrame`](screener_core::types::IndicatorFrame)
//! and classifies it. The batch driver fans that out over a symbol list under
//! a shared [`Pacer`].

mod batch;
mod pacer;
mod pipeline;
mod report;

pub use batch::{BatchConfig, BatchDriver};
pub use pacer::Pacer;
pub use pipeline::{Analysis, IndicatorPipeline, PipelineConfig};
pub use report::{BatchReport, FailedSymbol};
