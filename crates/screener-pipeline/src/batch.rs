//! Batch driver: runs the pipeline over a symbol list.

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use screener_core::error::DataError;
use screener_core::traits::{FrameSink, SymbolSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::pipeline::IndicatorPipeline;
use crate::report::BatchReport;

/// Batch driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Symbols beyond this many are dropped
    pub max_symbols: usize,
    /// Pipelines in flight at once
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_symbols: 500,
            concurrency: 1,
        }
    }
}

/// Runs the indicator pipeline across many symbols.
///
/// A failing symbol is recorded in the report and never stops the batch.
/// Report lists keep the input order whatever the concurrency.
pub struct BatchDriver {
    pipeline: Arc<IndicatorPipeline>,
    config: BatchConfig,
    sink: Option<Arc<dyn FrameSink>>,
}

impl BatchDriver {
    pub fn new(pipeline: Arc<IndicatorPipeline>, config: BatchConfig) -> Self {
        Self {
            pipeline,
            config,
            sink: None,
        }
    }

    /// Present every successful analysis to a sink as soon as it finishes.
    ///
    /// With `concurrency > 1` frames arrive in completion order, not input order.
    pub fn with_sink(mut self, sink: Arc<dyn FrameSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Load the symbols from a source, then run the batch.
    pub async fn run_source(
        &self,
        symbols: &dyn SymbolSource,
        as_of: NaiveDate,
    ) -> Result<BatchReport, DataError> {
        let symbols = symbols.symbols()?;
        Ok(self.run(symbols, as_of).await)
    }

    /// Run the batch for `as_of`.
    pub async fn run(&self, mut symbols: Vec<String>, as_of: NaiveDate) -> BatchReport {
        if symbols.len() > self.config.max_symbols {
            warn!(
                requested = symbols.len(),
                max_symbols = self.config.max_symbols,
                "symbol list truncated"
            );
            symbols.truncate(self.config.max_symbols);
        }

        let total = symbols.len();
        info!(
            symbols = total,
            %as_of,
            source = self.pipeline.source_name(),
            concurrency = self.config.concurrency,
            "starting batch"
        );

        let mut report = BatchReport::new(as_of);
        let pipeline = &self.pipeline;
        let sink = self.sink.as_deref();

        let mut outcomes: Vec<_> = stream::iter(symbols.into_iter().enumerate())
            .map(|(index, symbol)| async move {
                let outcome = pipeline.analyze(&symbol, as_of).await;
                if let Ok(analysis) = &outcome {
                    info!(
                        symbol = %symbol,
                        signal = %analysis.signal,
                        position = index + 1,
                        total,
                        "assessed"
                    );
                    if let Some(sink) = sink {
                        sink.present(&analysis.frame, analysis.signal);
                    }
                }
                (index, symbol, outcome)
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _, _)| *index);

        for (_, symbol, outcome) in outcomes {
            match outcome {
                Ok(analysis) => report.record(symbol, analysis.signal),
                Err(e) => report.record_failure(symbol, e.to_string()),
            }
        }

        report.finish();
        info!(
            run_id = %report.run_id,
            buy = report.buy.len(),
            sell = report.sell.len(),
            hold = report.hold.len(),
            failed = report.failed.len(),
            "batch complete"
        );
        report
    }
}
