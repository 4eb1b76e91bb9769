//! Per-symbol indicator pipeline: bars -> KDJ -> MACD -> signal.

use chrono::NaiveDate;
use screener_core::error::{DataError, IndicatorError};
use screener_core::traits::{PriceSource, SeriesIndicator, TradingCalendar};
use screener_core::types::{FrameOrder, FrameRow, IndicatorFrame, Series, Signal};
use screener_indicators::{percent_returns, Kdj, Macd, MacdSpans};
use screener_signals::{SignalEvaluator, SignalRule};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::pacer::Pacer;

/// Indicator pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bars analysed per symbol, minus one
    pub period: usize,
    /// KDJ RSV window
    pub kdj_window: usize,
    /// KDJ K/D starting value
    pub kdj_seed: f64,
    /// MACD EMA spans
    pub macd: MacdSpans,
    /// Signal rule
    pub signal: SignalRule,
    /// Calendar days searched for trading days; derived from `period` if unset
    pub lookback_days: Option<i64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            period: 98,
            kdj_window: 9,
            kdj_seed: 50.0,
            macd: MacdSpans::STANDARD,
            signal: SignalRule::default(),
            lookback_days: None,
        }
    }
}

impl PipelineConfig {
    /// Number of bars fetched per symbol.
    pub fn bars(&self) -> usize {
        self.period + 1
    }

    /// Calendar days searched for the trading days to analyse.
    pub fn lookback_days(&self) -> i64 {
        self.lookback_days.unwrap_or(2 * self.bars() as i64 + 30)
    }

    /// Check every indicator parameter.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.kdj_window == 0 {
            return Err(IndicatorError::InvalidParameter(
                "KDJ window must be greater than 0".into(),
            ));
        }
        if self.lookback_days.is_some_and(|days| days <= 0) {
            return Err(IndicatorError::InvalidParameter(
                "lookback must be a positive number of days".into(),
            ));
        }
        self.macd.validate()?;
        self.signal.validate()
    }
}

/// Result of running the pipeline for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub symbol: String,
    /// Indicator frame, newest bar first
    pub frame: IndicatorFrame,
    pub signal: Signal,
}

/// Runs the indicator engines and the signal evaluator for one symbol.
pub struct IndicatorPipeline {
    config: PipelineConfig,
    source: Arc<dyn PriceSource>,
    calendar: Arc<dyn TradingCalendar>,
    pacer: Arc<Pacer>,
    kdj: Kdj,
    macd: Macd,
    evaluator: SignalEvaluator,
}

impl IndicatorPipeline {
    /// Create a pipeline. Fails if the indicator parameters are invalid.
    pub fn new(
        config: PipelineConfig,
        source: Arc<dyn PriceSource>,
        calendar: Arc<dyn TradingCalendar>,
    ) -> Result<Self, IndicatorError> {
        config.validate()?;

        Ok(Self {
            kdj: Kdj::with_window(config.kdj_window).with_seed(config.kdj_seed),
            macd: Macd::with_spans(config.macd),
            evaluator: SignalEvaluator::new(config.signal),
            pacer: Arc::new(Pacer::unlimited()),
            config,
            source,
            calendar,
        })
    }

    /// Pass every price-source call through a shared pacer.
    pub fn with_pacer(mut self, pacer: Arc<Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Name of the underlying price source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Fetch the most recent `period + 1` trading days of bars up to `as_of`.
    pub async fn fetch_series(&self, symbol: &str, as_of: NaiveDate) -> Result<Series, DataError> {
        let days = self
            .calendar
            .recent_days(as_of, self.config.bars(), self.config.lookback_days())?;

        self.pacer.acquire().await;
        let mut available = self.source.daily_bars(symbol).await?;

        let bars = days
            .iter()
            .map(|day| available.remove(day).ok_or(DataError::MissingBar(*day)))
            .collect::<Result<Vec<_>, _>>()?;

        Series::new(symbol, bars)
    }

    /// Compute every indicator column, oldest bar first.
    pub fn compute_frame(&self, series: &Series) -> IndicatorFrame {
        let kdj = self.kdj.calculate_series(series);
        let macd = self.macd.calculate_series(series);
        let returns = percent_returns(&series.closes());

        let rows = series
            .iter()
            .zip(kdj)
            .zip(macd)
            .zip(returns)
            .map(|(((bar, kdj), macd), returns)| FrameRow {
                bar: *bar,
                returns,
                k: kdj.k,
                d: kdj.d,
                j: kdj.j,
                dif: macd.dif,
                dea: macd.dea,
                macd: macd.macd,
            })
            .collect();

        IndicatorFrame::new(series.symbol(), FrameOrder::Chronological, rows)
    }

    /// Compute the frame, flip it newest-first and classify it.
    pub fn evaluate(&self, series: &Series) -> Analysis {
        let frame = self.compute_frame(series).into_newest_first();
        let signal = self.evaluator.evaluate(&frame);

        Analysis {
            symbol: series.symbol().to_string(),
            frame,
            signal,
        }
    }

    /// Run the whole pipeline for one symbol.
    pub async fn analyze(&self, symbol: &str, as_of: NaiveDate) -> Result<Analysis, DataError> {
        let series = self.fetch_series(symbol, as_of).await.map_err(|e| {
            warn!(symbol, error = %e, "skipping symbol");
            e
        })?;

        let analysis = self.evaluate(&series);
        debug!(symbol, signal = %analysis.signal, bars = series.len(), "symbol analysed");
        Ok(analysis)
    }
}
