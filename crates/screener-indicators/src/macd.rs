//! MACD (Moving Average Convergence Divergence).
//!
//! DIF is the fast EMA of close minus the slow EMA, DEA is the EMA of DIF
//! over the signal span, and the MACD histogram is `(DIF - DEA) * 2`.

use screener_core::error::IndicatorError;
use screener_core::traits::{Indicator, SeriesIndicator};
use screener_core::types::Series;
use serde::{Deserialize, Serialize};

use crate::moving_average::Ema;

/// EMA spans used by MACD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdSpans {
    /// Slow EMA span
    pub slow: usize,
    /// Fast EMA span
    pub fast: usize,
    /// Signal line (DEA) span
    pub signal: usize,
}

impl MacdSpans {
    /// The classic 26/12/9 parameterisation.
    pub const STANDARD: MacdSpans = MacdSpans {
        slow: 26,
        fast: 12,
        signal: 9,
    };

    /// A faster 22/4/3 variant for short swings.
    pub const TUNED: MacdSpans = MacdSpans {
        slow: 22,
        fast: 4,
        signal: 3,
    };

    /// Check that all spans are positive and fast is shorter than slow.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.slow == 0 || self.fast == 0 || self.signal == 0 {
            return Err(IndicatorError::InvalidParameter(
                "MACD spans must be greater than 0".into(),
            ));
        }
        if self.fast >= self.slow {
            return Err(IndicatorError::InvalidParameter(format!(
                "MACD fast span ({}) must be less than slow span ({})",
                self.fast, self.slow
            )));
        }
        Ok(())
    }

    /// Bars needed before the first MACD histogram value.
    pub fn warmup(&self) -> usize {
        self.slow + self.signal - 1
    }
}

impl Default for MacdSpans {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// MACD values for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacdOutput {
    /// Fast EMA - slow EMA
    pub dif: Option<f64>,
    /// EMA of DIF
    pub dea: Option<f64>,
    /// Histogram: (DIF - DEA) * 2
    pub macd: Option<f64>,
}

/// MACD indicator.
#[derive(Debug, Clone)]
pub struct Macd {
    spans: MacdSpans,
}

impl Macd {
    /// Create a new MACD with the standard 26/12/9 spans.
    pub fn new() -> Self {
        Self::with_spans(MacdSpans::STANDARD)
    }

    /// Create a MACD with custom spans.
    pub fn with_spans(spans: MacdSpans) -> Self {
        assert!(spans.validate().is_ok(), "Invalid MACD spans: {:?}", spans);
        Self { spans }
    }

    /// Configured spans.
    pub fn spans(&self) -> MacdSpans {
        self.spans
    }

    /// Calculate MACD from close prices in chronological order.
    pub fn calculate_closes(&self, closes: &[f64]) -> Vec<MacdOutput> {
        let fast = Ema::new(self.spans.fast).calculate(closes);
        let slow = Ema::new(self.spans.slow).calculate(closes);

        let dif: Vec<Option<f64>> = fast
            .iter()
            .zip(slow.iter())
            .map(|(&f, &s)| Some(f? - s?))
            .collect();
        let dea = Ema::new(self.spans.signal).smooth(&dif);

        dif.into_iter()
            .zip(dea)
            .map(|(dif, dea)| MacdOutput {
                dif,
                dea,
                macd: dif.zip(dea).map(|(dif, dea)| (dif - dea) * 2.0),
            })
            .collect()
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesIndicator for Macd {
    type Output = MacdOutput;

    fn calculate_series(&self, series: &Series) -> Vec<MacdOutput> {
        self.calculate_closes(&series.closes())
    }

    fn warmup_period(&self) -> usize {
        self.spans.warmup()
    }

    fn name(&self) -> &str {
        "MACD"
    }
}
