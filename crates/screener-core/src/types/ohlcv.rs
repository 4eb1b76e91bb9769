//! Daily OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One trading day.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Adjusted closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
    /// Dividend paid on this day
    pub dividend: f64,
    /// Split coefficient (1.0 when no split happened)
    pub split_coefficient: f64,
}

impl Bar {
    /// Create a new bar without corporate actions.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            dividend: 0.0,
            split_coefficient: 1.0,
        }
    }

    /// Attach the dividend amount and split coefficient reported for the day.
    pub fn with_corporate_actions(mut self, dividend: f64, split_coefficient: f64) -> Self {
        self.dividend = dividend;
        self.split_coefficient = split_coefficient;
        self
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Ordered daily bars for one symbol, stored oldest first.
///
/// Dates are strictly increasing, so read newest first they are strictly
/// decreasing. The recurrences in the indicator engines run over this
/// chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series from chronologically ordered bars.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        let symbol = symbol.into();
        if let Some(pair) = bars.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(DataError::Internal(format!(
                "{}: bars out of order ({} is not before {})",
                symbol, pair[0].date, pair[1].date
            )));
        }
        Ok(Self { symbol, bars })
    }

    /// Symbol identifier.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get a bar by chronological index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Get the most recent bar.
    pub fn newest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Iterate from the most recent bar backwards.
    pub fn newest_first(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter().rev()
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract high prices as a vector.
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Extract low prices as a vector.
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Get an iterator over the bars, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_bar_defaults() {
        let bar = Bar::new(day(2), 100.0, 110.0, 95.0, 105.0, 1_000_000.0);

        assert!((bar.range() - 15.0).abs() < 1e-10);
        assert_eq!(bar.dividend, 0.0);
        assert_eq!(bar.split_coefficient, 1.0);

        let bar = bar.with_corporate_actions(0.24, 2.0);
        assert_eq!(bar.dividend, 0.24);
        assert_eq!(bar.split_coefficient, 2.0);
    }

    #[test]
    fn test_series_rejects_unordered_dates() {
        let bars = vec![
            Bar::new(day(3), 1.0, 1.0, 1.0, 1.0, 0.0),
            Bar::new(day(2), 1.0, 1.0, 1.0, 1.0, 0.0),
        ];
        assert!(Series::new("AAPL", bars).is_err());

        let duplicated = vec![
            Bar::new(day(2), 1.0, 1.0, 1.0, 1.0, 0.0),
            Bar::new(day(2), 1.0, 1.0, 1.0, 1.0, 0.0),
        ];
        assert!(Series::new("AAPL", duplicated).is_err());
    }

    #[test]
    fn test_series_extractions() {
        let series = Series::new(
            "AAPL",
            vec![
                Bar::new(day(2), 100.0, 101.0, 99.0, 100.5, 1000.0),
                Bar::new(day(3), 100.5, 102.0, 100.0, 101.5, 2000.0),
            ],
        )
        .unwrap();

        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.closes(), vec![100.5, 101.5]);
        assert_eq!(series.highs(), vec![101.0, 102.0]);
        assert_eq!(series.lows(), vec![99.0, 100.0]);
        assert_eq!(series.newest().unwrap().date, day(3));

        let newest_first: Vec<NaiveDate> = series.newest_first().map(|b| b.date).collect();
        assert_eq!(newest_first, vec![day(3), day(2)]);
    }
}
