//! Collaborator trait definitions for market data.

use crate::error::DataError;
use crate::types::Bar;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Trait for daily price providers.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the daily bars the provider has for a symbol.
    ///
    /// # Returns
    /// Bars keyed by trading date. The map may hold more (or fewer) days than
    /// the caller needs; the pipeline picks the dates it wants.
    async fn daily_bars(&self, symbol: &str) -> Result<BTreeMap<NaiveDate, Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

/// Trait for market trading calendars.
pub trait TradingCalendar: Send + Sync {
    /// Valid trading dates in `[start, end]`, ascending.
    fn trading_days(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, DataError>;

    /// The most recent `count` trading days on or before `end`, ascending.
    ///
    /// Asks for the days in a `lookback_days` calendar window, which must be
    /// wide enough to hold more than `count` sessions, and keeps the newest.
    fn recent_days(
        &self,
        end: NaiveDate,
        count: usize,
        lookback_days: i64,
    ) -> Result<Vec<NaiveDate>, DataError> {
        let start = end - Duration::days(lookback_days);
        let mut days = self.trading_days(start, end)?;
        if days.len() < count {
            return Err(DataError::InsufficientHistory {
                required: count,
                available: days.len(),
            });
        }
        Ok(days.split_off(days.len() - count))
    }

    /// Get the calendar name.
    fn name(&self) -> &str;
}

/// Trait for ordered symbol lists.
pub trait SymbolSource {
    /// Load the symbols in source order.
    fn symbols(&self) -> Result<Vec<String>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    struct EveryOtherDay;

    impl TradingCalendar for EveryOtherDay {
        fn trading_days(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<NaiveDate>, DataError> {
            Ok(start
                .iter_days()
                .take_while(|d| *d <= end)
                .filter(|d| d.ordinal() % 2 == 0)
                .collect())
        }

        fn name(&self) -> &str {
            "every-other-day"
        }
    }

    #[test]
    fn test_recent_days_keeps_newest() {
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let days = EveryOtherDay.recent_days(end, 3, 30).unwrap();

        assert_eq!(days.len(), 3);
        assert!(days.windows(2).all(|w| w[0] < w[1]));
        // 2024-02-29 is day 60 of the year
        assert_eq!(*days.last().unwrap(), end);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 2, 25).unwrap());
    }

    #[test]
    fn test_recent_days_insufficient() {
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let err = EveryOtherDay.recent_days(end, 10, 6).unwrap_err();

        assert!(matches!(err, DataError::InsufficientHistory { required: 10, .. }));
    }
}
