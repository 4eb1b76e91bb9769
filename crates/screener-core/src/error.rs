//! Error types for the screener.

use chrono::NaiveDate;
use thiserror::Error;

/// Top-level screener error.
#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Data source errors.
///
/// Every variant is a per-symbol fetch failure: the batch driver records it
/// and moves on to the next symbol.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("No bar for trading day {0}")]
    MissingBar(NaiveDate),

    #[error("Insufficient history: need {required} trading days, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Indicator parameter errors.
///
/// Numeric indeterminacy (flat windows, warm-up bars) is never an error; it
/// shows up as undefined values in the output instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for screener operations.
pub type ScreenerResult<T> = Result<T, ScreenerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_display() {
        let err = DataError::InsufficientHistory {
            required: 99,
            available: 40,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient history: need 99 trading days, have 40"
        );

        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            DataError::MissingBar(date).to_string(),
            "No bar for trading day 2024-03-15"
        );
    }

    #[test]
    fn test_wraps_into_screener_error() {
        let err: ScreenerError = DataError::NoDataAvailable.into();
        assert!(matches!(err, ScreenerError::Data(DataError::NoDataAvailable)));
    }
}
