//! CSV price source.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use screener_core::error::DataError;
use screener_core::traits::PriceSource;
use screener_core::types::Bar;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close", alias = "Adj Close", alias = "adjusted_close")]
    close: f64,
    #[serde(alias = "Volume", default)]
    volume: f64,
    #[serde(alias = "Dividend", default)]
    dividend: f64,
    #[serde(alias = "Split", alias = "split", default = "unit_split")]
    split_coefficient: f64,
}

fn unit_split() -> f64 {
    1.0
}

/// Daily bars from one CSV file per symbol.
///
/// For symbol `AAPL` the directory is searched for `AAPL.csv`, `aapl.csv`,
/// `AAPL_daily.csv` and `aapl_daily.csv`, in that order.
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    /// Create a new CSV price source over a directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Directory searched for symbol files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn locate(&self, symbol: &str) -> Option<PathBuf> {
        let lower = symbol.to_lowercase();
        [
            format!("{}.csv", symbol),
            format!("{}.csv", lower),
            format!("{}_daily.csv", symbol),
            format!("{}_daily.csv", lower),
        ]
        .into_iter()
        .map(|name| self.dir.join(name))
        .find(|path| path.is_file())
    }

    /// Load bars from a specific path.
    fn load_from_path(&self, path: &Path) -> Result<BTreeMap<NaiveDate, Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let mut bars = BTreeMap::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let date = parse_date(&record.date)?;

            let bar = Bar::new(
                date,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            )
            .with_corporate_actions(record.dividend, record.split_coefficient);
            bars.insert(date, bar);
        }

        Ok(bars)
    }
}

/// Parse the date formats commonly found in exported price files.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    let date_str = date_str.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_str, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(date_str, format).ok())
                .map(|dt| dt.date())
        })
        .ok_or_else(|| DataError::ParseError(format!("Could not parse date: {}", date_str)))
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn daily_bars(&self, symbol: &str) -> Result<BTreeMap<NaiveDate, Bar>, DataError> {
        let path = self
            .locate(symbol)
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))?;

        let bars = self.load_from_path(&path)?;
        debug!(symbol, path = %path.display(), bars = bars.len(), "loaded daily bars");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 10:30:00").unwrap(), expected);
        assert!(parse_date("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_loads_symbol_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("aapl.csv"),
            "Date,Open,High,Low,Close,Volume\n\
             2024-06-28,210.0,211.5,209.0,210.6,1000\n\
             2024-06-27,208.0,210.0,207.5,209.9,900\n",
        )
        .unwrap();

        let source = CsvPriceSource::new(dir.path()).unwrap();
        let bars = source.daily_bars("AAPL").await.unwrap();

        assert_eq!(bars.len(), 2);
        let (first_date, first) = bars.iter().next().unwrap();
        assert_eq!(*first_date, NaiveDate::from_ymd_opt(2024, 6, 27).unwrap());
        assert_eq!(first.close, 209.9);
        assert_eq!(first.dividend, 0.0);
        assert_eq!(first.split_coefficient, 1.0);
    }

    #[tokio::test]
    async fn test_corporate_action_columns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("MSFT_daily.csv"),
            "date,open,high,low,close,volume,dividend,split_coefficient\n\
             2024-05-15,400,405,399,404,1200,0.75,1\n",
        )
        .unwrap();

        let source = CsvPriceSource::new(dir.path()).unwrap();
        let bars = source.daily_bars("MSFT").await.unwrap();
        let bar = bars.values().next().unwrap();

        assert_eq!(bar.dividend, 0.75);
        assert_eq!(bar.split_coefficient, 1.0);
    }

    #[tokio::test]
    async fn test_missing_symbol_and_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("BAD.csv"), "date,open,high,low,close\nnot-a-date,1,2,0.5,1.5\n").unwrap();

        let source = CsvPriceSource::new(dir.path()).unwrap();
        assert_eq!(
            source.daily_bars("NONE").await,
            Err(DataError::SymbolNotFound("NONE".into()))
        );
        assert!(matches!(source.daily_bars("BAD").await, Err(DataError::ParseError(_))));
    }

    #[test]
    fn test_missing_directory() {
        assert!(CsvPriceSource::new("/definitely/not/a/price/dir").is_err());
    }
}
