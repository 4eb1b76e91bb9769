//! End-to-end pipeline runs over synthetic price histories.

use async_trait::async_trait;
use chrono::NaiveDate;
use screener_core::error::DataError;
use screener_core::traits::{PriceSource, TradingCalendar};
use screener_core::types::{Bar, Signal};
use screener_data::WeekdayCalendar;
use screener_pipeline::{BatchConfig, BatchDriver, IndicatorPipeline, PipelineConfig};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

/// In-memory source keyed by symbol.
#[derive(Default)]
struct MemorySource(HashMap<String, BTreeMap<NaiveDate, Bar>>);

impl MemorySource {
    /// Lay `bars(i, date)` for i in 0..99 onto the latest 99 weekdays.
    fn insert(&mut self, symbol: &str, bars: impl Fn(usize, NaiveDate) -> Bar) {
        let days = WeekdayCalendar::new().recent_days(as_of(), 99, 400).unwrap();
        let series = days
            .into_iter()
            .enumerate()
            .map(|(i, date)| (date, bars(i, date)))
            .collect();
        self.0.insert(symbol.to_string(), series);
    }
}

#[async_trait]
impl PriceSource for MemorySource {
    async fn daily_bars(&self, symbol: &str) -> Result<BTreeMap<NaiveDate, Bar>, DataError> {
        self.0
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Geometric uptrend whose last bar closes near the top of a wide range
/// right after four bars with stretched highs: K crosses above D on the
/// last bar while the MACD histogram keeps rising.
fn golden_cross(i: usize, date: NaiveDate) -> Bar {
    let close = 100.0 * 1.02f64.powi(i as i32);
    let (high, low) = match i {
        94..=97 => (close * 1.04, close * 0.99),
        98 => (close, close * 0.2),
        _ => (close * 1.01, close * 0.99),
    };
    Bar::new(date, close, high, low, close, 1_000_000.0)
}

fn flat(_: usize, date: NaiveDate) -> Bar {
    Bar::new(date, 100.0, 101.0, 99.0, 100.0, 1_000_000.0)
}

fn linear(i: usize, date: NaiveDate) -> Bar {
    let close = 100.0 + i as f64;
    Bar::new(date, close, close + 1.0, close - 1.0, close, 1_000_000.0)
}

fn pipeline(source: MemorySource) -> IndicatorPipeline {
    IndicatorPipeline::new(
        PipelineConfig::default(),
        Arc::new(source),
        Arc::new(WeekdayCalendar::new()),
    )
    .unwrap()
}

#[tokio::test]
async fn golden_cross_with_rising_histogram_is_buy() {
    let mut source = MemorySource::default();
    source.insert("UP", golden_cross);

    let analysis = pipeline(source).analyze("UP", as_of()).await.unwrap();
    let latest = analysis.frame.recent(0).unwrap();
    let previous = analysis.frame.recent(1).unwrap();

    assert_eq!(latest.bar.date, as_of());
    assert!((latest.k.unwrap() - 87.433).abs() < 1e-2);
    assert!((latest.d.unwrap() - 86.579).abs() < 1e-2);
    assert!(previous.k.unwrap() < previous.d.unwrap());
    assert_eq!(analysis.signal, Signal::Buy);
}

#[tokio::test]
async fn constant_bars_settle_and_hold() {
    let mut source = MemorySource::default();
    source.insert("FLAT", flat);

    let analysis = pipeline(source).analyze("FLAT", as_of()).await.unwrap();
    for age in 0..3 {
        let row = analysis.frame.recent(age).unwrap();
        assert!((row.k.unwrap() - 50.0).abs() < 1e-9);
        assert!((row.j.unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(row.dif, Some(0.0));
        assert_eq!(row.macd, Some(0.0));
    }
    assert_eq!(analysis.signal, Signal::Hold);
}

#[tokio::test]
async fn linear_uptrend_is_directional() {
    let mut source = MemorySource::default();
    source.insert("LIN", linear);

    let analysis = pipeline(source).analyze("LIN", as_of()).await.unwrap();
    let frame = analysis.frame.into_chronological();

    let k = frame.column(|row| row.k);
    let d = frame.column(|row| row.d);
    for i in 9..k.len() {
        assert!(k[i].unwrap() >= k[i - 1].unwrap());
        assert!(d[i].unwrap() >= d[i - 1].unwrap());
    }
    // Constant slope: the fast EMA lags less, so DIF stays above zero
    assert!(frame.recent(0).unwrap().dif.unwrap() > 0.0);
}

#[tokio::test]
async fn batch_sorts_symbols_into_lists() {
    let mut source = MemorySource::default();
    source.insert("UP", golden_cross);
    source.insert("FLAT", flat);
    source.insert("LIN", linear);

    let driver = BatchDriver::new(Arc::new(pipeline(source)), BatchConfig::default());
    let symbols = ["FLAT", "UP", "MISSING", "LIN"].map(String::from).to_vec();
    let report = driver.run(symbols, as_of()).await;

    assert_eq!(report.assessed, 4);
    assert_eq!(report.buy, vec!["UP"]);
    assert!(report.sell.is_empty());
    assert_eq!(report.hold, vec!["FLAT", "LIN"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].symbol, "MISSING");
}
