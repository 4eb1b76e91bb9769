//! Alpha Vantage daily price source.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use screener_core::error::DataError;
use screener_core::traits::PriceSource;
use screener_core::types::Bar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Default query endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// How much history to request per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// The latest 100 data points
    #[default]
    Compact,
    /// The full available history
    Full,
}

impl OutputSize {
    fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

/// Alpha Vantage API configuration.
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub api_key: String,
    pub base_url: String,
    pub output_size: OutputSize,
    pub timeout: Duration,
}

impl AlphaVantageConfig {
    /// Create config directly with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            output_size: OutputSize::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Read the API key from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, DataError> {
        let api_key = std::env::var(var)
            .map_err(|_| DataError::Api(format!("{} not set", var)))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_output_size(mut self, output_size: OutputSize) -> Self {
        self.output_size = output_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `TIME_SERIES_DAILY_ADJUSTED` response. Quota and error notices come back
/// with HTTP 200 and one of the message fields set instead of the series.
#[derive(Debug, Deserialize)]
struct DailyAdjustedResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<BTreeMap<String, DailyEntry>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "5. adjusted close")]
    adjusted_close: String,
    #[serde(rename = "6. volume")]
    volume: String,
    #[serde(rename = "7. dividend amount")]
    dividend: Option<String>,
    #[serde(rename = "8. split coefficient")]
    split_coefficient: Option<String>,
}

impl DailyEntry {
    fn into_bar(self, date: NaiveDate) -> Result<Bar, DataError> {
        let bar = Bar::new(
            date,
            parse_decimal(&self.open, "open")?,
            parse_decimal(&self.high, "high")?,
            parse_decimal(&self.low, "low")?,
            parse_decimal(&self.adjusted_close, "adjusted close")?,
            parse_decimal(&self.volume, "volume")?,
        );
        let dividend = match self.dividend {
            Some(value) => parse_decimal(&value, "dividend amount")?,
            None => 0.0,
        };
        let split = match self.split_coefficient {
            Some(value) => parse_decimal(&value, "split coefficient")?,
            None => 1.0,
        };
        Ok(bar.with_corporate_actions(dividend, split))
    }
}

fn parse_decimal(value: &str, field: &str) -> Result<f64, DataError> {
    value
        .trim()
        .parse()
        .map_err(|_| DataError::ParseError(format!("Invalid {}: {:?}", field, value)))
}

/// Parse a `TIME_SERIES_DAILY_ADJUSTED` body into bars keyed by date.
fn parse_daily_adjusted(symbol: &str, body: &str) -> Result<BTreeMap<NaiveDate, Bar>, DataError> {
    let response: DailyAdjustedResponse =
        serde_json::from_str(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    if let Some(message) = response.note.or(response.information) {
        return Err(DataError::RateLimited(message));
    }
    if response.error_message.is_some() {
        return Err(DataError::SymbolNotFound(symbol.to_string()));
    }

    let series = response.time_series.ok_or(DataError::NoDataAvailable)?;
    series
        .into_iter()
        .map(|(date, entry)| {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| DataError::ParseError(format!("Invalid date {:?}: {}", date, e)))?;
            Ok((date, entry.into_bar(date)?))
        })
        .collect()
}

/// Alpha Vantage client.
pub struct AlphaVantageSource {
    config: AlphaVantageConfig,
    client: Client,
}

impl AlphaVantageSource {
    /// Create a new Alpha Vantage client.
    pub fn new(config: AlphaVantageConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create from the API key in the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, DataError> {
        Self::new(AlphaVantageConfig::from_env(var)?)
    }
}

#[async_trait]
impl PriceSource for AlphaVantageSource {
    async fn daily_bars(&self, symbol: &str) -> Result<BTreeMap<NaiveDate, Bar>, DataError> {
        let params = [
            ("function", "TIME_SERIES_DAILY_ADJUSTED"),
            ("symbol", symbol),
            ("outputsize", self.config.output_size.as_str()),
            ("apikey", self.config.api_key.as_str()),
        ];

        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited(status.to_string()));
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::Api(format!("{}: {}", status, text)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;
        let bars = parse_daily_adjusted(symbol, &body)?;

        debug!(symbol, bars = bars.len(), "fetched daily bars");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "alpha-vantage"
    }
}
