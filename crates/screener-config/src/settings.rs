//! Configuration structures.

use chrono::NaiveDate;
use screener_core::error::{ScreenerError, ScreenerResult};
use screener_data::{HolidayRules, OutputSize};
use screener_indicators::MacdSpans;
use screener_pipeline::{BatchConfig, PipelineConfig};
use screener_signals::SignalRule;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub indicators: IndicatorSettings,
    #[serde(default)]
    pub signal: SignalRule,
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
}

impl AppConfig {
    /// Check the indicator and batch parameters.
    pub fn validate(&self) -> ScreenerResult<()> {
        self.pipeline_config().validate()?;
        if self.batch.max_symbols == 0 {
            return Err(ScreenerError::Validation("batch.max_symbols must be at least 1".into()));
        }
        if self.batch.concurrency == 0 {
            return Err(ScreenerError::Validation("batch.concurrency must be at least 1".into()));
        }
        if self.batch.calls_per_window > 0 && self.batch.window_secs == 0 {
            return Err(ScreenerError::Validation(
                "batch.window_secs must be positive when calls are paced".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ScreenerError::Config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }

    /// Pipeline parameters from the `indicators` and `signal` sections.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            period: self.indicators.period,
            kdj_window: self.indicators.kdj_window,
            kdj_seed: self.indicators.kdj_seed,
            macd: self.indicators.macd,
            signal: self.signal,
            lookback_days: self.indicators.lookback_days,
        }
    }

    /// Batch driver parameters.
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig {
            max_symbols: self.batch.max_symbols,
            concurrency: self.batch.concurrency,
        }
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "screener".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    /// Directory for daily-rolling log files
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Which price source to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    AlphaVantage,
    Csv,
}

/// Price provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Environment variable holding the Alpha Vantage API key
    pub api_key_env: String,
    pub base_url: String,
    pub output_size: OutputSize,
    pub timeout_secs: u64,
    /// Directory of per-symbol CSV files
    pub data_dir: Option<String>,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::AlphaVantage,
            api_key_env: "ALPHAVANTAGE_API_KEY".to_string(),
            base_url: screener_data::DEFAULT_BASE_URL.to_string(),
            output_size: OutputSize::Compact,
            timeout_secs: 30,
            data_dir: None,
        }
    }
}

/// Indicator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    /// Bars analysed per symbol, minus one
    pub period: usize,
    pub kdj_window: usize,
    pub kdj_seed: f64,
    pub macd: MacdSpans,
    /// Calendar days searched for trading days (default: 2 * (period + 1) + 30)
    pub lookback_days: Option<i64>,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            period: pipeline.period,
            kdj_window: pipeline.kdj_window,
            kdj_seed: pipeline.kdj_seed,
            macd: pipeline.macd,
            lookback_days: pipeline.lookback_days,
        }
    }
}

/// Batch driver and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub max_symbols: usize,
    pub concurrency: usize,
    /// Provider calls allowed per window (0 disables pacing)
    pub calls_per_window: usize,
    pub window_secs: u64,
}

impl BatchSettings {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        let batch = BatchConfig::default();
        Self {
            max_symbols: batch.max_symbols,
            concurrency: batch.concurrency,
            calls_per_window: 5,
            window_secs: 60,
        }
    }
}

/// Trading calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Holiday rules applied by the weekday calendar
    pub rules: HolidayRules,
    /// One-off closures the rules do not cover
    pub holidays: Vec<NaiveDate>,
    /// File of explicit trading dates; replaces the weekday calendar when set
    pub dates_file: Option<String>,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            rules: HolidayRules::Nyse,
            holidays: Vec::new(),
            dates_file: None,
        }
    }
}
