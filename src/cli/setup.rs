//! Wiring of configured collaborators into a pipeline.

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use screener_config::{AppConfig, ProviderKind};
use screener_core::traits::{PriceSource, TradingCalendar};
use screener_data::{
    AlphaVantageConfig, AlphaVantageSource, CsvPriceSource, DateListCalendar, WeekdayCalendar,
};
use screener_pipeline::{IndicatorPipeline, Pacer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::cli::SourceArgs;

/// The day to analyse: `--as-of`, or yesterday.
pub fn as_of(args: &SourceArgs) -> NaiveDate {
    args.as_of
        .unwrap_or_else(|| Local::now().date_naive() - Duration::days(1))
}

fn provider_kind(config: &AppConfig, args: &SourceArgs) -> ProviderKind {
    args.source.map(Into::into).unwrap_or(config.provider.kind)
}

fn price_source(config: &AppConfig, args: &SourceArgs) -> Result<Arc<dyn PriceSource>> {
    match provider_kind(config, args) {
        ProviderKind::AlphaVantage => {
            let provider = &config.provider;
            let api_key = std::env::var(&provider.api_key_env).with_context(|| {
                format!(
                    "Alpha Vantage API key not found: set {} or use --source csv",
                    provider.api_key_env
                )
            })?;
            let source = AlphaVantageSource::new(
                AlphaVantageConfig::new(api_key)
                    .with_base_url(provider.base_url.clone())
                    .with_output_size(provider.output_size)
                    .with_timeout(provider.timeout()),
            )?;
            Ok(Arc::new(source))
        }
        ProviderKind::Csv => {
            let dir = args
                .data
                .clone()
                .or_else(|| config.provider.data_dir.as_ref().map(PathBuf::from))
                .context("CSV source needs a data directory (--data DIR or provider.data_dir)")?;
            let source = CsvPriceSource::new(&dir).with_context(|| {
                format!("Data directory '{}' does not exist", dir.display())
            })?;
            Ok(Arc::new(source))
        }
    }
}

fn calendar(config: &AppConfig) -> Result<Arc<dyn TradingCalendar>> {
    match &config.calendar.dates_file {
        Some(path) => {
            let calendar = DateListCalendar::from_path(path)
                .with_context(|| format!("Failed to load trading dates from {}", path))?;
            info!(dates = calendar.len(), path = %path, "loaded trading calendar");
            Ok(Arc::new(calendar))
        }
        None => Ok(Arc::new(
            WeekdayCalendar::with_holidays(config.calendar.holidays.iter().copied())
                .with_rules(config.calendar.rules),
        )),
    }
}

/// Local files are not rate limited; the HTTP provider is.
fn pacer(config: &AppConfig, kind: ProviderKind) -> Arc<Pacer> {
    match kind {
        ProviderKind::AlphaVantage => Arc::new(Pacer::new(
            config.batch.calls_per_window,
            config.batch.window(),
        )),
        ProviderKind::Csv => Arc::new(Pacer::unlimited()),
    }
}

/// Build the indicator pipeline for the configured collaborators.
pub fn pipeline(config: &AppConfig, args: &SourceArgs) -> Result<IndicatorPipeline> {
    config.validate().context("Invalid configuration")?;

    let pipeline = IndicatorPipeline::new(
        config.pipeline_config(),
        price_source(config, args)?,
        calendar(config)?,
    )?
    .with_pacer(pacer(config, provider_kind(config, args)));

    Ok(pipeline)
}
