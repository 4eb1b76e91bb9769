//! Validate configuration command.

use anyhow::Result;
use screener_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: &Path, loaded: Result<AppConfig>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match loaded.and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {:#}", e);
            return Err(e);
        }
    };

    let indicators = &config.indicators;
    let batch = &config.batch;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Provider: {:?} (key from ${})", config.provider.kind, config.provider.api_key_env);
    println!("Period: {} bars", indicators.period + 1);
    println!("KDJ window: {} (seed {})", indicators.kdj_window, indicators.kdj_seed);
    println!(
        "MACD spans: slow {} / fast {} / signal {}",
        indicators.macd.slow, indicators.macd.fast, indicators.macd.signal
    );
    println!("MACD chain: {} bars", config.signal.macd_chain);
    println!("Max symbols: {}", batch.max_symbols);
    println!(
        "Pacing: {} calls per {}s, concurrency {}",
        batch.calls_per_window, batch.window_secs, batch.concurrency
    );
    match &config.calendar.dates_file {
        Some(path) => println!("Calendar: dates from {}", path),
        None => println!(
            "Calendar: weekdays, {:?} holiday rules, {} listed closures",
            config.calendar.rules,
            config.calendar.holidays.len()
        ),
    }

    Ok(())
}
