//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BatchSettings, CalendarSettings, IndicatorSettings, LoggingConfig,
    ProviderKind, ProviderSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::collections::HashMap;
use std::path::Path;

/// Prefix of environment overrides, e.g. `SCREENER__BATCH__CONCURRENCY=4`.
pub const ENV_PREFIX: &str = "SCREENER";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    load(path, None)
}

fn load(path: &Path, env: Option<HashMap<String, String>>) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    config.try_deserialize()
}
