/// Configuration loading from TOML file with environment overrides
use std::path::Path;
use tracing::{debug, warn};

use crate::analytics::validate_window;
use crate::data::Timeframe;
use crate::error::{Result, VolaError};
use crate::types::{Annualization, AppConfig};

/// Prefix for environment overrides, e.g. `VOLATRACK__WINDOW=10`
pub const ENV_PREFIX: &str = "VOLATRACK";

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    build_config(path.as_ref(), Some(env_overrides()))
}

fn env_overrides() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn build_config(path: &Path, environment: Option<config::Environment>) -> Result<AppConfig> {
    let mut builder = config::Config::builder();

    if path.exists() {
        builder = builder.add_source(config::File::from(path));
    } else {
        warn!("Config file {} not found - using defaults", path.display());
    }

    if let Some(environment) = environment {
        builder = builder.add_source(environment);
    }

    let config: AppConfig = builder.build()?.try_deserialize()?;

    // Validate config
    validate_config(&config)?;

    debug!("Config loaded: symbol={} window={} interval={}", config.symbol, config.window, config.interval);
    Ok(config)
}

pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.symbol.trim().is_empty() {
        return Err(VolaError::ConfigError("symbol is empty".to_string()));
    }

    validate_window(config.window)
        .and_then(|_| validate_window(config.daily_window))
        .map_err(|e| VolaError::ConfigError(e.to_string()))?;

    if let Annualization::Custom { periods_per_year } = config.annualization {
        if !(periods_per_year > 0.0) {
            return Err(VolaError::ConfigError(
                format!("Invalid periods_per_year: {}", periods_per_year)
            ));
        }
    }

    if config.interval.parse::<Timeframe>().is_err() {
        return Err(VolaError::ConfigError(format!("Unknown interval: {}", config.interval)));
    }

    if config.cache_ttl_sec == 0 || config.refresh_interval_sec == 0 {
        return Err(VolaError::ConfigError(
            "cache_ttl_sec and refresh_interval_sec must be > 0".to_string()
        ));
    }

    if config.rate_limit_per_sec == 0 {
        return Err(VolaError::ConfigError("rate_limit_per_sec must be > 0".to_string()));
    }

    Ok(())
}
