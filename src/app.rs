/// Shared startup for the binaries: config path, logging, price source
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::load_config;
use crate::data::{CsvPriceSource, PriceSource, YahooFinanceClient};
use crate::error::Result;
use crate::types::{AppConfig, Bar};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// `CONFIG_PATH` or `config.toml`
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// `RUST_LOG` wins over the configured level
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("volatrack={level},{level}")));

    // a second init (tests, repeated calls) is not an error
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load config from `CONFIG_PATH` and start logging at its level
pub fn bootstrap() -> Result<AppConfig> {
    let path = config_path();
    let config = load_config(&path)?;
    init_logging(&config.log_level);
    info!("Configuration loaded from {}", path);
    Ok(config)
}

/// Source selection flags shared by every binary
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SourceArgs {
    /// Read 1-minute bars from this CSV file instead of Yahoo Finance
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Daily bars CSV (used with --csv)
    #[arg(long)]
    pub daily_csv: Option<PathBuf>,
}

/// Either configured upstream, chosen at startup
pub enum AnySource {
    Yahoo(YahooFinanceClient),
    Csv(CsvPriceSource),
}

impl AnySource {
    pub fn open(config: &AppConfig, args: &SourceArgs) -> Result<Self> {
        match &args.csv {
            Some(path) => {
                info!("📂 Using CSV source {}", path.display());
                let mut source = CsvPriceSource::new(path);
                if let Some(daily) = &args.daily_csv {
                    source = source.with_daily(daily);
                }
                Ok(AnySource::Csv(source))
            }
            None => {
                info!("🌐 Using Yahoo Finance source for {}", config.symbol);
                let client = YahooFinanceClient::new(config.symbol.clone(), config.rate_limit_per_sec)?
                    .with_base_url(&config.chart_base_url);
                Ok(AnySource::Yahoo(client))
            }
        }
    }
}

impl PriceSource for AnySource {
    async fn fetch_intraday(&self) -> Result<Vec<Bar>> {
        match self {
            AnySource::Yahoo(client) => client.fetch_intraday().await,
            AnySource::Csv(source) => source.fetch_intraday().await,
        }
    }

    async fn fetch_daily(&self, days: usize) -> Result<Vec<Bar>> {
        match self {
            AnySource::Yahoo(client) => client.fetch_daily(days).await,
            AnySource::Csv(source) => source.fetch_daily(days).await,
        }
    }
}
