/// Main entry point for the volatility dashboard
use std::sync::Arc;
use std::time::Duration;
use clap::Parser;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use volatrack::{
    analytics::validate_window,
    app::{bootstrap, AnySource, SourceArgs},
    dashboard::{parse_interval, DashboardView},
    data::Timeframe,
    error::Result,
    pipeline::VolatilityPipeline,
    AppConfig,
};

#[derive(Debug, Parser)]
#[command(name = "volatrack", about = "Intraday SENSEX volatility dashboard")]
struct Cli {
    /// Candle interval: "1 Minute", "5 Minutes", "15 Minutes", "1 Hour", "1 Day"
    #[arg(long)]
    interval: Option<String>,

    /// Rolling window in bars (overrides config)
    #[arg(long)]
    window: Option<usize>,

    /// Render once and exit
    #[arg(long)]
    once: bool,

    #[command(flatten)]
    source: SourceArgs,
}

/// Application state
struct DashboardApp {
    config: Arc<AppConfig>,
    pipeline: VolatilityPipeline<AnySource>,
    timeframe: Timeframe,
    window: usize,
    shutdown: Arc<Notify>,
}

impl DashboardApp {
    fn new(config: AppConfig, cli: &Cli) -> Result<Self> {
        let label = cli.interval.clone().unwrap_or_else(|| config.interval.clone());
        let timeframe = parse_interval(&label)?;

        let window = cli.window.unwrap_or(config.window);
        validate_window(window)?;

        let vola = config.volatility();
        let source = AnySource::open(&config, &cli.source)?;
        let pipeline = VolatilityPipeline::new(
            source,
            vola.annualization,
            Duration::from_secs(config.cache_ttl_sec),
        );

        info!(
            "Dashboard ready: {} {} candles, window={}, annualization={}",
            config.symbol,
            timeframe.label(),
            window,
            vola.annualization.as_str()
        );

        Ok(DashboardApp {
            config: Arc::new(config),
            pipeline,
            timeframe,
            window,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Refresh and print one frame
    async fn render_once(&self) -> Result<()> {
        let snapshot = self.pipeline.refresh(self.window, self.timeframe).await?;
        let view = DashboardView::new(&snapshot, &self.config.symbol, chrono::Utc::now());

        if !view.market_open {
            warn!("Market closed - data may be stale");
        }

        println!("{}", view);
        Ok(())
    }

    async fn run(&self, once: bool) -> Result<()> {
        if once {
            return self.render_once().await;
        }

        self.setup_shutdown_handler();
        self.run_until_shutdown().await
    }

    /// Refresh every `refresh_interval_sec` until the shutdown notify fires
    async fn run_until_shutdown(&self) -> Result<()> {
        let period = Duration::from_secs(self.config.refresh_interval_sec);

        loop {
            if let Err(e) = self.render_once().await {
                if e.is_recoverable() {
                    warn!("Refresh failed: {} ({}) - retrying next cycle", e, e.error_code());
                } else {
                    error!("Refresh failed: {} ({})", e, e.error_code());
                    return Err(e);
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(period) => {}
                _ = self.shutdown.notified() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }

    fn setup_shutdown_handler(&self) {
        let shutdown = Arc::clone(&self.shutdown);

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }

            info!("Ctrl+C received - stopping");
            // stored as a permit if the loop is mid-refresh
            shutdown.notify_one();
        });
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = bootstrap()?;

    let app = DashboardApp::new(config, &cli)?;
    app.run(cli.once).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_cli(path: &std::path::Path, extra: &[&str]) -> Cli {
        let mut args = vec!["volatrack", "--csv", path.to_str().unwrap()];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    fn session_csv() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Datetime,Open,High,Low,Close").unwrap();
        for i in 0..20 {
            let close = 76000 + (i % 4) * 7;
            writeln!(file, "2025-01-15T09:{:02}:00+05:30,{c},{c},{c},{c}", 15 + i, c = close).unwrap();
        }
        file
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_refresh_sleep() {
        let file = session_csv();
        let config = AppConfig {
            refresh_interval_sec: 3600,
            ..AppConfig::default()
        };
        let app = DashboardApp::new(config, &csv_cli(file.path(), &[])).unwrap();

        app.shutdown.notify_one();
        let result = tokio::time::timeout(Duration::from_secs(5), app.run_until_shutdown()).await;
        assert!(matches!(result, Ok(Ok(()))));
    }

    #[test]
    fn test_rejects_small_window_override() {
        let file = session_csv();
        let cli = csv_cli(file.path(), &["--window", "1"]);
        assert!(DashboardApp::new(AppConfig::default(), &cli).is_err());
    }

    #[test]
    fn test_rejects_unknown_interval() {
        let file = session_csv();
        let cli = csv_cli(file.path(), &["--interval", "2 Weeks"]);
        assert!(DashboardApp::new(AppConfig::default(), &cli).is_err());
    }
}
