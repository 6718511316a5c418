/// Rolling volatility over daily bars, annualized with sqrt(252)
use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;

use volatrack::{
    analytics::validate_window,
    app::{bootstrap, AnySource, SourceArgs},
    export::{format_timestamp, save_table},
    pipeline::VolatilityPipeline,
    Annualization,
};

#[derive(Debug, Parser)]
#[command(name = "daily_volatility", about = "Daily-bar volatility of the configured index")]
struct Args {
    /// Rolling window in trading days (overrides config `daily_window`)
    #[arg(long)]
    window_days: Option<usize>,

    /// Also save the table to this file (.xlsx or .csv)
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    source: SourceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = bootstrap()?;
    let window_days = args.window_days.unwrap_or(config.daily_window);
    validate_window(window_days)?;

    let source = AnySource::open(&config, &args.source)?;
    let pipeline = VolatilityPipeline::new(
        source,
        Annualization::Daily,
        Duration::from_secs(config.cache_ttl_sec),
    );

    let rows = pipeline.refresh_daily(window_days).await?;

    println!("📊 {} daily volatility ({}-day window)", config.symbol, window_days);
    println!("==========================================\n");

    if rows.is_empty() {
        println!("⚠️  Not enough daily history for a {}-day window", window_days);
        return Ok(());
    }

    for row in &rows {
        println!(
            "   {}  close {:>10.2}  ret {:>9.5}  vola {:>7.4}",
            format_timestamp(row.timestamp),
            row.close,
            row.ret,
            row.vola
        );
    }

    if let Some(path) = args.output {
        let path = save_table(&rows, &path)?;
        println!("\n💾 Saved to {}", path.display());
    }

    Ok(())
}
