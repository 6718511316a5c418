/// Export today's volatility table to a spreadsheet file
use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;

use volatrack::{
    analytics::validate_window,
    app::{bootstrap, AnySource, SourceArgs},
    data::Timeframe,
    export::save_table,
    pipeline::VolatilityPipeline,
};

#[derive(Debug, Parser)]
#[command(name = "export_excel", about = "Write the volatility table to .xlsx or .csv")]
struct Args {
    /// Rolling window in bars (overrides config)
    #[arg(long)]
    window: Option<usize>,

    /// Output file; `.csv` selects CSV, anything else writes .xlsx
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    source: SourceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = bootstrap()?;

    let vola = config.volatility();
    let window = args.window.unwrap_or(vola.window);
    validate_window(window)?;
    let output = args.output.unwrap_or_else(|| PathBuf::from(&config.excel_path));

    let source = AnySource::open(&config, &args.source)?;
    let pipeline = VolatilityPipeline::new(
        source,
        vola.annualization,
        Duration::from_secs(config.cache_ttl_sec),
    );

    let snapshot = pipeline.refresh(window, Timeframe::OneMinute).await?;
    if snapshot.is_empty() {
        println!("⚠️  No rows to export (market closed or no data yet)");
    }

    let path = save_table(&snapshot.rows, &output)?;
    println!("✅ Saved {} rows to {}", snapshot.rows.len(), path.display());

    Ok(())
}
