/// Push today's volatility table to a Google Sheet
use std::time::Duration;
use clap::Parser;

use volatrack::{
    analytics::validate_window,
    app::{bootstrap, AnySource, SourceArgs},
    config::CredentialResolver,
    data::Timeframe,
    export::SheetExport,
    pipeline::VolatilityPipeline,
};

#[derive(Debug, Parser)]
#[command(name = "export_gsheet", about = "Clear a sheet tab and write the volatility table")]
struct Args {
    /// Rolling window in bars (overrides config)
    #[arg(long)]
    window: Option<usize>,

    /// Target tab (overrides config `worksheet`)
    #[arg(long)]
    worksheet: Option<String>,

    #[command(flatten)]
    source: SourceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = bootstrap()?;
    if let Some(worksheet) = args.worksheet {
        config.worksheet = worksheet;
    }

    // resolve the destination first so a missing setting never touches the network
    let resolver = CredentialResolver::from_config(&config)?;
    let export = SheetExport::prepare(&config, &resolver)?;

    let vola = config.volatility();
    let window = args.window.unwrap_or(vola.window);
    validate_window(window)?;
    let source = AnySource::open(&config, &args.source)?;
    let pipeline = VolatilityPipeline::new(
        source,
        vola.annualization,
        Duration::from_secs(config.cache_ttl_sec),
    );

    let snapshot = pipeline.refresh(window, Timeframe::OneMinute).await?;
    let written = export.write(&snapshot.rows).await?;
    println!("✅ Sent {} rows to tab {}", written, export.worksheet());

    Ok(())
}
