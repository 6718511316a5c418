/// Price acquisition interface and the file-backed source
use std::future::Future;
use std::path::PathBuf;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Result, VolaError};
use crate::time::MARKET_TZ;
use crate::types::Bar;

/// Upstream supplier of price bars
pub trait PriceSource {
    /// Today's 1-minute bars, rows with any null field removed
    fn fetch_intraday(&self) -> impl Future<Output = Result<Vec<Bar>>> + Send;

    /// Daily bars for the trailing `days` trading days
    fn fetch_daily(&self, days: usize) -> impl Future<Output = Result<Vec<Bar>>> + Send;
}

/// Daily history length needed for a rolling window of `window_days`
pub fn daily_lookback(window_days: usize) -> usize {
    window_days * 3
}

/// Drop rows with a non-finite price and sort by timestamp
pub fn clean_bars(mut bars: Vec<Bar>) -> Vec<Bar> {
    let before = bars.len();
    bars.retain(|b| {
        b.open.is_finite() && b.high.is_finite() && b.low.is_finite() && b.close.is_finite()
    });
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);

    if bars.len() != before {
        debug!("Dropped {} incomplete or duplicate bars", before - bars.len());
    }
    bars
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Datetime", alias = "Date", alias = "timestamp")]
    datetime: DateTime<Utc>,
    #[serde(alias = "Open")]
    open: Option<f64>,
    #[serde(alias = "High")]
    high: Option<f64>,
    #[serde(alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: Option<f64>,
}

/// Bars from local CSV files (offline runs and replays).
///
/// Expects a `Datetime,Open,High,Low,Close` header with RFC 3339 timestamps.
pub struct CsvPriceSource {
    intraday_path: PathBuf,
    daily_path: Option<PathBuf>,
}

impl CsvPriceSource {
    pub fn new(intraday_path: impl Into<PathBuf>) -> Self {
        CsvPriceSource {
            intraday_path: intraday_path.into(),
            daily_path: None,
        }
    }

    pub fn with_daily(mut self, daily_path: impl Into<PathBuf>) -> Self {
        self.daily_path = Some(daily_path.into());
        self
    }

    fn read_bars(path: &PathBuf) -> Result<Vec<Bar>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut bars = Vec::new();

        for record in reader.deserialize::<CsvRow>() {
            let row = record?;
            // null fields are dropped like upstream gaps
            if let (Some(open), Some(high), Some(low), Some(close)) =
                (row.open, row.high, row.low, row.close)
            {
                bars.push(Bar::new(row.datetime, open, high, low, close));
            }
        }

        Ok(clean_bars(bars))
    }
}

impl PriceSource for CsvPriceSource {
    async fn fetch_intraday(&self) -> Result<Vec<Bar>> {
        let bars = Self::read_bars(&self.intraday_path)?;

        // keep only the latest IST day in the file
        let last_day = bars.last().map(|b| b.timestamp.with_timezone(&MARKET_TZ).date_naive());
        let bars: Vec<Bar> = match last_day {
            Some(day) => bars
                .into_iter()
                .filter(|b| b.timestamp.with_timezone(&MARKET_TZ).date_naive() == day)
                .collect(),
            None => {
                warn!("No rows in {}", self.intraday_path.display());
                Vec::new()
            }
        };

        info!("Loaded {} intraday bars from {}", bars.len(), self.intraday_path.display());
        Ok(bars)
    }

    async fn fetch_daily(&self, days: usize) -> Result<Vec<Bar>> {
        let path = self.daily_path.as_ref().ok_or_else(|| {
            VolaError::InvalidParameter("CSV source has no daily file".to_string())
        })?;

        // one row per session, so the trailing rows are the trailing trading days
        let mut bars = Self::read_bars(path)?;
        let skip = bars.len().saturating_sub(days);
        bars.drain(..skip);

        info!("Loaded {} daily bars from {}", bars.len(), path.display());
        Ok(bars)
    }
}
