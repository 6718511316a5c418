/// Bucket aggregation of 1-minute bars into coarser candles
use std::str::FromStr;
use chrono::{DateTime, Duration, Offset, Utc};
use tracing::debug;

use crate::error::VolaError;
use crate::time::MARKET_TZ;
use crate::types::{Bar, VolatilityRow};

/// Timeframe for bar aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    OneMinute,
    FiveMinute,
    FifteenMinute,
    OneHour,
    OneDay,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::OneMinute,
        Timeframe::FiveMinute,
        Timeframe::FifteenMinute,
        Timeframe::OneHour,
        Timeframe::OneDay,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinute => "5m",
            Timeframe::FifteenMinute => "15m",
            Timeframe::OneHour => "1h",
            Timeframe::OneDay => "1d",
        }
    }

    /// Label shown in the interval selector
    pub fn label(&self) -> &str {
        match self {
            Timeframe::OneMinute => "1 Minute",
            Timeframe::FiveMinute => "5 Minutes",
            Timeframe::FifteenMinute => "15 Minutes",
            Timeframe::OneHour => "1 Hour",
            Timeframe::OneDay => "1 Day",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Timeframe::ALL.into_iter().find(|tf| tf.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn duration_minutes(&self) -> i64 {
        match self {
            Timeframe::OneMinute => 1,
            Timeframe::FiveMinute => 5,
            Timeframe::FifteenMinute => 15,
            Timeframe::OneHour => 60,
            Timeframe::OneDay => 1440, // 24 * 60
        }
    }

    /// Start of the bucket containing `timestamp`, aligned to IST wall-clock
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let offset_secs = timestamp
            .with_timezone(&MARKET_TZ)
            .offset()
            .fix()
            .local_minus_utc() as i64;

        let width_secs = self.duration_minutes() * 60;
        let local_secs = timestamp.timestamp() + offset_secs;
        let excess = local_secs.rem_euclid(width_secs);

        timestamp
            - Duration::seconds(excess)
            - Duration::nanoseconds(timestamp.timestamp_subsec_nanos() as i64)
    }
}

impl FromStr for Timeframe {
    type Err = VolaError;

    /// Accepts selector labels ("5 Minutes"), short codes ("5m") and
    /// pandas-style aliases ("5T", "1H", "1D")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(tf) = Timeframe::from_label(s) {
            return Ok(tf);
        }

        match s.trim().to_ascii_lowercase().as_str() {
            "1m" | "1t" | "1min" => Ok(Timeframe::OneMinute),
            "5m" | "5t" | "5min" => Ok(Timeframe::FiveMinute),
            "15m" | "15t" | "15min" => Ok(Timeframe::FifteenMinute),
            "1h" | "60m" => Ok(Timeframe::OneHour),
            "1d" => Ok(Timeframe::OneDay),
            _ => Err(VolaError::UnknownInterval(s.to_string())),
        }
    }
}

/// Candle in progress (bucket not yet closed)
#[derive(Debug, Clone)]
struct PartialBar {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl PartialBar {
    fn new(timestamp: DateTime<Utc>, first: &Bar) -> Self {
        PartialBar {
            timestamp,
            open: first.open,
            high: first.high,
            low: first.low,
            close: first.close,
        }
    }

    fn update(&mut self, bar: &Bar) {
        self.close = bar.close;
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
    }

    fn to_bar(&self) -> Bar {
        Bar::new(self.timestamp, self.open, self.high, self.low, self.close)
    }
}

fn aggregate<'a, I>(bars: I, timeframe: Timeframe) -> Vec<Bar>
where
    I: IntoIterator<Item = &'a Bar>,
{
    let mut sorted: Vec<&Bar> = bars.into_iter().collect();
    sorted.sort_by_key(|b| b.timestamp);

    let mut out = Vec::new();
    let mut current: Option<PartialBar> = None;

    for bar in sorted {
        let boundary = timeframe.bucket_start(bar.timestamp);

        match current.as_mut() {
            Some(partial) if partial.timestamp == boundary => partial.update(bar),
            Some(partial) => {
                out.push(partial.to_bar());
                current = Some(PartialBar::new(boundary, bar));
            }
            None => current = Some(PartialBar::new(boundary, bar)),
        }
    }

    if let Some(partial) = current {
        out.push(partial.to_bar());
    }

    out
}

/// Resample a price table: Open=first, High=max, Low=min, Close=last
pub fn resample_price(bars: &[Bar], timeframe: Timeframe) -> Vec<Bar> {
    let out = aggregate(bars, timeframe);
    debug!("Resampled {} price bars -> {} {} candles", bars.len(), out.len(), timeframe.as_str());
    out
}

/// Resample a single-valued series into OHLC candles of its values
pub fn resample_series(series: &[(DateTime<Utc>, f64)], timeframe: Timeframe) -> Vec<Bar> {
    let points: Vec<Bar> = series
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(ts, v)| Bar::flat(*ts, *v))
        .collect();

    let out = aggregate(&points, timeframe);
    debug!("Resampled {} series points -> {} {} candles", series.len(), out.len(), timeframe.as_str());
    out
}

/// Volatility column of a computed table as candles
pub fn resample_volatility(rows: &[VolatilityRow], timeframe: Timeframe) -> Vec<Bar> {
    let series: Vec<(DateTime<Utc>, f64)> = rows.iter().map(|r| (r.timestamp, r.vola)).collect();
    resample_series(&series, timeframe)
}
