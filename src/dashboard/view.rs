/// Terminal rendering of one volatility snapshot
use std::fmt;
use chrono::{DateTime, Utc};

use crate::analytics::{moving_average, percentage_change};
use crate::data::Timeframe;
use crate::export::format_timestamp;
use crate::pipeline::VolatilitySnapshot;
use crate::time::{is_market_open, next_market_open};
use crate::types::{Bar, VolatilityRow};

pub const SHORT_MAV: usize = 5;
pub const LONG_MAV: usize = 10;

/// Rows shown in the raw table (most recent last)
const TABLE_TAIL: usize = 20;

/// Price candle with its moving-average overlays
#[derive(Debug, Clone, PartialEq)]
pub struct CandleRow {
    pub bar: Bar,
    pub mav_short: Option<f64>,
    pub mav_long: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub window: usize,
    pub fetched_at: DateTime<Utc>,
    pub market_open: bool,
    pub next_open: DateTime<Utc>,
    pub price: Vec<CandleRow>,
    pub vola: Vec<Bar>,
    pub table: Vec<VolatilityRow>,
    /// Change between the first and last close of the session, in percent
    pub session_change_pct: Option<f64>,
}

impl DashboardView {
    pub fn new(snapshot: &VolatilitySnapshot, symbol: &str, now: DateTime<Utc>) -> Self {
        let candles = &snapshot.price_ohlc;
        let short = moving_average(candles, SHORT_MAV);
        let long = moving_average(candles, LONG_MAV);

        let price = candles
            .iter()
            .zip(short.into_iter().zip(long))
            .map(|(bar, (mav_short, mav_long))| CandleRow {
                bar: *bar,
                mav_short,
                mav_long,
            })
            .collect();

        let session_change_pct = match (snapshot.rows.first(), snapshot.rows.last()) {
            (Some(first), Some(last)) => Some(percentage_change(first.close, last.close)),
            _ => None,
        };

        DashboardView {
            symbol: symbol.to_string(),
            timeframe: snapshot.timeframe,
            window: snapshot.window,
            fetched_at: snapshot.fetched_at,
            market_open: is_market_open(now),
            next_open: next_market_open(now),
            price,
            vola: snapshot.vola_ohlc.clone(),
            table: snapshot.rows.clone(),
            session_change_pct,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.table.is_empty()
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn write_to<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(
            out,
            "=== {} volatility | {} candles | window {} | updated {} ===",
            self.symbol,
            self.timeframe.label(),
            self.window,
            format_timestamp(self.fetched_at)
        )?;

        if !self.market_open {
            writeln!(
                out,
                "⚠️  Market closed - showing last available data (next open {})",
                format_timestamp(self.next_open)
            )?;
        }

        if !self.has_data() {
            writeln!(out, "No data available for the current session.")?;
            return Ok(());
        }

        if let (Some(latest), Some(change)) = (self.table.last(), self.session_change_pct) {
            writeln!(
                out,
                "Last {:.2} ({:+.2}%)  vola {:.4}",
                latest.close, change, latest.vola
            )?;
        }

        writeln!(out, "\n-- Price --")?;
        writeln!(
            out,
            "{:<25} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Time", "Open", "High", "Low", "Close", "MA5", "MA10"
        )?;
        for row in &self.price {
            writeln!(
                out,
                "{:<25} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10} {:>10}",
                format_timestamp(row.bar.timestamp),
                row.bar.open,
                row.bar.high,
                row.bar.low,
                row.bar.close,
                fmt_opt(row.mav_short),
                fmt_opt(row.mav_long)
            )?;
        }

        writeln!(out, "\n-- Volatility --")?;
        writeln!(
            out,
            "{:<25} {:>10} {:>10} {:>10} {:>10}",
            "Time", "Open", "High", "Low", "Close"
        )?;
        for bar in &self.vola {
            writeln!(
                out,
                "{:<25} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                format_timestamp(bar.timestamp),
                bar.open,
                bar.high,
                bar.low,
                bar.close
            )?;
        }

        let skip = self.table.len().saturating_sub(TABLE_TAIL);
        writeln!(out, "\n-- Raw data (last {} of {}) --", self.table.len() - skip, self.table.len())?;
        writeln!(
            out,
            "{:<25} {:>10} {:>10} {:>10} {:>10} {:>12} {:>10}",
            "Datetime", "Open", "High", "Low", "Close", "ret", "vola"
        )?;
        for row in &self.table[skip..] {
            writeln!(
                out,
                "{:<25} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12.6} {:>10.4}",
                format_timestamp(row.timestamp),
                row.open,
                row.high,
                row.low,
                row.close,
                row.ret,
                row.vola
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}
