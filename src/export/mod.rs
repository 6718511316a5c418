/// Export sinks for computed tables
pub mod excel;
pub mod gsheet;

pub use excel::save_table;
pub use gsheet::{GoogleSheetsClient, ServiceAccountKey, SheetExport};

use chrono::{DateTime, Utc};

use crate::time::MARKET_TZ;
use crate::types::{Bar, VolatilityRow};

/// Header of the timestamp index column
pub const INDEX_COLUMN: &str = "Datetime";

/// Row type that can be written as a timestamp-indexed table
pub trait Tabular {
    fn columns() -> &'static [&'static str];
    fn timestamp(&self) -> DateTime<Utc>;
    fn values(&self) -> Vec<f64>;
}

impl Tabular for Bar {
    fn columns() -> &'static [&'static str] {
        &["Open", "High", "Low", "Close"]
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn values(&self) -> Vec<f64> {
        vec![self.open, self.high, self.low, self.close]
    }
}

impl Tabular for VolatilityRow {
    fn columns() -> &'static [&'static str] {
        &["Open", "High", "Low", "Close", "ret", "vola"]
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn values(&self) -> Vec<f64> {
        vec![self.open, self.high, self.low, self.close, self.ret, self.vola]
    }
}

/// Index column first, then the value columns
pub fn header<T: Tabular>() -> Vec<String> {
    std::iter::once(INDEX_COLUMN)
        .chain(T::columns().iter().copied())
        .map(str::to_string)
        .collect()
}

/// Timestamp in exchange time, e.g. `2025-01-15 09:15:00+05:30`
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&MARKET_TZ).format("%Y-%m-%d %H:%M:%S%:z").to_string()
}

/// Header row followed by every row rendered as text
pub fn to_text_rows<T: Tabular>(rows: &[T]) -> Vec<Vec<String>> {
    let mut out = Vec::with_capacity(rows.len() + 1);
    out.push(header::<T>());

    for row in rows {
        let mut cells = Vec::with_capacity(T::columns().len() + 1);
        cells.push(format_timestamp(row.timestamp()));
        cells.extend(row.values().iter().map(|v| format!("{:?}", v)));
        out.push(cells);
    }

    out
}
