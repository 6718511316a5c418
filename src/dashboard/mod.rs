/// Dashboard presentation
pub mod view;

pub use view::{CandleRow, DashboardView, LONG_MAV, SHORT_MAV};

use crate::data::Timeframe;
use crate::error::Result;

/// Parse an interval selector label ("1 Minute" .. "1 Day")
pub fn parse_interval(label: &str) -> Result<Timeframe> {
    label.parse()
}
