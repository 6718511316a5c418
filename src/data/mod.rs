pub mod resample;
pub mod cache;
pub mod source;
pub mod yahoo;

pub use resample::{resample_price, resample_series, resample_volatility, Timeframe};
pub use cache::{RefreshKey, TtlCache};
pub use source::{daily_lookback, CsvPriceSource, PriceSource};
pub use yahoo::YahooFinanceClient;
