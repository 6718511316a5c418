pub mod session;

pub use session::{
    get_market_timings, is_market_open, is_trading_day, next_market_open, MARKET_TZ,
};
