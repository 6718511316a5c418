pub mod volatility;
pub mod indicators;

pub use volatility::{compute_volatility, log_returns, rolling_std, sample_std, validate_window};
pub use indicators::{calculate_sma, moving_average, percentage_change};
