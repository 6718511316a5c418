/// Chart overlay indicators
use crate::types::Bar;

/// Calculate SMA (Simple Moving Average) of the last `period` closes
pub fn calculate_sma(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }

    let sum: f64 = bars.iter()
        .rev()
        .take(period)
        .map(|b| b.close)
        .sum();

    Some(sum / period as f64)
}

/// SMA of closes at every bar; `None` until `period` bars are available
pub fn moving_average(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    (0..bars.len())
        .map(|i| calculate_sma(&bars[..=i], period))
        .collect()
}

/// Helper: Calculate percentage change
pub fn percentage_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    ((to - from) / from) * 100.0
}
