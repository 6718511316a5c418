/// Rolling annualized volatility on log returns
use tracing::{debug, warn};

use crate::error::{Result, VolaError};
use crate::types::{Annualization, Bar, VolatilityRow};

/// Sample stddev needs at least two returns per window
pub fn validate_window(window: usize) -> Result<()> {
    if window < 2 {
        return Err(VolaError::InvalidParameter(format!("window must be >= 2, got {}", window)));
    }
    Ok(())
}

/// Log return of each bar against the previous close.
///
/// Index 0 is always `None`. A ratio that does not produce a finite log
/// (zero or negative close) is also `None`.
pub fn log_returns(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        if i == 0 {
            returns.push(None);
            continue;
        }

        let ret = (bars[i].close / bars[i - 1].close).ln();
        returns.push(if ret.is_finite() { Some(ret) } else { None });
    }

    returns
}

/// Sample standard deviation (n - 1 denominator)
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Some(variance.sqrt())
}

/// Rolling sample standard deviation over `window` consecutive values.
///
/// Entry `t` is defined only when every value in `t-window+1 ..= t` is defined.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut buf = Vec::with_capacity(window);
    for t in (window - 1)..values.len() {
        buf.clear();
        for value in &values[t + 1 - window..=t] {
            match value {
                Some(v) => buf.push(*v),
                None => break,
            }
        }

        if buf.len() == window {
            out[t] = sample_std(&buf);
        }
    }

    out
}

/// Compute log returns and rolling annualized volatility.
///
/// Rows where either value is undefined are dropped, so for `n > window` bars
/// with positive closes the output holds `n - window` rows.
pub fn compute_volatility(
    bars: &[Bar],
    window: usize,
    annualization: Annualization,
) -> Vec<VolatilityRow> {
    if window < 2 {
        warn!("Volatility window {} is below 2 - sample stddev undefined", window);
    }

    let returns = log_returns(bars);
    let stds = rolling_std(&returns, window);
    let factor = annualization.factor();

    let rows: Vec<VolatilityRow> = bars
        .iter()
        .zip(returns.iter().zip(stds.iter()))
        .filter_map(|(bar, (ret, std))| {
            let ret = (*ret)?;
            let vola = (*std)? * factor;
            Some(VolatilityRow {
                timestamp: bar.timestamp,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                ret,
                vola,
            })
        })
        .collect();

    debug!(
        "Volatility computed: {} input bars -> {} rows (window={}, basis={})",
        bars.len(),
        rows.len(),
        window,
        annualization.as_str()
    );

    rows
}
