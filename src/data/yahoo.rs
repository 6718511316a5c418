/// Yahoo Finance chart API client
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::data::source::{clean_bars, PriceSource};
use crate::error::{Result, VolaError};
use crate::types::Bar;
use crate::utils::RateLimiter;

/// Public chart API host
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) volatrack/0.1";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Parse a chart API body into bars, dropping rows with any null price
pub fn parse_chart_response(body: &str) -> Result<Vec<Bar>> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(err) = response.chart.error {
        return Err(VolaError::UpstreamError(format!("{}: {}", err.code, err.description)));
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.swap_remove(0)) })
        .ok_or_else(|| VolaError::UpstreamError("Chart response has no result".to_string()))?;

    // pre-market and holidays come back without timestamps
    let timestamps = match result.timestamp {
        Some(ts) => ts,
        None => return Ok(Vec::new()),
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let bars: Vec<Bar> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let timestamp = DateTime::<Utc>::from_timestamp(*ts, 0)?;
            Some(Bar::new(
                timestamp,
                (*quote.open.get(i)?)?,
                (*quote.high.get(i)?)?,
                (*quote.low.get(i)?)?,
                (*quote.close.get(i)?)?,
            ))
        })
        .collect();

    if bars.len() < timestamps.len() {
        debug!("Dropped {} rows with null prices", timestamps.len() - bars.len());
    }

    Ok(clean_bars(bars))
}

/// Calendar days that cover `trading_days` sessions, with room for holidays
pub fn calendar_span(trading_days: usize) -> usize {
    trading_days.max(1) * 7 / 5 + 10
}

/// Yahoo Finance price source for a single ticker
pub struct YahooFinanceClient {
    client: Client,
    symbol: String,
    base_url: String,
    rate_limiter: RateLimiter,
}

impl YahooFinanceClient {
    pub fn new(symbol: impl Into<String>, requests_per_second: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(YahooFinanceClient {
            client,
            symbol: symbol.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limiter: RateLimiter::new(requests_per_second),
        })
    }

    /// Point the client at another host (proxies, mirrors)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    async fn get_chart(&self, interval: &str, range: &str) -> Result<Vec<Bar>> {
        self.rate_limiter.acquire().await;

        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            self.symbol.replace('^', "%5E")
        );
        debug!("Fetching chart: {} interval={} range={}", self.symbol, interval, range);

        let response = self.client
            .get(&url)
            .query(&[("interval", interval), ("range", range)])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() == 429 {
            return Err(VolaError::RateLimitExceeded(format!("{} chart request throttled", self.symbol)));
        }

        // error bodies still carry a chart.error object
        match parse_chart_response(&body) {
            Ok(bars) => Ok(bars),
            Err(e) if !status.is_success() => Err(VolaError::UpstreamError(format!(
                "HTTP {} for {}: {}",
                status, self.symbol, e
            ))),
            Err(e) => Err(e),
        }
    }
}

impl PriceSource for YahooFinanceClient {
    async fn fetch_intraday(&self) -> Result<Vec<Bar>> {
        let bars = self.get_chart("1m", "1d").await?;

        if bars.is_empty() {
            warn!("No intraday bars for {} (market closed or pre-open?)", self.symbol);
        } else {
            info!("Fetched {} intraday bars for {}", bars.len(), self.symbol);
        }
        Ok(bars)
    }

    async fn fetch_daily(&self, days: usize) -> Result<Vec<Bar>> {
        let range = format!("{}d", calendar_span(days));
        let mut bars = self.get_chart("1d", &range).await?;

        // the range is in calendar days; keep the trailing trading days
        let skip = bars.len().saturating_sub(days);
        bars.drain(..skip);

        info!("Fetched {} daily bars for {} ({})", bars.len(), self.symbol, range);
        Ok(bars)
    }
}
