/// Acquire -> transform -> resample call chain behind the refresh cache
use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::analytics::compute_volatility;
use crate::data::{
    daily_lookback, resample_price, resample_volatility, PriceSource, RefreshKey, Timeframe,
    TtlCache,
};
use crate::error::{Result, VolaError};
use crate::types::{Annualization, Bar, VolatilityRow};

/// One refresh worth of derived tables
#[derive(Debug, Clone)]
pub struct VolatilitySnapshot {
    pub fetched_at: DateTime<Utc>,
    pub window: usize,
    pub timeframe: Timeframe,
    pub annualization: Annualization,
    /// 1-minute bars with `ret` and `vola`
    pub rows: Vec<VolatilityRow>,
    pub price_ohlc: Vec<Bar>,
    pub vola_ohlc: Vec<Bar>,
}

impl VolatilitySnapshot {
    pub fn build(
        bars: &[Bar],
        window: usize,
        timeframe: Timeframe,
        annualization: Annualization,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let rows = compute_volatility(bars, window, annualization);
        // candles are built from the rows that survived the transform
        let kept: Vec<Bar> = rows.iter().map(VolatilityRow::bar).collect();

        VolatilitySnapshot {
            fetched_at,
            window,
            timeframe,
            annualization,
            price_ohlc: resample_price(&kept, timeframe),
            vola_ohlc: resample_volatility(&rows, timeframe),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&VolatilityRow> {
        self.rows.last()
    }
}

pub struct VolatilityPipeline<S> {
    source: S,
    annualization: Annualization,
    cache: TtlCache<RefreshKey, VolatilitySnapshot>,
}

impl<S: PriceSource> VolatilityPipeline<S> {
    pub fn new(source: S, annualization: Annualization, cache_ttl: Duration) -> Self {
        VolatilityPipeline {
            source,
            annualization,
            cache: TtlCache::new(cache_ttl),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Intraday snapshot for `(window, timeframe)`, memoized for the cache TTL
    pub async fn refresh(&self, window: usize, timeframe: Timeframe) -> Result<Arc<VolatilitySnapshot>> {
        let key = RefreshKey::new(window, timeframe);
        let annualization = self.annualization;

        self.cache
            .try_get_or_insert_with(key, || async move {
                let bars = self.source.fetch_intraday().await?;
                if bars.is_empty() {
                    warn!("Upstream returned no bars - snapshot will be empty");
                }

                let snapshot =
                    VolatilitySnapshot::build(&bars, window, timeframe, annualization, Utc::now());
                info!(
                    "📊 Refreshed: {} bars -> {} rows, {} {} candles (window={})",
                    bars.len(),
                    snapshot.rows.len(),
                    snapshot.price_ohlc.len(),
                    timeframe.as_str(),
                    window
                );
                Ok::<_, VolaError>(snapshot)
            })
            .await
    }

    /// Daily-bar volatility over `window_days`, annualized with sqrt(252)
    pub async fn refresh_daily(&self, window_days: usize) -> Result<Vec<VolatilityRow>> {
        let bars = self.source.fetch_daily(daily_lookback(window_days)).await?;
        let rows = compute_volatility(&bars, window_days, Annualization::Daily);
        info!("📊 Daily volatility: {} bars -> {} rows (window={}d)", bars.len(), rows.len(), window_days);
        Ok(rows)
    }

    /// Drop all memoized snapshots
    pub async fn invalidate(&self) {
        let dropped = self.cache.invalidate().await;
        debug!("Invalidated {} cached snapshots", dropped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use chrono::{Duration as ChronoDuration, TimeZone};

    use crate::time::MARKET_TZ;

    struct FakeSource {
        bars: Vec<Bar>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(bars: Vec<Bar>) -> Self {
            FakeSource { bars, calls: AtomicUsize::new(0) }
        }
    }

    impl PriceSource for FakeSource {
        async fn fetch_intraday(&self) -> Result<Vec<Bar>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bars.clone())
        }

        async fn fetch_daily(&self, days: usize) -> Result<Vec<Bar>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bars.iter().rev().take(days).rev().cloned().collect())
        }
    }

    fn session_bars(count: usize) -> Vec<Bar> {
        let open = MARKET_TZ.with_ymd_and_hms(2025, 1, 15, 9, 15, 0).unwrap().with_timezone(&Utc);
        (0..count)
            .map(|i| {
                let c = 76000.0 + (i as f64 * 0.9).cos() * 25.0 + i as f64;
                Bar::new(open + ChronoDuration::minutes(i as i64), c - 2.0, c + 4.0, c - 5.0, c)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_refresh_builds_all_tables() {
        let pipeline = VolatilityPipeline::new(
            FakeSource::new(session_bars(60)),
            Annualization::Minute,
            Duration::from_secs(60),
        );

        let snapshot = pipeline.refresh(5, Timeframe::FifteenMinute).await.unwrap();
        assert_eq!(snapshot.rows.len(), 55);
        // rows start at 09:20 -> buckets 09:15, 09:30, 09:45, 10:00
        assert_eq!(snapshot.price_ohlc.len(), 4);
        assert_eq!(snapshot.vola_ohlc.len(), 4);
        assert_eq!(snapshot.price_ohlc[0].open, snapshot.rows[0].open);
    }

    #[tokio::test]
    async fn test_refresh_is_memoized_per_key() {
        let pipeline = VolatilityPipeline::new(
            FakeSource::new(session_bars(30)),
            Annualization::Minute,
            Duration::from_secs(60),
        );

        pipeline.refresh(5, Timeframe::OneMinute).await.unwrap();
        pipeline.refresh(5, Timeframe::OneMinute).await.unwrap();
        assert_eq!(pipeline.source().calls.load(Ordering::SeqCst), 1);

        pipeline.refresh(5, Timeframe::FiveMinute).await.unwrap();
        assert_eq!(pipeline.source().calls.load(Ordering::SeqCst), 2);

        pipeline.invalidate().await;
        pipeline.refresh(5, Timeframe::OneMinute).await.unwrap();
        assert_eq!(pipeline.source().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_upstream_gives_empty_snapshot() {
        let pipeline = VolatilityPipeline::new(
            FakeSource::new(Vec::new()),
            Annualization::Minute,
            Duration::from_secs(60),
        );

        let snapshot = pipeline.refresh(5, Timeframe::OneHour).await.unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.price_ohlc.is_empty());
        assert!(snapshot.vola_ohlc.is_empty());
        assert!(snapshot.latest().is_none());
    }

    #[tokio::test]
    async fn test_refresh_daily_uses_triple_lookback() {
        let pipeline = VolatilityPipeline::new(
            FakeSource::new(session_bars(100)),
            Annualization::Minute,
            Duration::from_secs(60),
        );

        let rows = pipeline.refresh_daily(10).await.unwrap();
        // 30 bars requested, first 10 dropped
        assert_eq!(rows.len(), 20);
    }
}
