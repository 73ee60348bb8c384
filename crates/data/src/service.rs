//! Cached facade over the market data and news providers.

use std::sync::Arc;
use std::time::Duration;

use alpha_flow_core::{Greeks, NewsItem, PriceSnapshot};
use anyhow::{bail, Result};
use chrono::Utc;
use serde_json::Value as JsonValue;

use crate::cache::TtlCache;
use crate::provider::{MarketDataProvider, NewsProvider};
use crate::retry::with_retry;

const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(100);
const OHLC_LOOKBACK: usize = 50;

/// Serves snapshots and greeks from cache, flow and news straight
/// through. One instance is shared across the refresh cycle.
pub struct DataService {
    market: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    snapshots: TtlCache<PriceSnapshot>,
    greeks: TtlCache<Greeks>,
}

impl DataService {
    #[must_use]
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            market,
            news,
            snapshots: TtlCache::new(cache_ttl),
            greeks: TtlCache::new(cache_ttl),
        }
    }

    /// Builds a price snapshot from the latest close series, serving
    /// from cache when a fresh one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails after retries or
    /// returns an empty series.
    pub async fn get_price_snapshot(&self, ticker: &str) -> Result<PriceSnapshot> {
        let cache_key = format!("price:{ticker}");
        if let Some(snapshot) = self.snapshots.get(&cache_key) {
            return Ok(snapshot);
        }

        let series = with_retry(
            || self.market.fetch_ohlc(ticker, OHLC_LOOKBACK),
            RETRY_ATTEMPTS,
            RETRY_BASE_DELAY,
        )
        .await?;
        let Some(&price) = series.last() else {
            bail!("empty close series for {ticker}");
        };
        let prev = if series.len() > 1 {
            series[series.len() - 2]
        } else {
            price
        };
        let change_pct = if prev != 0.0 {
            (price - prev) / prev * 100.0
        } else {
            0.0
        };
        let window = &series[series.len().saturating_sub(20)..];
        let vwap = window.iter().sum::<f64>() / window.len() as f64;
        let ohlc = series[series.len().saturating_sub(OHLC_LOOKBACK)..].to_vec();

        let snapshot = PriceSnapshot {
            ticker: ticker.to_string(),
            price,
            change_pct,
            volume: (price * 10_000.0).abs(),
            vwap,
            sector_strength: 0.0,
            timestamp: Utc::now(),
            ohlc,
        };
        self.snapshots.set(cache_key, snapshot.clone());
        Ok(snapshot)
    }

    /// Fetches greek exposures, serving from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails after retries.
    pub async fn get_greeks(&self, ticker: &str) -> Result<Greeks> {
        let cache_key = format!("greeks:{ticker}");
        if let Some(greeks) = self.greeks.get(&cache_key) {
            return Ok(greeks);
        }
        let greeks = with_retry(
            || self.market.fetch_greeks(ticker),
            RETRY_ATTEMPTS,
            RETRY_BASE_DELAY,
        )
        .await?;
        self.greeks.set(cache_key, greeks);
        Ok(greeks)
    }

    /// Fetches raw flow records. Never cached; flow is only useful
    /// fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails after retries.
    pub async fn get_options_flow(&self, ticker: &str) -> Result<Vec<JsonValue>> {
        with_retry(
            || self.market.options_flow(ticker),
            RETRY_ATTEMPTS,
            RETRY_BASE_DELAY,
        )
        .await
    }

    /// Fetches recent headlines.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails after retries.
    pub async fn get_news(&self, ticker: &str) -> Result<Vec<NewsItem>> {
        with_retry(
            || self.news.latest_news(ticker),
            RETRY_ATTEMPTS,
            RETRY_BASE_DELAY,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedSeriesProvider {
        series: Vec<f64>,
        ohlc_calls: AtomicU32,
    }

    impl FixedSeriesProvider {
        fn new(series: Vec<f64>) -> Self {
            Self {
                series,
                ohlc_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for FixedSeriesProvider {
        async fn fetch_ohlc(&self, _ticker: &str, _lookback: usize) -> Result<Vec<f64>> {
            self.ohlc_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.series.clone())
        }

        async fn fetch_greeks(&self, _ticker: &str) -> Result<Greeks> {
            Ok(Greeks {
                delta: 0.4,
                gamma: 0.1,
                vega: 0.2,
            })
        }

        async fn options_flow(&self, _ticker: &str) -> Result<Vec<JsonValue>> {
            Ok(Vec::new())
        }
    }

    struct NoNews;

    #[async_trait]
    impl NewsProvider for NoNews {
        async fn latest_news(&self, _ticker: &str) -> Result<Vec<NewsItem>> {
            Ok(Vec::new())
        }
    }

    fn service_with(series: Vec<f64>) -> (DataService, Arc<FixedSeriesProvider>) {
        let provider = Arc::new(FixedSeriesProvider::new(series));
        let service = DataService::new(provider.clone(), Arc::new(NoNews), Duration::from_secs(60));
        (service, provider)
    }

    #[tokio::test]
    async fn snapshot_derives_from_close_series() {
        let (service, _) = service_with(vec![100.0, 101.0, 102.0, 104.04]);
        let snapshot = service.get_price_snapshot("AAPL").await.unwrap();
        assert!((snapshot.price - 104.04).abs() < 1e-9);
        assert!((snapshot.change_pct - 2.0).abs() < 1e-9);
        assert!((snapshot.volume - 1_040_400.0).abs() < 1e-6);
        assert_eq!(snapshot.ohlc.len(), 4);
        let expected_vwap = (100.0 + 101.0 + 102.0 + 104.04) / 4.0;
        assert!((snapshot.vwap - expected_vwap).abs() < 1e-9);
    }

    #[tokio::test]
    async fn single_point_series_has_zero_change() {
        let (service, _) = service_with(vec![100.0]);
        let snapshot = service.get_price_snapshot("AAPL").await.unwrap();
        assert_eq!(snapshot.change_pct, 0.0);
    }

    #[tokio::test]
    async fn empty_series_is_an_error() {
        let (service, _) = service_with(Vec::new());
        assert!(service.get_price_snapshot("AAPL").await.is_err());
    }

    #[tokio::test]
    async fn second_snapshot_request_hits_the_cache() {
        let (service, provider) = service_with(vec![100.0, 101.0, 102.0, 103.0, 104.0]);
        service.get_price_snapshot("AAPL").await.unwrap();
        service.get_price_snapshot("AAPL").await.unwrap();
        assert_eq!(provider.ohlc_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn vwap_uses_at_most_twenty_points() {
        let series: Vec<f64> = (1..=30).map(f64::from).collect();
        let (service, _) = service_with(series);
        let snapshot = service.get_price_snapshot("AAPL").await.unwrap();
        // mean of 11..=30
        assert!((snapshot.vwap - 20.5).abs() < 1e-9);
    }
}
