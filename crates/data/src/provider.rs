//! Provider traits and the simulated implementations used in
//! development and tests.

use alpha_flow_core::{Greeks, NewsItem};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::{json, Value as JsonValue};

/// Upstream source of price history, greeks exposure, and raw options
/// flow records.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches a close series for `ticker`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn fetch_ohlc(&self, ticker: &str, lookback: usize) -> Result<Vec<f64>>;

    /// Fetches aggregate greek exposures for `ticker`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn fetch_greeks(&self, ticker: &str) -> Result<Greeks>;

    /// Fetches raw flow records for `ticker`. Records are untyped JSON
    /// because upstream feeds disagree on field names and types; the
    /// flow detector owns coercion.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn options_flow(&self, ticker: &str) -> Result<Vec<JsonValue>>;
}

/// Upstream source of recent headlines.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetches recent headlines for `ticker`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn latest_news(&self, ticker: &str) -> Result<Vec<NewsItem>>;
}

/// Random-walk market data provider. Stands in for the real feed when
/// no API key is configured.
pub struct SimulatedMarketProvider {
    #[allow(dead_code)]
    api_key: String,
}

impl SimulatedMarketProvider {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl MarketDataProvider for SimulatedMarketProvider {
    async fn fetch_ohlc(&self, _ticker: &str, lookback: usize) -> Result<Vec<f64>> {
        let mut rng = rand::thread_rng();
        let mut price: f64 = rng.gen_range(80.0..150.0);
        let mut series = Vec::with_capacity(lookback);
        for _ in 0..lookback {
            price += rng.gen_range(-1.0..1.0);
            series.push((price * 100.0).round() / 100.0);
        }
        Ok(series)
    }

    async fn fetch_greeks(&self, _ticker: &str) -> Result<Greeks> {
        let mut rng = rand::thread_rng();
        Ok(Greeks {
            delta: rng.gen_range(-1.0..1.0),
            gamma: rng.gen_range(-1.0..1.0),
            vega: rng.gen_range(0.0..1.0),
        })
    }

    async fn options_flow(&self, ticker: &str) -> Result<Vec<JsonValue>> {
        let mut rng = rand::thread_rng();
        let now = Utc::now();
        let count = rng.gen_range(3..=8);
        let mut flows = Vec::with_capacity(count);
        for _ in 0..count {
            let premium: f64 = rng.gen_range(250_000.0..2_000_000.0);
            let direction = if rng.gen_bool(0.5) { "call" } else { "put" };
            let expiry = now + Duration::days(rng.gen_range(5..=45));
            flows.push(json!({
                "ticker": ticker,
                "direction": direction,
                "notional": premium * rng.gen_range(3.0..6.0),
                "premium": premium,
                "iv": rng.gen_range(0.25..0.9),
                "expiry": expiry.to_rfc3339(),
                "strike": rng.gen_range(0.8..1.2) * rng.gen_range(80.0..120.0),
                "spot": rng.gen_range(80.0..120.0),
                "volume_multiple": rng.gen_range(1.5..10.0),
                "is_sweep": rng.gen_bool(0.5),
                "is_block": rng.gen_bool(0.5),
            }));
        }
        Ok(flows)
    }
}

/// Canned-headline news provider used when no news API key is
/// configured.
pub struct SimulatedNewsProvider {
    #[allow(dead_code)]
    api_key: String,
}

impl SimulatedNewsProvider {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl NewsProvider for SimulatedNewsProvider {
    async fn latest_news(&self, ticker: &str) -> Result<Vec<NewsItem>> {
        let now = Utc::now();
        Ok(vec![
            NewsItem {
                ticker: ticker.to_string(),
                headline: format!("{ticker} beats estimates"),
                timestamp: now - Duration::minutes(15),
            },
            NewsItem {
                ticker: ticker.to_string(),
                headline: format!("{ticker} announces guidance"),
                timestamp: now - Duration::hours(2),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_ohlc_has_requested_length() {
        let provider = SimulatedMarketProvider::new(String::new());
        let series = provider.fetch_ohlc("AAPL", 50).await.unwrap();
        assert_eq!(series.len(), 50);
        assert!(series.iter().all(|p| p.is_finite()));
    }

    #[tokio::test]
    async fn simulated_flow_records_carry_detector_fields() {
        let provider = SimulatedMarketProvider::new(String::new());
        let flows = provider.options_flow("NVDA").await.unwrap();
        assert!((3..=8).contains(&flows.len()));
        for record in &flows {
            assert_eq!(record["ticker"], "NVDA");
            for key in ["premium", "notional", "iv", "expiry", "strike", "spot", "volume_multiple"] {
                assert!(!record[key].is_null(), "missing {key}");
            }
        }
    }

    #[tokio::test]
    async fn simulated_news_is_per_ticker() {
        let provider = SimulatedNewsProvider::new(String::new());
        let items = provider.latest_news("TSLA").await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].headline.starts_with("TSLA"));
    }
}
