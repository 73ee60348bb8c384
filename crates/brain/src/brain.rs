//! The signal brain: one refresh cycle per ticker through detection,
//! regime, technicals, classification, scoring, routing, persistence,
//! and dispatch.

use std::sync::Arc;
use std::time::Duration;

use alpha_flow_alerts::AlertDispatcher;
use alpha_flow_core::{AppConfig, Route, RoutedSignal, WeightHandle};
use alpha_flow_data::{DataService, MarketDataProvider, NewsProvider};
use alpha_flow_engines::{
    CandidateBuilder, Classifier, FlowDetector, LearningEngine, RegimeEngine, RoutingEngine,
    ScoringEngine, TechnicalEngine,
};
use alpha_flow_ledger::SignalLedger;
use anyhow::Result;
use serde_json::json;
use tracing::{error, warn};

pub struct SignalBrain {
    data: DataService,
    flow: FlowDetector,
    regime: RegimeEngine,
    technical: TechnicalEngine,
    builder: CandidateBuilder,
    classifier: Classifier,
    scoring: ScoringEngine,
    routing: RoutingEngine,
    learning: LearningEngine,
    ledger: SignalLedger,
    alerts: AlertDispatcher,
}

impl SignalBrain {
    /// Wires the pipeline. The scoring and learning engines share one
    /// weight handle; learning is the only writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the alert dispatcher cannot be built.
    pub fn new(
        config: &AppConfig,
        market: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
        ledger: SignalLedger,
    ) -> Result<Self> {
        let weights = WeightHandle::default();
        Ok(Self {
            data: DataService::new(
                market,
                news,
                Duration::from_secs(config.market_data.cache_ttl_seconds),
            ),
            flow: FlowDetector::new(
                config.detection.min_premium,
                config.detection.min_volume_multiple,
            ),
            regime: RegimeEngine::new(config.regime.history_cap),
            technical: TechnicalEngine,
            builder: CandidateBuilder,
            classifier: Classifier,
            scoring: ScoringEngine::new(weights.clone()),
            routing: RoutingEngine::new(
                config.queues.intraday_expiry_minutes,
                config.queues.swing_expiry_days,
            ),
            learning: LearningEngine::new(weights),
            ledger,
            alerts: AlertDispatcher::new(config.alerts.clone())?,
        })
    }

    /// Runs one ticker through the full pipeline. Returns `None` when
    /// no qualifying flow produced a candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if a data fetch fails, the price history is
    /// too short for regime evaluation, or the ledger write fails.
    pub async fn run_for_ticker(&mut self, ticker: &str) -> Result<Option<RoutedSignal>> {
        let data = &self.data;
        let (price, raw_flows, greeks, news_items) = tokio::try_join!(
            data.get_price_snapshot(ticker),
            data.get_options_flow(ticker),
            data.get_greeks(ticker),
            data.get_news(ticker),
        )?;

        let flows = self.flow.detect(&raw_flows);
        let gex = greeks.gamma;
        let vex = greeks.vega.abs();
        let regime = self.regime.evaluate(&price.ohlc, gex, vex)?;
        let technical = self.technical.evaluate(
            ticker,
            &price.ohlc,
            price.volume,
            price.vwap,
            price.sector_strength,
        );
        let has_news = !news_items.is_empty();

        let Some(mut candidate) = self.builder.build(&flows, &price, &regime, &technical) else {
            return Ok(None);
        };
        self.classifier.classify(&mut candidate);
        let score = self.scoring.score(&mut candidate, has_news);
        let signal = self.routing.route(candidate, score);

        if signal.route == Route::ImmediateAlert {
            self.alerts.dispatch(&signal).await;
        }
        self.ledger
            .record_signal(&signal, Some(json!({ "has_news": has_news })))
            .await?;
        Ok(Some(signal))
    }

    /// Runs every ticker, then performs end-of-cycle maintenance:
    /// queue refresh, ledger expiry sweep, and weight adjustment. A
    /// failing ticker is logged and skipped; it never aborts the
    /// cycle.
    pub async fn refresh(&mut self, tickers: &[String]) -> Vec<RoutedSignal> {
        let mut signals = Vec::new();
        for ticker in tickers {
            match self.run_for_ticker(ticker).await {
                Ok(Some(signal)) => signals.push(signal),
                Ok(None) => {}
                Err(err) => {
                    warn!(ticker = %ticker, error = %err, "Failed to run for ticker");
                }
            }
        }
        self.routing.refresh_queues();
        if let Err(err) = self.ledger.expire_stale().await {
            error!(error = %err, "Ledger expiry sweep failed");
        }
        self.learning.adjust_weights();
        signals
    }

    #[must_use]
    pub fn routing(&self) -> &RoutingEngine {
        &self.routing
    }

    #[must_use]
    pub fn ledger(&self) -> &SignalLedger {
        &self.ledger
    }

    pub fn learning_mut(&mut self) -> &mut LearningEngine {
        &mut self.learning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpha_flow_core::Greeks;
    use alpha_flow_core::NewsItem;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};
    use serde_json::Value as JsonValue;

    struct ScriptedProvider {
        prices: Vec<f64>,
        flows: Vec<JsonValue>,
    }

    #[async_trait]
    impl MarketDataProvider for ScriptedProvider {
        async fn fetch_ohlc(&self, _ticker: &str, _lookback: usize) -> Result<Vec<f64>> {
            Ok(self.prices.clone())
        }

        async fn fetch_greeks(&self, _ticker: &str) -> Result<Greeks> {
            Ok(Greeks {
                delta: 0.4,
                gamma: 0.1,
                vega: 0.2,
            })
        }

        async fn options_flow(&self, _ticker: &str) -> Result<Vec<JsonValue>> {
            Ok(self.flows.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl MarketDataProvider for FailingProvider {
        async fn fetch_ohlc(&self, _ticker: &str, _lookback: usize) -> Result<Vec<f64>> {
            Err(anyhow!("upstream down"))
        }

        async fn fetch_greeks(&self, _ticker: &str) -> Result<Greeks> {
            Err(anyhow!("upstream down"))
        }

        async fn options_flow(&self, _ticker: &str) -> Result<Vec<JsonValue>> {
            Err(anyhow!("upstream down"))
        }
    }

    struct QuietNews;

    #[async_trait]
    impl NewsProvider for QuietNews {
        async fn latest_news(&self, _ticker: &str) -> Result<Vec<NewsItem>> {
            Ok(Vec::new())
        }
    }

    fn scripted_flow(ticker: &str) -> JsonValue {
        json!({
            "ticker": ticker,
            "direction": "call",
            "premium": 1_000_000.0,
            "notional": 3_200_000.0,
            "iv": 0.55,
            "expiry": (Utc::now() + ChronoDuration::days(21)).to_rfc3339(),
            "strike": 105.0,
            "spot": 103.0,
            "volume_multiple": 4.0,
            "is_sweep": true,
        })
    }

    async fn brain_with(provider: Arc<dyn MarketDataProvider>) -> SignalBrain {
        let config = AppConfig::default();
        let ledger = SignalLedger::open_in_memory(60, 10).await.unwrap();
        SignalBrain::new(&config, provider, Arc::new(QuietNews), ledger).unwrap()
    }

    #[tokio::test]
    async fn strong_flow_lands_in_the_ledger() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + f64::from(i) / 3.0).collect();
        let provider = Arc::new(ScriptedProvider {
            prices,
            flows: vec![scripted_flow("NVDA")],
        });
        let mut brain = brain_with(provider).await;

        let signal = brain.run_for_ticker("NVDA").await.unwrap().unwrap();
        assert_ne!(signal.route, Route::Reject);
        let pending = brain.ledger().get_pending_for_checks(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].ticker, "NVDA");
    }

    #[tokio::test]
    async fn no_flow_means_no_candidate() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + f64::from(i) / 3.0).collect();
        let provider = Arc::new(ScriptedProvider {
            prices,
            flows: Vec::new(),
        });
        let mut brain = brain_with(provider).await;
        assert!(brain.run_for_ticker("NVDA").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn short_history_is_a_hard_error() {
        let provider = Arc::new(ScriptedProvider {
            prices: vec![100.0, 101.0],
            flows: vec![scripted_flow("NVDA")],
        });
        let mut brain = brain_with(provider).await;
        assert!(brain.run_for_ticker("NVDA").await.is_err());
    }

    #[tokio::test]
    async fn refresh_survives_a_failing_ticker() {
        let mut brain = brain_with(Arc::new(FailingProvider)).await;
        let signals = brain
            .refresh(&["AAPL".to_string(), "MSFT".to_string()])
            .await;
        assert!(signals.is_empty());
    }
}
