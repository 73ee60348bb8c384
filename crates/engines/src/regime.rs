//! Market regime classification from a price series plus externally
//! supplied gamma/vega exposure proxies.

use std::collections::VecDeque;

use alpha_flow_core::{MarketRegimeState, RiskEnvironment, TrendBias};
use chrono::Utc;
use thiserror::Error;

/// Fewest price points the regime evaluation accepts.
pub const MIN_PRICE_POINTS: usize = 5;

#[derive(Debug, Error)]
pub enum RegimeError {
    #[error("not enough price history to evaluate regime: need {MIN_PRICE_POINTS} points, got {0}")]
    InsufficientHistory(usize),
}

/// Derives volatility/trend/liquidity state and keeps a capped history
/// of past evaluations.
#[derive(Debug)]
pub struct RegimeEngine {
    history: VecDeque<MarketRegimeState>,
    history_cap: usize,
}

impl RegimeEngine {
    #[must_use]
    pub fn new(history_cap: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(history_cap.min(64)),
            history_cap,
        }
    }

    /// Evaluates the regime for one chronological price series.
    ///
    /// # Errors
    /// Returns [`RegimeError::InsufficientHistory`] below
    /// [`MIN_PRICE_POINTS`] points; this is the one hard validation
    /// failure in the pipeline and aborts the ticker's cycle iteration.
    pub fn evaluate(
        &mut self,
        prices: &[f64],
        gex: f64,
        vex: f64,
    ) -> Result<MarketRegimeState, RegimeError> {
        if prices.len() < MIN_PRICE_POINTS {
            return Err(RegimeError::InsufficientHistory(prices.len()));
        }

        let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect();
        let volatility = if returns.len() > 1 {
            population_stdev(&returns) * 252.0_f64.sqrt()
        } else {
            0.0
        };
        let trend = (prices[prices.len() - 1] - prices[0]) / prices[0];
        let liquidity = median(returns.iter().map(|r| r.abs()).collect());

        let trend_bias = if trend > 0.02 {
            TrendBias::Bullish
        } else if trend < -0.02 {
            TrendBias::Bearish
        } else {
            TrendBias::Neutral
        };
        let risk_environment = risk_environment(volatility, liquidity, vex);

        let regime = MarketRegimeState {
            trend_bias,
            volatility,
            liquidity,
            risk_environment,
            gex,
            vex,
            reasoning: format!(
                "trend={trend_bias} vol={volatility:.2} liquidity={liquidity:.4} gex={gex:.2} vex={vex:.2}"
            ),
            as_of: Utc::now(),
        };

        self.history.push_back(regime.clone());
        while self.history.len() > self.history_cap {
            self.history.pop_front();
        }
        Ok(regime)
    }

    /// Past evaluations, oldest first, capped at the configured length.
    #[must_use]
    pub fn history(&self) -> &VecDeque<MarketRegimeState> {
        &self.history
    }
}

/// First match wins: volatility/vega stress, then thin tape, then balanced.
fn risk_environment(volatility: f64, liquidity: f64, vex: f64) -> RiskEnvironment {
    if volatility > 0.4 || vex > 0.6 {
        RiskEnvironment::HighRisk
    } else if liquidity < 0.002 {
        RiskEnvironment::Illiquid
    } else {
        RiskEnvironment::Balanced
    }
}

fn population_stdev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
