//! Outcome feedback: per-ticker reliability stats that nudge the
//! shared flow weight between cycles.

use std::collections::BTreeMap;

use alpha_flow_core::{PerformanceRecord, WeightHandle, FLOW_WEIGHT_MAX, FLOW_WEIGHT_MIN};
use tracing::info;

#[derive(Debug, Default, Clone)]
struct TickerStats {
    wins: u32,
    losses: u32,
    avg_mfe: f64,
}

/// Accumulates outcome records and adjusts the scoring weights once
/// per refresh cycle. This is the only writer of the weight state.
#[derive(Debug)]
pub struct LearningEngine {
    records: Vec<PerformanceRecord>,
    // BTreeMap keeps adjust_weights deterministic across runs.
    stats: BTreeMap<String, TickerStats>,
    weights: WeightHandle,
}

impl LearningEngine {
    #[must_use]
    pub fn new(weights: WeightHandle) -> Self {
        Self {
            records: Vec::new(),
            stats: BTreeMap::new(),
            weights,
        }
    }

    pub fn record_performance(&mut self, record: PerformanceRecord) {
        let stats = self.stats.entry(record.ticker.clone()).or_default();
        if record.win {
            stats.wins += 1;
        } else {
            stats.losses += 1;
        }
        stats.avg_mfe = if stats.avg_mfe == 0.0 {
            record.mfe
        } else {
            (stats.avg_mfe + record.mfe) / 2.0
        };
        self.records.push(record);
    }

    /// Win rate for a ticker; 0.5 with no history.
    #[must_use]
    pub fn reliability(&self, ticker: &str) -> f64 {
        match self.stats.get(ticker) {
            Some(stats) if stats.wins + stats.losses > 0 => {
                f64::from(stats.wins) / f64::from(stats.wins + stats.losses)
            }
            _ => 0.5,
        }
    }

    /// Nudges the flow weight +-0.05 per ticker with history, clamped
    /// to [FLOW_WEIGHT_MIN, FLOW_WEIGHT_MAX]. Tickers are applied in
    /// ascending ticker order, so with mixed reliabilities the
    /// lexicographically last one determines the final value; the clamp
    /// bounds the drift either way.
    pub fn adjust_weights(&self) {
        for ticker in self.stats.keys() {
            let reliability = self.reliability(ticker);
            self.weights.update(|weights| {
                weights.flow = if reliability > 0.6 {
                    (weights.flow + 0.05).min(FLOW_WEIGHT_MAX)
                } else {
                    (weights.flow - 0.05).max(FLOW_WEIGHT_MIN)
                };
            });
        }
        info!(
            flow_weight = self.weights.snapshot().flow,
            tickers = self.stats.len(),
            "Adjusted scoring weights"
        );
    }

    #[must_use]
    pub fn records(&self) -> &[PerformanceRecord] {
        &self.records
    }
}
