//! Setup classification: a first-match-wins decision table over the
//! assembled candidate.

use alpha_flow_core::{Candidate, Direction, Setup, TrendBias};
use serde_json::Value as JsonValue;

#[derive(Debug, Default, Clone)]
pub struct Classifier;

impl Classifier {
    /// Labels the candidate's setup archetype and records it on the
    /// candidate.
    pub fn classify(&self, candidate: &mut Candidate) -> Setup {
        let label = label(candidate);
        candidate.classification = Some(label);
        label
    }
}

fn label(candidate: &Candidate) -> Setup {
    if candidate.price.change_pct.abs() > 3.0 {
        return if candidate.price.change_pct > 0.0 {
            Setup::Breakout
        } else {
            Setup::Breakdown
        };
    }

    let tech = &candidate.technical;
    let flow = &candidate.flow;
    let momentum_agreement = (tech.bias == TrendBias::Bullish && flow.direction == Direction::Call)
        || (tech.bias == TrendBias::Bearish && flow.direction == Direction::Put);
    if momentum_agreement {
        return Setup::Momentum;
    }

    if (tech.rsi - 50.0).abs() < 5.0 {
        return Setup::Reversal;
    }

    if raw_keys_mention_earnings(&flow.raw) {
        return Setup::PreEarnings;
    }

    if candidate.regime.gex.abs() > candidate.regime.vex.abs() {
        return Setup::Gamma;
    }

    Setup::Structural
}

fn raw_keys_mention_earnings(raw: &JsonValue) -> bool {
    raw.as_object()
        .is_some_and(|map| map.keys().any(|key| key.to_lowercase().contains("earnings")))
}
