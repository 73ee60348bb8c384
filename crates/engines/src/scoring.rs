//! Confidence scoring: weighted sub-scores folded into one 0-100 score
//! and letter grade.
//!
//! The engine reads a weight snapshot from the shared [`WeightHandle`]
//! at score time; the learning engine is the only writer.

use alpha_flow_core::{Candidate, Direction, Grade, ScoreResult, TrendBias, WeightHandle};

#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: WeightHandle,
}

impl ScoringEngine {
    #[must_use]
    pub fn new(weights: WeightHandle) -> Self {
        Self { weights }
    }

    /// Scores a candidate and fills its display/breakdown fields.
    ///
    /// Every display field is written only when unset, so scoring the
    /// same candidate twice is idempotent.
    pub fn score(&self, candidate: &mut Candidate, has_news: bool) -> ScoreResult {
        let weights = self.weights.snapshot();

        let flow_score = (candidate.flow.conviction_score / 5.0).min(1.0);
        let tech_score = technical_subscore(candidate);
        let regime_score = 1.0 - candidate.regime.volatility.min(1.0);
        let news_score = if has_news { 1.0 } else { 0.4 };

        let raw = flow_score * weights.flow
            + tech_score * weights.technical
            + regime_score * weights.regime
            + news_score * weights.news;
        // Flow-weight nudges leave the other weights untouched, so the
        // sum can exceed 1.0 at the cap; the score itself stays bounded.
        let score = round2(raw * 100.0).clamp(0.0, 100.0);
        let grade = Grade::for_score(score);
        let reasoning = format!(
            "flow={flow_score:.2} tech={tech_score:.2} regime={regime_score:.2} news={news_score:.2}"
        );

        let gex_sign = if candidate.regime.gex >= 0.0 { "pos" } else { "neg" };
        let gex_magnitude = candidate.regime.gex.abs();
        let vex_state = if candidate.regime.vex > 0.2 { "elevated" } else { "normal" };
        let rsi = candidate.technical.rsi;
        let price_vs_vwap = above_below(candidate.price.price, candidate.price.vwap);
        let price_vs_ema9 = above_below(candidate.price.price, candidate.technical.ema_fast);
        let price_vs_ema20 = above_below(candidate.price.price, candidate.technical.ema_mid);
        let intraday_trend = candidate.technical.bias;
        let daily_trend = candidate.regime.trend_bias;
        let flow_pattern = if candidate.flow.is_sweep {
            "sweep"
        } else if candidate.flow.is_block {
            "block"
        } else {
            "mixed"
        };

        candidate.total_score.get_or_insert(score);
        candidate.grade.get_or_insert(grade);
        candidate.flow_score.get_or_insert(round1(flow_score * 40.0));
        candidate.technical_score.get_or_insert(round1(tech_score * 30.0));
        candidate.regime_score.get_or_insert(round1(regime_score * 20.0));
        candidate.catalyst_score.get_or_insert(round1(news_score * 10.0));
        candidate
            .execution_quality_score
            .get_or_insert(round1(tech_score * 100.0));
        candidate.gex_sign.get_or_insert_with(|| gex_sign.to_string());
        candidate.gex_magnitude.get_or_insert(gex_magnitude);
        candidate.vex_state.get_or_insert_with(|| vex_state.to_string());
        candidate.rsi_intraday.get_or_insert(rsi);
        candidate.rsi_daily.get_or_insert(rsi);
        candidate
            .price_vs_vwap
            .get_or_insert_with(|| price_vs_vwap.to_string());
        candidate
            .price_vs_ema9
            .get_or_insert_with(|| price_vs_ema9.to_string());
        candidate
            .price_vs_ema20
            .get_or_insert_with(|| price_vs_ema20.to_string());
        candidate.intraday_trend.get_or_insert(intraday_trend);
        candidate.daily_trend.get_or_insert(daily_trend);
        candidate
            .flow_pattern
            .get_or_insert_with(|| flow_pattern.to_string());
        candidate
            .time_horizon
            .get_or_insert_with(|| "unknown".to_string());

        ScoreResult {
            score,
            grade,
            reasoning,
        }
    }
}

/// RSI closeness to 50, MACD trend direction, and directional agreement
/// blended 0.4/0.3/0.3, clamped to [0, 1].
fn technical_subscore(candidate: &Candidate) -> f64 {
    let tech = &candidate.technical;
    let rsi_score = 1.0 - (tech.rsi - 50.0).abs() / 50.0;
    let macd_trend = if tech.macd > tech.macd_signal { 1.0 } else { 0.3 };
    let bias_score = if tech.bias == TrendBias::Bullish
        && candidate.flow.direction == Direction::Call
    {
        1.0
    } else {
        0.8
    };
    (rsi_score * 0.4 + macd_trend * 0.3 + bias_score * 0.3).clamp(0.0, 1.0)
}

fn above_below(price: f64, reference: f64) -> &'static str {
    if price >= reference {
        "above"
    } else {
        "below"
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
