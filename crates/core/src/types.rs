//! Domain types for the alpha-flow signal pipeline.
//!
//! Everything downstream of the flow detector works in terms of these
//! types: flow events, price snapshots, regime state, technical context,
//! candidates, scores, and routed signals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Score needed for an immediate alert (and an A grade).
pub const IMMEDIATE_SCORE_MIN: f64 = 85.0;
/// Score needed for the intraday watch queue (and a B grade).
pub const INTRADAY_SCORE_MIN: f64 = 65.0;
/// Score needed for the swing watch queue (and a C grade).
pub const SWING_SCORE_MIN: f64 = 50.0;

/// Side of the options contract the flow traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Call,
    Put,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional bias derived from price action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendBias {
    Bullish,
    Bearish,
    Neutral,
}

impl TrendBias {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for TrendBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk environment label produced by the regime engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskEnvironment {
    HighRisk,
    Illiquid,
    Balanced,
}

impl RiskEnvironment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighRisk => "high_risk",
            Self::Illiquid => "illiquid",
            Self::Balanced => "balanced",
        }
    }
}

impl std::fmt::Display for RiskEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Setup archetype assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Setup {
    Breakout,
    Breakdown,
    Momentum,
    Reversal,
    PreEarnings,
    Gamma,
    Structural,
}

impl Setup {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakout => "breakout",
            Self::Breakdown => "breakdown",
            Self::Momentum => "momentum",
            Self::Reversal => "reversal",
            Self::PreEarnings => "pre-earnings",
            Self::Gamma => "gamma",
            Self::Structural => "structural",
        }
    }
}

impl std::fmt::Display for Setup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter grade attached to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Maps a 0-100 score to a grade using the same thresholds that
    /// drive routing. Keeping both derivations on the shared constants
    /// means grade and queue semantics cannot diverge.
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if score >= IMMEDIATE_SCORE_MIN {
            Self::A
        } else if score >= INTRADAY_SCORE_MIN {
            Self::B
        } else if score >= SWING_SCORE_MIN {
            Self::C
        } else {
            Self::D
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination queue for a scored signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    ImmediateAlert,
    IntradayWatch,
    SwingWatch,
    Reject,
}

impl Route {
    /// Maps a 0-100 score to its route. Shares thresholds with
    /// [`Grade::for_score`].
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if score >= IMMEDIATE_SCORE_MIN {
            Self::ImmediateAlert
        } else if score >= INTRADAY_SCORE_MIN {
            Self::IntradayWatch
        } else if score >= SWING_SCORE_MIN {
            Self::SwingWatch
        } else {
            Self::Reject
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ImmediateAlert => "immediate_alert",
            Self::IntradayWatch => "intraday_watch",
            Self::SwingWatch => "swing_watch",
            Self::Reject => "reject",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One qualifying options-contract trade. Immutable once detected.
#[derive(Debug, Clone)]
pub struct FlowEvent {
    pub ticker: String,
    pub direction: Direction,
    pub notional: f64,
    pub premium: f64,
    pub iv: f64,
    /// Time from detection until contract expiry (can be sub-day).
    pub expiry_horizon: Duration,
    /// Whole days to expiry, floored at zero when already past.
    pub dte: i64,
    pub conviction_score: f64,
    pub spot_price: f64,
    pub strike: f64,
    pub expiry: DateTime<Utc>,
    pub option_symbol: String,
    pub side: String,
    pub volume_multiple: f64,
    pub last_price: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub volume: Option<i64>,
    pub open_interest: Option<i64>,
    pub is_sweep: bool,
    pub is_block: bool,
    /// The source record, carried through untouched for downstream
    /// consumers (the classifier inspects its keys).
    pub raw: JsonValue,
}

/// Point-in-time price state for one ticker. Supersedes the previous
/// snapshot for that ticker each cycle.
#[derive(Debug, Clone)]
pub struct PriceSnapshot {
    pub ticker: String,
    pub price: f64,
    pub change_pct: f64,
    pub volume: f64,
    pub vwap: f64,
    pub sector_strength: f64,
    pub timestamp: DateTime<Utc>,
    /// Most-recent-N close window used by the regime and technical engines.
    pub ohlc: Vec<f64>,
}

/// Volatility/trend/liquidity characterization for one ticker.
#[derive(Debug, Clone)]
pub struct MarketRegimeState {
    pub trend_bias: TrendBias,
    /// Annualized stdev of simple returns.
    pub volatility: f64,
    /// Median absolute return, used as a liquidity proxy.
    pub liquidity: f64,
    pub risk_environment: RiskEnvironment,
    pub gex: f64,
    pub vex: f64,
    pub reasoning: String,
    pub as_of: DateTime<Utc>,
}

/// Momentum/trend indicators for one ticker.
#[derive(Debug, Clone)]
pub struct TechnicalContext {
    pub ticker: String,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub ema_fast: f64,
    pub ema_mid: f64,
    pub ema_slow: f64,
    pub vwap: f64,
    pub volume: f64,
    pub volume_trend: f64,
    pub bias: TrendBias,
}

/// The unit under evaluation: one flow event joined with the current
/// snapshot, regime, and technical context, plus derived fields filled
/// in progressively by the classifier and scoring engine.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub ticker: String,
    pub flow: FlowEvent,
    pub price: PriceSnapshot,
    pub regime: MarketRegimeState,
    pub technical: TechnicalContext,
    pub classification: Option<Setup>,

    // Primary contract display fields, flattened from the chosen flow
    // event by the candidate builder.
    pub primary_option_symbol: Option<String>,
    pub primary_expiry: Option<DateTime<Utc>>,
    pub primary_strike: Option<f64>,
    pub primary_side: Option<String>,
    pub primary_dte: Option<i64>,
    pub primary_last_price: Option<f64>,
    pub primary_bid: Option<f64>,
    pub primary_ask: Option<f64>,
    pub primary_volume: Option<i64>,
    pub primary_open_interest: Option<i64>,
    pub primary_notional: Option<f64>,

    // Score breakdown and display fields, filled by the scoring engine
    // only when unset so re-scoring is idempotent.
    pub total_score: Option<f64>,
    pub grade: Option<Grade>,
    pub flow_score: Option<f64>,
    pub technical_score: Option<f64>,
    pub regime_score: Option<f64>,
    pub catalyst_score: Option<f64>,
    pub execution_quality_score: Option<f64>,
    pub gex_sign: Option<String>,
    pub gex_magnitude: Option<f64>,
    pub vex_state: Option<String>,
    pub rsi_intraday: Option<f64>,
    pub rsi_daily: Option<f64>,
    pub price_vs_vwap: Option<String>,
    pub price_vs_ema9: Option<String>,
    pub price_vs_ema20: Option<String>,
    pub intraday_trend: Option<TrendBias>,
    pub daily_trend: Option<TrendBias>,
    pub flow_pattern: Option<String>,
    pub time_horizon: Option<String>,
}

impl Candidate {
    /// Joins the sub-entities into a fresh candidate with no derived
    /// fields filled.
    #[must_use]
    pub fn new(
        flow: FlowEvent,
        price: PriceSnapshot,
        regime: MarketRegimeState,
        technical: TechnicalContext,
    ) -> Self {
        Self {
            ticker: flow.ticker.clone(),
            flow,
            price,
            regime,
            technical,
            classification: None,
            primary_option_symbol: None,
            primary_expiry: None,
            primary_strike: None,
            primary_side: None,
            primary_dte: None,
            primary_last_price: None,
            primary_bid: None,
            primary_ask: None,
            primary_volume: None,
            primary_open_interest: None,
            primary_notional: None,
            total_score: None,
            grade: None,
            flow_score: None,
            technical_score: None,
            regime_score: None,
            catalyst_score: None,
            execution_quality_score: None,
            gex_sign: None,
            gex_magnitude: None,
            vex_state: None,
            rsi_intraday: None,
            rsi_daily: None,
            price_vs_vwap: None,
            price_vs_ema9: None,
            price_vs_ema20: None,
            intraday_trend: None,
            daily_trend: None,
            flow_pattern: None,
            time_horizon: None,
        }
    }
}

/// Final confidence score for a candidate. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Always within [0, 100].
    pub score: f64,
    pub grade: Grade,
    pub reasoning: String,
}

/// A scored candidate bound to its route. The route changes at most
/// once after creation, when the routing engine promotes an intraday
/// entry to immediate.
#[derive(Debug, Clone)]
pub struct RoutedSignal {
    pub candidate: Candidate,
    pub score: ScoreResult,
    pub route: Route,
    pub created_at: DateTime<Utc>,
}

/// Historical outcome of a signal, fed back into the learning engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub ticker: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    /// Maximum favorable excursion over the holding window.
    pub mfe: f64,
    pub win: bool,
    pub drawdown: f64,
    pub regime: String,
    pub score: f64,
}

/// A news headline attached to a ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub ticker: String,
    pub headline: String,
    pub timestamp: DateTime<Utc>,
}

/// Exposure metrics supplied by the upstream data collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
}
