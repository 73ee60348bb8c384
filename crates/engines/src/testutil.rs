//! Shared fixtures for engine unit tests.

use alpha_flow_core::{
    Candidate, Direction, FlowEvent, MarketRegimeState, PriceSnapshot, RiskEnvironment,
    TechnicalContext, TrendBias,
};
use chrono::{Duration, Utc};
use serde_json::json;

pub fn make_flow(ticker: &str, conviction: f64, notional: f64) -> FlowEvent {
    let expiry = Utc::now() + Duration::days(30);
    FlowEvent {
        ticker: ticker.to_string(),
        direction: Direction::Call,
        notional,
        premium: 500_000.0,
        iv: 0.4,
        expiry_horizon: Duration::days(30),
        dte: 30,
        conviction_score: conviction,
        spot_price: 150.0,
        strike: 155.0,
        expiry,
        option_symbol: format!("{ticker}250215C00155000"),
        side: "CALL".to_string(),
        volume_multiple: 4.0,
        last_price: Some(4.2),
        bid: Some(4.1),
        ask: Some(4.3),
        volume: Some(1200),
        open_interest: Some(5000),
        is_sweep: true,
        is_block: false,
        raw: json!({"ticker": ticker, "premium": 500_000.0}),
    }
}

pub fn make_snapshot(ticker: &str) -> PriceSnapshot {
    PriceSnapshot {
        ticker: ticker.to_string(),
        price: 150.0,
        change_pct: 2.5,
        volume: 1_200_000.0,
        vwap: 148.0,
        sector_strength: 0.5,
        timestamp: Utc::now(),
        ohlc: (0..20).map(|i| 140.0 + f64::from(i) * 0.5).collect(),
    }
}

pub fn make_regime() -> MarketRegimeState {
    MarketRegimeState {
        trend_bias: TrendBias::Bullish,
        volatility: 0.2,
        liquidity: 0.01,
        risk_environment: RiskEnvironment::Balanced,
        gex: 0.1,
        vex: 0.2,
        reasoning: "fixture".to_string(),
        as_of: Utc::now(),
    }
}

pub fn make_technical(ticker: &str) -> TechnicalContext {
    TechnicalContext {
        ticker: ticker.to_string(),
        rsi: 60.0,
        macd: 1.0,
        macd_signal: 0.5,
        ema_fast: 149.0,
        ema_mid: 148.0,
        ema_slow: 146.0,
        vwap: 148.0,
        volume: 1_200_000.0,
        volume_trend: 1.2,
        bias: TrendBias::Bullish,
    }
}

pub fn make_candidate(ticker: &str, conviction: f64) -> Candidate {
    Candidate::new(
        make_flow(ticker, conviction, 1_000_000.0),
        make_snapshot(ticker),
        make_regime(),
        make_technical(ticker),
    )
}
