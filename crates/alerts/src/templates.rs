//! Message templates for the three alert styles.

use alpha_flow_core::{AlertStyle, Candidate, Direction};

fn fmt_price(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn fmt_int(value: Option<i64>) -> String {
    value.map_or_else(|| "n/a".to_string(), group_thousands)
}

fn fmt_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => group_thousands(v.round() as i64),
        _ => "n/a".to_string(),
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

fn safe(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

fn side(candidate: &Candidate) -> String {
    let side = candidate
        .primary_side
        .as_deref()
        .unwrap_or(&candidate.flow.side);
    if side.is_empty() {
        "n/a".to_string()
    } else {
        side.to_uppercase()
    }
}

fn grade_label(candidate: &Candidate) -> String {
    candidate
        .grade
        .map_or_else(|| "n/a".to_string(), |g| g.to_string())
}

fn confidence(candidate: &Candidate) -> i64 {
    candidate.total_score.unwrap_or(0.0) as i64
}

fn contract_line(candidate: &Candidate, side: &str) -> String {
    let strike = candidate.primary_strike.unwrap_or(candidate.flow.strike);
    let expiry = candidate
        .primary_expiry
        .unwrap_or(candidate.flow.expiry)
        .date_naive();
    let dte = candidate.primary_dte.unwrap_or(candidate.flow.dte);
    let initial = side.chars().next().unwrap_or('?');
    format!("{strike}{initial} {expiry} ({dte}D)")
}

/// Very compact alert for power users. One screen, no fluff.
#[must_use]
pub fn format_short_alert(candidate: &Candidate, alert_type: &str) -> String {
    let c = candidate;
    let side = side(c);
    format!(
        "🦈 {ticker} {side} ALERT ({grade})\n\
         Contract: {contract}\n\
         Opt: {symbol}\n\
         Last: {last}  Bid/Ask: {bid} x {ask}\n\
         Vol/OI: {volume} / {oi}\n\
         Flow Notional: ${notional}\n\
         Conf: {conf}%  Timeframe: {horizon}",
        ticker = c.ticker,
        grade = grade_label(c),
        contract = contract_line(c, &side),
        symbol = c
            .primary_option_symbol
            .as_deref()
            .unwrap_or(&c.flow.option_symbol),
        last = fmt_price(c.primary_last_price.or(c.flow.last_price)),
        bid = fmt_price(c.primary_bid.or(c.flow.bid)),
        ask = fmt_price(c.primary_ask.or(c.flow.ask)),
        volume = fmt_int(c.primary_volume.or(c.flow.volume)),
        oi = fmt_int(c.primary_open_interest.or(c.flow.open_interest)),
        notional = fmt_number(c.primary_notional.or(Some(c.flow.notional))),
        conf = confidence(c),
        horizon = safe(c.time_horizon.as_deref(), alert_type),
    )
}

/// Default style: readable explanation, still concise.
#[must_use]
pub fn format_medium_alert(candidate: &Candidate, alert_type: &str) -> String {
    let c = candidate;
    let side = side(c);
    let bias = match c.flow.direction {
        Direction::Call => "Call",
        Direction::Put => "Put",
    };

    let mut lines = vec![
        format!("🦈 AI Trade Signal — {}", grade_label(c)),
        String::new(),
        format!("Underlying: {}", c.ticker),
        format!("Direction: {side} ({bias} Bias)"),
        format!(
            "Confidence: {}% | Timeframe: {}",
            confidence(c),
            safe(c.time_horizon.as_deref(), alert_type)
        ),
        String::new(),
        "Options Contract:".to_string(),
        format!("• Contract: {}", contract_line(c, &side)),
        format!(
            "• Option Symbol: {}",
            c.primary_option_symbol
                .as_deref()
                .unwrap_or(&c.flow.option_symbol)
        ),
        format!(
            "• Last: {}   Bid/Ask: {} x {}",
            fmt_price(c.primary_last_price.or(c.flow.last_price)),
            fmt_price(c.primary_bid.or(c.flow.bid)),
            fmt_price(c.primary_ask.or(c.flow.ask))
        ),
        format!(
            "• Volume: {}   OI: {}",
            fmt_int(c.primary_volume.or(c.flow.volume)),
            fmt_int(c.primary_open_interest.or(c.flow.open_interest))
        ),
        format!(
            "• Flow Notional: ${}",
            fmt_number(c.primary_notional.or(Some(c.flow.notional)))
        ),
        String::new(),
        "Why This Matters:".to_string(),
        format!(
            "• Flow: {:.1} score (size/structure quality)",
            c.flow_score.unwrap_or(0.0)
        ),
        format!(
            "• Technicals: {:.1} score (trend/levels/momentum)",
            c.technical_score.unwrap_or(0.0)
        ),
        format!(
            "• Regime/Catalyst: {:.1} combined",
            c.regime_score.unwrap_or(0.0) + c.catalyst_score.unwrap_or(0.0)
        ),
        String::new(),
        "Execution Notes:".to_string(),
    ];

    if c.execution_quality_score.unwrap_or(0.0) < 40.0 {
        lines.push("• Caution: execution risk (spreads/liquidity), size carefully.".to_string());
    } else {
        lines.push("• Execution-friendly: liquidity and spreads acceptable.".to_string());
    }

    lines.join("\n")
}

/// Long-form alert for users who want the full context behind a
/// signal.
#[must_use]
pub fn format_deep_dive_alert(candidate: &Candidate, alert_type: &str) -> String {
    let c = candidate;
    let side = side(c);
    let bias = match c.flow.direction {
        Direction::Call => "Call",
        Direction::Put => "Put",
    };
    let intraday_trend = c
        .intraday_trend
        .map_or_else(|| "n/a".to_string(), |t| t.to_string());
    let daily_trend = c
        .daily_trend
        .map_or_else(|| "n/a".to_string(), |t| t.to_string());

    let lines = vec![
        "🧠 AI Deep-Dive Trade Signal".to_string(),
        format!("Ticker: {}", c.ticker),
        format!("Direction: {side} ({bias} setup)"),
        format!(
            "Grade: {} | Confidence: {}% | Timeframe: {}",
            grade_label(c),
            confidence(c),
            safe(c.time_horizon.as_deref(), alert_type)
        ),
        String::new(),
        "Options Contract Details:".to_string(),
        format!("• Contract: {}", contract_line(c, &side)),
        format!(
            "• Option Symbol: {}",
            c.primary_option_symbol
                .as_deref()
                .unwrap_or(&c.flow.option_symbol)
        ),
        format!(
            "• Last: {}   Bid/Ask: {} x {}",
            fmt_price(c.primary_last_price.or(c.flow.last_price)),
            fmt_price(c.primary_bid.or(c.flow.bid)),
            fmt_price(c.primary_ask.or(c.flow.ask))
        ),
        format!(
            "• Volume: {}   Open Interest: {}",
            fmt_int(c.primary_volume.or(c.flow.volume)),
            fmt_int(c.primary_open_interest.or(c.flow.open_interest))
        ),
        format!(
            "• Flow Notional Driving Setup: ${}",
            fmt_number(c.primary_notional.or(Some(c.flow.notional)))
        ),
        String::new(),
        "Flow & Smart Money Behavior:".to_string(),
        format!(
            "• Flow Strength Score: {:.1}/40",
            c.flow_score.unwrap_or(0.0)
        ),
        format!(
            "• Pattern: {}",
            safe(c.flow_pattern.as_deref(), "structure n/a")
        ),
        String::new(),
        "Price Action & Technical Context:".to_string(),
        format!("• Intraday Trend: {intraday_trend} | Daily Trend: {daily_trend}"),
        format!(
            "• Price vs VWAP: {} | vs EMA9/20: {}/{}",
            safe(c.price_vs_vwap.as_deref(), "n/a"),
            safe(c.price_vs_ema9.as_deref(), "n/a"),
            safe(c.price_vs_ema20.as_deref(), "n/a")
        ),
        format!(
            "• RSI: intraday {:.1} | daily {:.1}",
            c.rsi_intraday.unwrap_or(0.0),
            c.rsi_daily.unwrap_or(0.0)
        ),
        format!(
            "• Technical Score: {:.1}/30",
            c.technical_score.unwrap_or(0.0)
        ),
        String::new(),
        "Market Regime & Structure:".to_string(),
        format!(
            "• GEX: {} ({:.2} gamma) | VEX: {}",
            safe(c.gex_sign.as_deref(), "n/a"),
            c.gex_magnitude.unwrap_or(0.0),
            safe(c.vex_state.as_deref(), "n/a")
        ),
        format!("• Regime Score: {:.1}/20", c.regime_score.unwrap_or(0.0)),
        String::new(),
        "Catalyst & Context:".to_string(),
        format!(
            "• Catalyst Score: {:.1}/10",
            c.catalyst_score.unwrap_or(0.0)
        ),
        String::new(),
        "Execution & Risk:".to_string(),
        format!(
            "• Execution Quality Score: {:.1}",
            c.execution_quality_score.unwrap_or(0.0)
        ),
    ];

    lines.join("\n")
}

/// Renders a candidate in the configured style.
#[must_use]
pub fn format_alert(candidate: &Candidate, alert_type: &str, style: AlertStyle) -> String {
    match style {
        AlertStyle::Short => format_short_alert(candidate, alert_type),
        AlertStyle::Medium => format_medium_alert(candidate, alert_type),
        AlertStyle::DeepDive => format_deep_dive_alert(candidate, alert_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alpha_flow_core::{
        Candidate, Direction, FlowEvent, Grade, MarketRegimeState, PriceSnapshot, RiskEnvironment,
        TechnicalContext, TrendBias,
    };
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn build_candidate() -> Candidate {
        let expiry = Utc.with_ymd_and_hms(2025, 2, 14, 0, 0, 0).unwrap();
        let flow = FlowEvent {
            ticker: "NVDA".to_string(),
            direction: Direction::Call,
            notional: 3_200_000.0,
            premium: 1_000_000.0,
            iv: 0.55,
            expiry_horizon: Duration::days(23),
            dte: 23,
            conviction_score: 5.0,
            spot_price: 700.0,
            strike: 700.0,
            expiry,
            option_symbol: "NVDA250214C00700000".to_string(),
            side: "CALL".to_string(),
            volume_multiple: 4.0,
            last_price: Some(9.35),
            bid: Some(9.30),
            ask: Some(9.45),
            volume: Some(12_430),
            open_interest: Some(18_900),
            is_sweep: true,
            is_block: false,
            raw: json!({}),
        };
        let price = PriceSnapshot {
            ticker: "NVDA".to_string(),
            price: 700.0,
            change_pct: 0.02,
            volume: 2_000_000.0,
            vwap: 695.0,
            sector_strength: 0.6,
            timestamp: Utc::now(),
            ohlc: vec![690.0, 695.0, 700.0],
        };
        let regime = MarketRegimeState {
            trend_bias: TrendBias::Bullish,
            volatility: 0.18,
            liquidity: 0.9,
            risk_environment: RiskEnvironment::Balanced,
            gex: 0.2,
            vex: 0.1,
            reasoning: "test".to_string(),
            as_of: Utc::now(),
        };
        let technical = TechnicalContext {
            ticker: "NVDA".to_string(),
            rsi: 58.0,
            macd: 1.1,
            macd_signal: 1.1,
            ema_fast: 698.0,
            ema_mid: 694.0,
            ema_slow: 688.0,
            vwap: 695.0,
            volume: 2_000_000.0,
            volume_trend: 1.2,
            bias: TrendBias::Bullish,
        };
        let mut candidate = Candidate::new(flow, price, regime, technical);
        candidate.primary_option_symbol = Some("NVDA250214C00700000".to_string());
        candidate.primary_strike = Some(700.0);
        candidate.primary_expiry = Some(expiry);
        candidate.primary_side = Some("CALL".to_string());
        candidate.primary_dte = Some(23);
        candidate.primary_last_price = Some(9.35);
        candidate.primary_bid = Some(9.30);
        candidate.primary_ask = Some(9.45);
        candidate.primary_volume = Some(12_430);
        candidate.primary_open_interest = Some(18_900);
        candidate.primary_notional = Some(3_200_000.0);
        candidate.grade = Some(Grade::A);
        candidate.total_score = Some(88.5);
        candidate.flow_score = Some(36.0);
        candidate.technical_score = Some(24.0);
        candidate.regime_score = Some(16.0);
        candidate.catalyst_score = Some(10.0);
        candidate.execution_quality_score = Some(72.0);
        candidate
    }

    #[test]
    fn short_alert_carries_contract_details() {
        let message = format_short_alert(&build_candidate(), "immediate_alert");
        assert!(message.contains("NVDA250214C00700000"));
        assert!(message.contains("NVDA CALL ALERT (A)"));
        assert!(message.contains("700C 2025-02-14 (23D)"));
        assert!(message.contains("Vol/OI: 12,430 / 18,900"));
        assert!(message.contains("Flow Notional: $3,200,000"));
        assert!(message.contains("Conf: 88%"));
        assert!(message.contains("Timeframe: immediate_alert"));
    }

    #[test]
    fn medium_alert_explains_the_breakdown() {
        let message = format_medium_alert(&build_candidate(), "intraday_watch");
        assert!(message.contains("AI Trade Signal — A"));
        assert!(message.contains("Direction: CALL (Call Bias)"));
        assert!(message.contains("• Flow: 36.0 score"));
        assert!(message.contains("• Regime/Catalyst: 26.0 combined"));
        assert!(message.contains("Execution-friendly"));
    }

    #[test]
    fn medium_alert_flags_poor_execution() {
        let mut candidate = build_candidate();
        candidate.execution_quality_score = Some(25.0);
        let message = format_medium_alert(&candidate, "intraday_watch");
        assert!(message.contains("Caution: execution risk"));
    }

    #[test]
    fn deep_dive_includes_regime_structure() {
        let mut candidate = build_candidate();
        candidate.gex_sign = Some("positive".to_string());
        candidate.gex_magnitude = Some(0.2);
        candidate.vex_state = Some("calm".to_string());
        candidate.flow_pattern = Some("sweep".to_string());
        let message = format_deep_dive_alert(&candidate, "swing_watch");
        assert!(message.contains("Deep-Dive"));
        assert!(message.contains("• GEX: positive (0.20 gamma) | VEX: calm"));
        assert!(message.contains("• Pattern: sweep"));
        assert!(message.contains("• Flow Strength Score: 36.0/40"));
    }

    #[test]
    fn missing_quote_fields_fall_back_to_na() {
        let mut candidate = build_candidate();
        candidate.primary_last_price = None;
        candidate.flow.last_price = None;
        candidate.primary_volume = None;
        candidate.flow.volume = None;
        let message = format_short_alert(&candidate, "immediate_alert");
        assert!(message.contains("Last: n/a"));
        assert!(message.contains("Vol/OI: n/a / 18,900"));
    }

    #[test]
    fn style_dispatch_selects_the_template() {
        let candidate = build_candidate();
        assert!(format_alert(&candidate, "x", AlertStyle::Short).starts_with("🦈 NVDA"));
        assert!(format_alert(&candidate, "x", AlertStyle::Medium).starts_with("🦈 AI Trade"));
        assert!(format_alert(&candidate, "x", AlertStyle::DeepDive).starts_with("🧠"));
    }
}
