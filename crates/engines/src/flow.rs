//! Flow detection: turns raw contract-trade records into qualifying
//! [`FlowEvent`]s with a conviction score.
//!
//! Records arrive as loosely-typed JSON from the upstream provider.
//! Optional fields with non-numeric junk degrade to `None`; records
//! missing a required field are skipped, never an error.

use alpha_flow_core::{Direction, FlowEvent};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Filters and scores raw options-flow records.
#[derive(Debug, Clone)]
pub struct FlowDetector {
    min_premium: f64,
    min_volume_multiple: f64,
}

impl Default for FlowDetector {
    fn default() -> Self {
        Self::new(250_000.0, 2.0)
    }
}

impl FlowDetector {
    #[must_use]
    pub fn new(min_premium: f64, min_volume_multiple: f64) -> Self {
        Self {
            min_premium,
            min_volume_multiple,
        }
    }

    /// Detects qualifying flow events, sorted descending by conviction.
    ///
    /// Callers taking a top-K slice rely on the conviction ordering;
    /// the candidate builder independently picks by notional.
    #[must_use]
    pub fn detect(&self, raw_flows: &[JsonValue]) -> Vec<FlowEvent> {
        let now = Utc::now();
        let mut events: Vec<FlowEvent> = raw_flows
            .iter()
            .filter_map(|raw| self.detect_one(raw, now))
            .collect();
        events.sort_by(|a, b| b.conviction_score.total_cmp(&a.conviction_score));
        events
    }

    fn detect_one(&self, raw: &JsonValue, now: DateTime<Utc>) -> Option<FlowEvent> {
        if num_field(raw, "premium").unwrap_or(0.0) < self.min_premium {
            return None;
        }
        if num_field(raw, "volume_multiple").unwrap_or(0.0) < self.min_volume_multiple {
            return None;
        }

        let ticker = str_field(raw, "ticker")?.to_string();
        let (Some(premium), Some(notional), Some(iv), Some(strike), Some(spot), Some(volume_multiple)) = (
            num_field(raw, "premium"),
            num_field(raw, "notional"),
            num_field(raw, "iv"),
            num_field(raw, "strike"),
            num_field(raw, "spot"),
            num_field(raw, "volume_multiple"),
        ) else {
            debug!(%ticker, "Skipping flow record with missing required fields");
            return None;
        };
        let Some(expiry) = expiry_field(raw) else {
            debug!(%ticker, "Skipping flow record with unparseable expiry");
            return None;
        };

        let direction = if str_field(raw, "direction") == Some("call") {
            Direction::Call
        } else {
            Direction::Put
        };
        let expiry_horizon = expiry - now;
        let dte = expiry_horizon.num_days().max(0);
        let side = str_field(raw, "side")
            .map(str::to_uppercase)
            .unwrap_or_else(|| direction.as_str().to_uppercase());
        let option_symbol = str_field(raw, "option_symbol")
            .or_else(|| str_field(raw, "optionSymbol"))
            .unwrap_or_default()
            .to_string();

        Some(FlowEvent {
            ticker,
            direction,
            notional,
            premium,
            iv,
            expiry_horizon,
            dte,
            conviction_score: conviction(raw),
            spot_price: spot,
            strike,
            expiry,
            option_symbol,
            side,
            volume_multiple,
            last_price: num_field(raw, "last_price"),
            bid: num_field(raw, "bid"),
            ask: num_field(raw, "ask"),
            volume: int_field(raw, "volume"),
            open_interest: int_field(raw, "open_interest"),
            is_sweep: bool_field(raw, "is_sweep"),
            is_block: bool_field(raw, "is_block"),
            raw: raw.clone(),
        })
    }
}

/// Heuristic significance weight for one record. Bounded per term but
/// unbounded as a whole (a sweep+block monster can exceed 5.5).
fn conviction(raw: &JsonValue) -> f64 {
    let mut weight = (num_field(raw, "premium").unwrap_or(0.0) / 1_000_000.0).min(3.0);
    if bool_field(raw, "is_sweep") {
        weight += 1.5;
    }
    if bool_field(raw, "is_block") {
        weight += 1.0;
    }
    weight + num_field(raw, "volume_multiple").unwrap_or(1.0).min(3.0)
}

fn num_field(raw: &JsonValue, key: &str) -> Option<f64> {
    match raw.get(key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn int_field(raw: &JsonValue, key: &str) -> Option<i64> {
    match raw.get(key)? {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_field(raw: &JsonValue, key: &str) -> bool {
    raw.get(key).and_then(JsonValue::as_bool).unwrap_or(false)
}

fn str_field<'a>(raw: &'a JsonValue, key: &str) -> Option<&'a str> {
    raw.get(key).and_then(JsonValue::as_str)
}

fn expiry_field(raw: &JsonValue) -> Option<DateTime<Utc>> {
    let text = str_field(raw, "expiry")?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    // Providers that drop the offset send naive ISO timestamps.
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
