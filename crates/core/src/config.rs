//! Application configuration tree.
//!
//! Every section has serde defaults so a partial config file (or none
//! at all) still yields a runnable configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSettings,
    pub market_data: MarketDataConfig,
    pub news: NewsConfig,
    pub detection: DetectionConfig,
    pub queues: QueueConfig,
    pub regime: RegimeConfig,
    pub storage: StorageConfig,
    pub alerts: AlertsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Seconds between refresh cycles.
    pub scheduler_interval_secs: u64,
    /// Tickers processed each cycle.
    pub tickers: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            scheduler_interval_secs: 300,
            tickers: vec![
                "AAPL".to_string(),
                "MSFT".to_string(),
                "TSLA".to_string(),
                "NVDA".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    pub api_key: String,
    pub cache_ttl_seconds: u64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            cache_ttl_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Records below this premium never become flow events.
    pub min_premium: f64,
    /// Records below this volume multiple never become flow events.
    pub min_volume_multiple: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_premium: 250_000.0,
            min_volume_multiple: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Intraday queue entries (and ledger rows) expire after this many minutes.
    pub intraday_expiry_minutes: i64,
    /// Swing queue entries (and ledger rows) expire after this many days.
    pub swing_expiry_days: i64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            intraday_expiry_minutes: 60,
            swing_expiry_days: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Maximum regime states kept in the in-memory history ring.
    pub history_cap: usize,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self { history_cap: 256 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file backing the signal ledger.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/alerts.db".to_string(),
        }
    }
}

/// How much detail an alert message carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStyle {
    Short,
    #[default]
    Medium,
    DeepDive,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    pub style: AlertStyle,
    pub telegram: TelegramConfig,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub enabled: bool,
    pub webhook_url: String,
}
