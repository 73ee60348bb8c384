//! Best-effort delivery of routed signals to Telegram and Discord.

use std::time::Duration;

use alpha_flow_core::{AlertsConfig, RoutedSignal};
use anyhow::Result;
use serde_json::json;
use tracing::{info, warn};

use crate::templates::format_alert;

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Fans a formatted signal out to every enabled transport. Delivery is
/// best effort: transport failures are logged and never bubble up into
/// the refresh cycle.
pub struct AlertDispatcher {
    config: AlertsConfig,
    client: reqwest::Client,
}

impl AlertDispatcher {
    /// Builds a dispatcher with a shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: AlertsConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self { config, client })
    }

    /// Sends the signal to every enabled transport concurrently.
    pub async fn dispatch(&self, signal: &RoutedSignal) {
        let message = self.format_signal(signal);
        let telegram = async {
            if self.config.telegram.enabled {
                self.send_telegram(signal, &message).await;
            }
        };
        let discord = async {
            if self.config.discord.enabled && !self.config.discord.webhook_url.is_empty() {
                self.send_discord(signal, &message).await;
            }
        };
        tokio::join!(telegram, discord);
    }

    async fn send_telegram(&self, signal: &RoutedSignal, message: &str) {
        let telegram = &self.config.telegram;
        if telegram.bot_token.is_empty() || telegram.chat_id.is_empty() {
            warn!("Telegram transport missing bot_token or chat_id, skipping");
            return;
        }
        let url = format!("https://api.telegram.org/bot{}/sendMessage", telegram.bot_token);
        let payload = json!({ "chat_id": telegram.chat_id, "text": message });
        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!(
                    ticker = %signal.candidate.ticker,
                    route = signal.route.as_str(),
                    "Sent telegram alert"
                );
            }
            Ok(response) => {
                warn!(status = %response.status(), "Telegram alert rejected");
            }
            Err(err) => {
                warn!(error = %err, "Failed to send telegram alert");
            }
        }
    }

    async fn send_discord(&self, signal: &RoutedSignal, message: &str) {
        let payload = json!({ "content": message });
        match self
            .client
            .post(&self.config.discord.webhook_url)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                info!(
                    ticker = %signal.candidate.ticker,
                    route = signal.route.as_str(),
                    "Sent discord alert"
                );
            }
            Ok(response) => {
                warn!(status = %response.status(), "Discord alert rejected");
            }
            Err(err) => {
                warn!(error = %err, "Failed to send discord alert");
            }
        }
    }

    /// Fills candidate display fields from the score result when the
    /// scoring engine left them unset, then renders the configured
    /// template.
    #[must_use]
    pub fn format_signal(&self, signal: &RoutedSignal) -> String {
        let mut candidate = signal.candidate.clone();
        candidate.grade.get_or_insert(signal.score.grade);
        candidate.total_score.get_or_insert(signal.score.score);
        candidate
            .time_horizon
            .get_or_insert_with(|| signal.route.as_str().to_string());
        format_alert(&candidate, signal.route.as_str(), self.config.style)
    }
}
