//! SQLite persistence for routed signals awaiting follow-up checks.

use std::path::Path;
use std::str::FromStr;

use alpha_flow_core::{Route, RoutedSignal};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value as JsonValue};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::debug;

/// A persisted alert row, as read back for movement checks.
#[derive(Debug, Clone)]
pub struct LedgerRecord {
    pub id: i64,
    pub ticker: String,
    pub route: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub score: f64,
    pub grade: String,
    pub direction: String,
    pub reasoning: String,
    pub payload: JsonValue,
}

/// SQLite-backed ledger. The pool is capped at one connection so
/// writers from the scheduler and the check loop serialize instead of
/// hitting `SQLITE_BUSY`.
pub struct SignalLedger {
    pool: SqlitePool,
    intraday_expiry: Duration,
    swing_expiry: Duration,
}

impl SignalLedger {
    /// Opens (creating if needed) the ledger database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created,
    /// the database cannot be opened, or the schema statement fails.
    pub async fn open(
        db_path: &str,
        intraday_expiry_minutes: i64,
        swing_expiry_days: i64,
    ) -> Result<Self> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating ledger directory {}", parent.display()))?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        Self::connect(options, intraday_expiry_minutes, swing_expiry_days).await
    }

    /// Opens an in-memory ledger. The single pooled connection keeps
    /// the database alive for the ledger's lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema statement fails.
    pub async fn open_in_memory(
        intraday_expiry_minutes: i64,
        swing_expiry_days: i64,
    ) -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options, intraday_expiry_minutes, swing_expiry_days).await
    }

    async fn connect(
        options: SqliteConnectOptions,
        intraday_expiry_minutes: i64,
        swing_expiry_days: i64,
    ) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let ledger = Self {
            pool,
            intraday_expiry: Duration::minutes(intraday_expiry_minutes),
            swing_expiry: Duration::days(swing_expiry_days),
        };
        ledger.ensure_schema().await?;
        Ok(ledger)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alerts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL,
                route TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT,
                score REAL,
                grade TEXT,
                direction TEXT,
                reasoning TEXT,
                payload TEXT,
                last_checked_at TEXT,
                movement_observed REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn expiry_for_route(&self, route: Route) -> Option<DateTime<Utc>> {
        let now = Utc::now();
        match route {
            Route::ImmediateAlert => Some(now + Duration::hours(4)),
            Route::IntradayWatch => Some(now + self.intraday_expiry),
            Route::SwingWatch => Some(now + self.swing_expiry),
            Route::Reject => None,
        }
    }

    /// Persists a routed signal as a pending alert. Rejected signals
    /// are never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record_signal(
        &self,
        signal: &RoutedSignal,
        metadata: Option<JsonValue>,
    ) -> Result<()> {
        if signal.route == Route::Reject {
            return Ok(());
        }

        let expires_at = self.expiry_for_route(signal.route);
        let candidate = &signal.candidate;
        let payload = json!({
            "candidate": {
                "ticker": candidate.ticker,
                "classification": candidate.classification,
                "flow": {
                    "direction": candidate.flow.direction.to_string(),
                    "notional": candidate.flow.notional,
                    "premium": candidate.flow.premium,
                    "expiry": candidate.flow.expiry.to_rfc3339(),
                    "expiry_horizon_days": candidate.flow.expiry_horizon.num_days(),
                    "spot_price": candidate.flow.spot_price,
                    "strike": candidate.flow.strike,
                },
                "regime": candidate.regime.risk_environment,
                "technical_bias": candidate.technical.bias,
            },
            "score": signal.score,
            "route": signal.route.as_str(),
            "metadata": metadata.unwrap_or_else(|| json!({})),
        });

        sqlx::query(
            r#"
            INSERT INTO alerts (
                ticker, route, status, created_at, expires_at, score, grade, direction, reasoning, payload
            ) VALUES (?, ?, 'pending', ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&candidate.ticker)
        .bind(signal.route.as_str())
        .bind(signal.created_at)
        .bind(expires_at)
        .bind(signal.score.score)
        .bind(signal.score.grade.to_string())
        .bind(candidate.flow.direction.to_string())
        .bind(&signal.score.reasoning)
        .bind(payload.to_string())
        .execute(&self.pool)
        .await?;

        debug!(
            ticker = %candidate.ticker,
            route = signal.route.as_str(),
            "Recorded signal in ledger"
        );
        Ok(())
    }

    /// Flips pending alerts past their expiry to `expired`. Returns
    /// the number of rows swept.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn expire_stale(&self) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE alerts SET status = 'expired' \
             WHERE status = 'pending' AND expires_at IS NOT NULL AND expires_at < ?",
        )
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Sweeps expiries, then returns up to `limit` pending alerts in
    /// creation order for movement checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep or the select fails.
    pub async fn get_pending_for_checks(&self, limit: i64) -> Result<Vec<LedgerRecord>> {
        self.expire_stale().await?;
        let rows = sqlx::query(
            r#"
            SELECT id, ticker, route, created_at, expires_at, score, grade, direction, reasoning, payload
            FROM alerts
            WHERE status = 'pending' AND (expires_at IS NULL OR expires_at >= ?)
            ORDER BY created_at ASC
            LIMIT ?
            "#,
        )
        .bind(Utc::now())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let payload: Option<String> = row.get("payload");
            let payload = payload
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or_else(|| json!({}));
            records.push(LedgerRecord {
                id: row.get("id"),
                ticker: row.get("ticker"),
                route: row.get("route"),
                created_at: row.get("created_at"),
                expires_at: row.get("expires_at"),
                score: row.get("score"),
                grade: row.get("grade"),
                direction: row.get("direction"),
                reasoning: row.get("reasoning"),
                payload,
            });
        }
        Ok(records)
    }

    /// Marks an alert checked with the observed move. Checked alerts
    /// never return to pending.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn mark_checked(&self, alert_id: i64, movement_observed: f64) -> Result<()> {
        sqlx::query(
            "UPDATE alerts SET status = 'checked', last_checked_at = ?, movement_observed = ? \
             WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(movement_observed)
        .bind(alert_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
