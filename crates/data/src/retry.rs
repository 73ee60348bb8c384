//! Retry with exponential backoff for provider calls.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::warn;

/// Runs `op` up to `attempts` times, sleeping `base_delay * 2^i`
/// between failures. The final error is returned as-is.
///
/// # Errors
///
/// Returns the last error once every attempt has failed.
pub async fn with_retry<T, F, Fut>(mut op: F, attempts: u32, base_delay: Duration) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt + 1 < attempts => {
                let delay = base_delay * 2_u32.pow(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Provider call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
