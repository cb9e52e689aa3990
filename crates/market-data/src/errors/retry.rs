//! Bounded retry for transient provider failures.

use std::future::Future;
use std::time::Duration;

use log::warn;
use rand::Rng;

use super::MarketDataError;

/// Maximum number of attempts for a single request.
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry, doubled on each subsequent one.
const BASE_DELAY: Duration = Duration::from_millis(500);

/// Runs `operation` up to [`MAX_ATTEMPTS`] times.
///
/// Only errors classified transient by [`MarketDataError::is_transient`]
/// are retried; terminal errors are returned immediately. Between attempts
/// the task sleeps for an exponentially growing delay with random jitter
/// so parallel fetches do not retry in lockstep.
pub async fn retry_transient<T, F, Fut>(label: &str, operation: F) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    retry_with_delay(label, BASE_DELAY, operation).await
}

async fn retry_with_delay<T, F, Fut>(
    label: &str,
    base_delay: Duration,
    mut operation: F,
) -> Result<T, MarketDataError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < MAX_ATTEMPTS => {
                let backoff = base_delay * 2u32.pow(attempt - 1);
                let jitter = Duration::from_millis(
                    rand::thread_rng().gen_range(0..=backoff.as_millis() as u64 / 2),
                );
                let delay = backoff + jitter;
                warn!(
                    "Transient error on {} (attempt {} of {}), retrying in {:?}: {}",
                    label, attempt, MAX_ATTEMPTS, delay, err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
