//! Bounded retry with exponential backoff for catalog calls

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use shared::{CatalogFailure, CatalogResult};

/// Retry settings for one catalog call
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Randomise each delay by ±30%
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based), or None to give up
    pub fn backoff_for(&self, failure: &CatalogFailure, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries || !failure.is_transient() {
            return None;
        }
        let base = self.initial_backoff.saturating_mul(1 << attempt.min(16)).min(self.max_backoff);
        Some(if self.jitter { with_jitter(base) } else { base })
    }
}

fn with_jitter(base: Duration) -> Duration {
    let factor = 1.0 + rand::thread_rng().gen_range(-0.3..0.3);
    Duration::from_secs_f64(base.as_secs_f64() * factor)
}

/// Run `call` until it succeeds, fails permanently, or retries run out
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut call: F) -> CatalogResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CatalogResult<T>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(failure) => match policy.backoff_for(&failure, attempt) {
                Some(delay) => {
                    tracing::debug!(
                        "Catalog call failed ({}), retry {}/{} in {:?}",
                        failure,
                        attempt + 1,
                        policy.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(failure),
            },
        }
    }
}
