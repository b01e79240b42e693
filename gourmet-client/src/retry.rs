//! Retry with backoff for idempotent reads

use crate::{ClientError, ClientResult};
use std::future::Future;
use std::time::Duration;

/// Backoff policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub attempts: u32,
    /// Delay after the first failure
    pub base_delay: Duration,
    /// Multiplier applied to the delay after each further failure
    pub factor: u32,
}

impl RetryPolicy {
    /// `base * 2^i` between attempts
    pub fn exponential(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
            factor: 2,
        }
    }

    /// Same delay between every attempt
    pub fn fixed(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay: delay,
            factor: 1,
        }
    }

    /// Delay to wait after failed attempt number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(self.factor.saturating_pow(attempt))
    }
}

/// Run `op` until it succeeds, the error is not retryable, or attempts run out.
///
/// Only transient failures ([`ClientError::is_retryable`]) are retried, so a
/// 404 or a validation error surfaces immediately.
pub async fn retry_with_backoff<T, F, Fut>(policy: RetryPolicy, mut op: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt + 1 < policy.attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max = policy.attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Convenience for callers that want every failure retried (chat sends)
pub async fn retry_any<T, F, Fut>(policy: RetryPolicy, mut op: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let mut last: Option<ClientError> = None;
    for attempt in 0..policy.attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_unauthorized() => return Err(err),
            Err(err) => {
                tracing::warn!(attempt = attempt + 1, max = policy.attempts, error = %err, "Attempt failed");
                last = Some(err);
                if attempt + 1 < policy.attempts {
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
            }
        }
    }
    Err(last.unwrap_or_else(|| ClientError::Internal("retry loop ran zero attempts".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn server_error() -> ClientError {
        ClientError::Api {
            status: 503,
            message: "busy".into(),
        }
    }

    #[test]
    fn test_delays() {
        let policy = RetryPolicy::exponential(3, Duration::from_secs(1));
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));

        let fixed = RetryPolicy::fixed(3, Duration::from_secs(1));
        assert_eq!(fixed.delay_for(2), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();
        let c = calls.clone();
        let result = retry_with_backoff(
            RetryPolicy::exponential(3, Duration::from_secs(1)),
            move || {
                let c = c.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(server_error())
                    } else {
                        Ok(42)
                    }
                }
            },
        )
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s + 2s of backoff
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: ClientResult<()> =
            retry_with_backoff(RetryPolicy::exponential(3, Duration::from_millis(10)), move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(server_error())
                }
            })
            .await;
        assert!(matches!(result, Err(ClientError::Api { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_does_not_retry_not_found() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: ClientResult<()> =
            retry_with_backoff(RetryPolicy::exponential(3, Duration::from_millis(10)), move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(ClientError::NotFound("session".into()))
                }
            })
            .await;
        assert!(matches!(result, Err(ClientError::NotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_any_retries_validation() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();
        let result: ClientResult<()> =
            retry_any(RetryPolicy::fixed(3, Duration::from_secs(1)), move || {
                let c = c.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err(ClientError::invalid("model overloaded"))
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
