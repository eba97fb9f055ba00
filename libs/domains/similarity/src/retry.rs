use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry policy for calls to external services
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry; doubled for each further retry
    pub initial_delay_ms: u64,

    /// Scale each delay to 50-100% of its value
    pub use_jitter: bool,
}

impl RetryPolicy {
    /// Defaults:
    /// - max_retries: 1
    /// - initial_delay_ms: 200
    /// - use_jitter: false
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_jitter(mut self) -> Self {
        self.use_jitter = true;
        self
    }

    /// No retries at all
    pub fn disabled() -> Self {
        Self::default().with_max_retries(0)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            initial_delay_ms: 200,
            use_jitter: false,
        }
    }
}

/// Run `operation`, retrying with backoff while `should_retry` accepts the error.
///
/// Errors rejected by `should_retry` are returned immediately.
///
/// # Example
/// ```ignore
/// let vector = retry_if(
///     || async { self.embed_once(model, text).await },
///     &self.retry,
///     SimilarityError::is_transient,
/// ).await?;
/// ```
pub async fn retry_if<F, Fut, T, E, P>(
    mut operation: F,
    policy: &RetryPolicy,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    let mut delay = policy.initial_delay_ms;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!("Operation succeeded after {} retries", attempt);
                }
                return Ok(result);
            }
            Err(e) if !should_retry(&e) => return Err(e),
            Err(e) => {
                attempt += 1;

                if attempt > policy.max_retries {
                    warn!("Operation failed after {} attempts: {}", attempt, e);
                    return Err(e);
                }

                let current_delay = if policy.use_jitter {
                    apply_jitter(delay)
                } else {
                    delay
                };

                debug!(
                    "Operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                    attempt,
                    policy.max_retries + 1,
                    e,
                    current_delay
                );

                tokio::time::sleep(Duration::from_millis(current_delay)).await;
                delay = delay.saturating_mul(2);
            }
        }
    }
}

fn apply_jitter(delay: u64) -> u64 {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let random_factor =
        (RandomState::new().hash_one(std::time::SystemTime::now()) % 50) as f64 / 100.0 + 0.5;

    (delay as f64 * random_factor) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn always_retry(_: &String) -> bool {
        true
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_if(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>("vector")
                }
            },
            &RetryPolicy::new().with_initial_delay(1),
            always_retry,
        )
        .await;

        assert_eq!(result.unwrap(), "vector");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_once_then_surfaces() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_if(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>("connection refused".to_string())
                }
            },
            &RetryPolicy::new().with_initial_delay(1),
            always_retry,
        )
        .await;

        assert_eq!(result.unwrap_err(), "connection refused");
        assert_eq!(counter.load(Ordering::SeqCst), 2); // 1 initial + 1 retry
    }

    #[tokio::test]
    async fn test_recovers_on_retry() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_if(
            || {
                let counter = counter_clone.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err("timed out".to_string())
                    } else {
                        Ok(7)
                    }
                }
            },
            &RetryPolicy::new().with_initial_delay(1).with_jitter(),
            always_retry,
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = retry_if(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>("bad payload".to_string())
                }
            },
            &RetryPolicy::new().with_initial_delay(1),
            |e: &String| e.contains("timed out"),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_policy_runs_once() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let _ = retry_if(
            || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>("down".to_string())
                }
            },
            &RetryPolicy::disabled(),
            always_retry,
        )
        .await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        for _ in 0..20 {
            let d = apply_jitter(200);
            assert!((100..=200).contains(&d));
        }
    }
}
