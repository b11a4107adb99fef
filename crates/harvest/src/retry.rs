use std::future::Future;
use std::time::Duration;

/// Bounded fixed-delay retry. The API rate-limits rather than degrades, so a
/// flat delay between attempts behaves better here than exponential backoff.
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Attempt {
    Retry { delay: Duration },
    GiveUp,
}

/// What to do once the retry budget is spent: escalate to the caller, or
/// downgrade to a sentinel `None` so just this unit of work is skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExhaustionMode {
    Abort,
    Skip,
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Transition after the `attempt`-th failure (1-based).
    pub fn on_failure(&self, attempt: u32) -> Attempt {
        if attempt < self.max_attempts {
            Attempt::Retry { delay: self.delay }
        } else {
            Attempt::GiveUp
        }
    }
}

pub async fn run_with_retry<F, Fut, T, E>(
    policy: &RetryPolicy,
    mode: ExhaustionMode,
    mut f: F,
) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match f().await {
            Ok(v) => return Ok(Some(v)),
            Err(e) => match policy.on_failure(attempt) {
                Attempt::Retry { delay } => {
                    tracing::debug!(
                        attempt,
                        max_attempts = policy.max_attempts,
                        error = %e,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Attempt::GiveUp => {
                    tracing::error!(attempts = attempt, error = %e, "retries exhausted");
                    return match mode {
                        ExhaustionMode::Skip => Ok(None),
                        ExhaustionMode::Abort => Err(e),
                    };
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn succeeds_on_first_try() {
        let result = run_with_retry(&fast_policy(3), ExhaustionMode::Abort, || async {
            Ok::<_, &str>(42)
        })
        .await;
        assert_eq!(result.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn succeeds_after_retries() {
        let counter = AtomicU32::new(0);
        let result: Result<Option<u32>, &str> =
            run_with_retry(&fast_policy(3), ExhaustionMode::Abort, || {
                let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if attempt < 3 {
                        Err("not yet")
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn abort_mode_surfaces_the_last_error() {
        let counter = AtomicU32::new(0);
        let result: Result<Option<()>, &str> =
            run_with_retry(&fast_policy(3), ExhaustionMode::Abort, || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err("always fails") }
            })
            .await;
        assert_eq!(result.unwrap_err(), "always fails");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn skip_mode_downgrades_exhaustion_to_none() {
        let counter = AtomicU32::new(0);
        let result: Result<Option<()>, &str> =
            run_with_retry(&fast_policy(3), ExhaustionMode::Skip, || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err("always fails") }
            })
            .await;
        assert_eq!(result.unwrap(), None);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_delay_elapses_between_attempts() {
        let policy = RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        };
        let start = tokio::time::Instant::now();
        let _: Result<Option<()>, &str> =
            run_with_retry(&policy, ExhaustionMode::Skip, || async { Err("down") }).await;
        // Two sleeps between three attempts.
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[test]
    fn transition_retries_below_budget() {
        let policy = fast_policy(3);
        let retry = Attempt::Retry {
            delay: Duration::from_millis(1),
        };
        assert_eq!(policy.on_failure(1), retry);
        assert_eq!(policy.on_failure(2), retry);
        assert_eq!(policy.on_failure(3), Attempt::GiveUp);
    }

    #[test]
    fn defaults_match_production_budget() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }
}
