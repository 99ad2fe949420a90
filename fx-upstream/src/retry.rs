//! Retry logic with decorrelated exponential backoff and an overall deadline.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::error::UpstreamError;

/// Upper bound for a single computed delay, keeps `Duration` construction finite.
const MAX_DELAY_SECS: f64 = 3_600.0;

/// Retry policy applied to every upstream call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Median of the first backoff delay.
    pub median_first_delay: Duration,
    /// Bound on the whole call, every attempt and delay included.
    pub deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            median_first_delay: Duration::from_secs(1),
            deadline: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Disable retries, keeping the deadline.
    pub fn no_retry(deadline: Duration) -> Self {
        Self {
            max_retries: 0,
            deadline,
            ..Self::default()
        }
    }

    /// Draws one backoff schedule, one delay per allowed retry.
    pub fn backoff_delays(&self) -> Vec<Duration> {
        decorrelated_jitter(&mut rand::rng(), self.median_first_delay, self.max_retries)
    }

    /// Runs `op` until it succeeds, fails with a non-transient error, runs out
    /// of retries, or the deadline passes.
    ///
    /// The deadline surfaces as `UpstreamError::DeadlineExceeded` and is never
    /// retried.
    pub async fn execute<T, F, Fut>(&self, mut op: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let delays = self.backoff_delays();

        let attempts = async {
            let mut retries = delays.into_iter();
            let mut attempt = 1u32;
            loop {
                let err = match op().await {
                    Ok(value) => return Ok(value),
                    Err(err) if err.is_transient() => err,
                    Err(err) => return Err(err),
                };
                let Some(delay) = retries.next() else {
                    return Err(err);
                };
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient upstream failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        };

        tokio::time::timeout(self.deadline, attempts)
            .await
            .map_err(|_| UpstreamError::DeadlineExceeded)?
    }
}

/// Decorrelated jitter backoff (second variant).
///
/// Delays grow roughly exponentially while successive delays stay
/// uncorrelated; the first delay's median is close to `median_first_delay`.
fn decorrelated_jitter<R: Rng>(
    rng: &mut R,
    median_first_delay: Duration,
    retries: u32,
) -> Vec<Duration> {
    const P_FACTOR: f64 = 4.0;
    const RP_SCALING_FACTOR: f64 = 1.0 / 1.4;

    let target = median_first_delay.as_secs_f64();
    let mut t = 0.0_f64;
    let mut prev = 0.0_f64;

    (0..retries)
        .map(|_| {
            t += rng.random::<f64>();
            let next = 2_f64.powf(t) * (P_FACTOR * t).sqrt().tanh();
            let seconds = (next - prev) * RP_SCALING_FACTOR * target;
            prev = next;
            Duration::from_secs_f64(seconds.clamp(0.0, MAX_DELAY_SECS))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            median_first_delay: Duration::from_millis(1),
            deadline: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.median_first_delay, Duration::from_secs(1));
        assert_eq!(policy.deadline, Duration::from_secs(30));
    }

    #[test]
    fn test_one_delay_per_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delays().len(), 3);
        assert!(RetryPolicy::no_retry(Duration::from_secs(1)).backoff_delays().is_empty());
    }

    #[test]
    fn test_first_delay_median_near_target() {
        let mut firsts: Vec<f64> = (0..1001)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                decorrelated_jitter(&mut rng, Duration::from_secs(1), 1)[0].as_secs_f64()
            })
            .collect();
        firsts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = firsts[firsts.len() / 2];

        assert!((0.5..1.5).contains(&median), "median first delay {median}s");
    }

    #[test]
    fn test_schedule_grows() {
        let mut rng = StdRng::seed_from_u64(7);
        let delays = decorrelated_jitter(&mut rng, Duration::from_secs(1), 6);
        let total: Duration = delays.iter().sum();

        assert_eq!(delays.len(), 6);
        assert!(total > delays[0]);
    }

    #[tokio::test]
    async fn test_two_transient_failures_then_success() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result = fast_policy()
            .execute(move || async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n <= 2 {
                    Err(UpstreamError::Status(503))
                } else {
                    Ok(n)
                }
            })
            .await;

        assert_eq!(result, Ok(3));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result: Result<(), _> = fast_policy()
            .execute(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(UpstreamError::Status(404))
            })
            .await;

        assert_eq!(result, Err(UpstreamError::Status(404)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_last_error() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;

        let result: Result<(), _> = fast_policy()
            .execute(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(UpstreamError::Status(429))
            })
            .await;

        assert_eq!(result, Err(UpstreamError::Status(429)));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let policy = RetryPolicy {
            deadline: Duration::from_millis(50),
            ..fast_policy()
        };

        let result: Result<(), _> = policy
            .execute(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert_eq!(result, Err(UpstreamError::DeadlineExceeded));
    }
}
