//! Retry policy with deterministic exponential backoff.

use std::time::Duration;

use crate::error::ConfigError;

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default wait before the second attempt.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1_000);
/// Default growth factor applied to the wait after every retry.
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Returns true for statuses that signal a temporary upstream condition:
/// 429 and the whole 5xx range.
pub const fn is_transient_status(status: u16) -> bool {
    status == 429 || (status >= 500 && status < 600)
}

/// Bounded retry policy.
///
/// The wait before attempt `n + 1` is `initial_delay * backoff_multiplier^(n - 1)`,
/// so the default policy sleeps 1s, then 2s.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    retryable_status: fn(u16) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            retryable_status: is_transient_status,
        }
    }
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        backoff_multiplier: f64,
    ) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(String::from(
                "max_attempts must be at least 1",
            )));
        }
        if !backoff_multiplier.is_finite() || backoff_multiplier <= 1.0 {
            return Err(ConfigError::InvalidRetry(format!(
                "backoff_multiplier must be a finite number greater than 1, got {backoff_multiplier}"
            )));
        }

        Ok(Self {
            max_attempts,
            initial_delay,
            backoff_multiplier,
            retryable_status: is_transient_status,
        })
    }

    /// Replace the status predicate. Statuses it accepts are retried.
    pub fn with_retryable_status(mut self, predicate: fn(u16) -> bool) -> Self {
        self.retryable_status = predicate;
        self
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub const fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        (self.retryable_status)(status)
    }

    /// Wait applied after the failed attempt numbered `attempt` (1-based).
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let seconds = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }

    /// Every wait a fully failing call goes through, in order.
    pub fn backoff_schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts)
            .map(|attempt| self.delay_after_attempt(attempt))
            .collect()
    }

    /// Upper bound on the wall-clock time of one call given a per-attempt timeout.
    pub fn worst_case_elapsed(&self, timeout: Duration) -> Duration {
        self.backoff_schedule()
            .into_iter()
            .fold(timeout.saturating_mul(self.max_attempts), Duration::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses_are_429_and_5xx() {
        assert!(is_transient_status(429));
        assert!(is_transient_status(500));
        assert!(is_transient_status(503));
        assert!(is_transient_status(599));
        assert!(!is_transient_status(600));
        assert!(!is_transient_status(404));
        assert!(!is_transient_status(408));
        assert!(!is_transient_status(200));
    }

    #[test]
    fn default_policy_matches_sync_constants() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.initial_delay(), Duration::from_millis(1_000));
        assert_eq!(policy.backoff_multiplier(), 2.0);
        assert!(policy.is_retryable_status(503));
        assert!(!policy.is_retryable_status(404));
    }

    #[test]
    fn delays_grow_geometrically() {
        let policy = RetryPolicy::new(5, Duration::from_millis(250), 3.0).expect("valid policy");

        assert_eq!(policy.delay_after_attempt(1), Duration::from_millis(250));
        assert_eq!(policy.delay_after_attempt(2), Duration::from_millis(750));
        assert_eq!(policy.delay_after_attempt(3), Duration::from_millis(2_250));
    }

    #[test]
    fn default_schedule_is_one_then_two_seconds() {
        assert_eq!(
            RetryPolicy::default().backoff_schedule(),
            vec![Duration::from_millis(1_000), Duration::from_millis(2_000)]
        );
    }

    #[test]
    fn single_attempt_policy_never_sleeps() {
        let policy = RetryPolicy::new(1, Duration::from_millis(500), 2.0).expect("valid policy");
        assert!(policy.backoff_schedule().is_empty());
    }

    #[test]
    fn worst_case_adds_timeouts_and_waits() {
        let bound = RetryPolicy::default().worst_case_elapsed(Duration::from_secs(10));
        assert_eq!(bound, Duration::from_secs(33));
    }

    #[test]
    fn rejects_zero_attempts_and_flat_multiplier() {
        assert!(RetryPolicy::new(0, Duration::from_millis(1), 2.0).is_err());
        assert!(RetryPolicy::new(3, Duration::from_millis(1), 1.0).is_err());
        assert!(RetryPolicy::new(3, Duration::from_millis(1), f64::NAN).is_err());
    }

    #[test]
    fn custom_predicate_replaces_default() {
        let policy = RetryPolicy::default().with_retryable_status(|status| status == 418);

        assert!(policy.is_retryable_status(418));
        assert!(!policy.is_retryable_status(503));
    }

    #[test]
    fn huge_exponent_saturates() {
        let policy = RetryPolicy::new(u32::MAX, Duration::from_secs(1), 10.0).expect("valid policy");
        assert_eq!(policy.delay_after_attempt(u32::MAX), Duration::MAX);
    }
}
