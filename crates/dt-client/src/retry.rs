//! Retry policy with capped exponential backoff and jitter.

use rand::Rng;
use std::time::Duration;

/// Capped exponential backoff with multiplicative jitter.
///
/// The policy is immutable once built; the retry counter is supplied by the
/// caller, so a single `Backoff` can be shared by any number of retry loops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    base_delay: Duration,
    max_delay: Duration,
    factor: f64,
    jitter: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(180),
            factor: 1.6,
            jitter: 0.2,
        }
    }
}

impl Backoff {
    /// Create a backoff with the given parameters.
    pub fn new(base_delay: Duration, max_delay: Duration, factor: f64, jitter: f64) -> Self {
        Self {
            base_delay,
            max_delay,
            factor,
            jitter,
        }
    }

    /// Set the delay returned for attempt zero.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the upper bound of the nominal delay.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the multiplicative growth factor. Values at or below 1.0 keep
    /// every delay at the base delay.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Set the jitter fraction.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Delay to wait before retry number `attempt`.
    ///
    /// Attempt zero returns the base delay unchanged. Later attempts grow by
    /// `factor` per attempt up to `max_delay`, then get jittered by
    /// `1 + jitter * U` with `U` uniform in `[-1, 1]`. Never negative.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.base_delay;
        }

        let draw = rand::rng().random_range(-1.0..=1.0);
        self.jittered(attempt, draw)
    }

    /// The un-jittered delay for `attempt`, clamped to `max_delay`.
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.base_delay;
        }
        to_duration(self.nominal_secs(attempt))
    }

    /// Apply a specific jitter draw in `[-1, 1]` to the nominal delay.
    pub(crate) fn jittered(&self, attempt: u32, draw: f64) -> Duration {
        let backoff = self.nominal_secs(attempt) * (1.0 + self.jitter * draw);
        to_duration(backoff.max(0.0))
    }

    fn nominal_secs(&self, attempt: u32) -> f64 {
        let max = self.max_delay.as_secs_f64();
        let base = self.base_delay.as_secs_f64();

        if self.factor <= 1.0 || base <= 0.0 {
            return base.min(max);
        }

        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        (base * self.factor.powi(exponent)).min(max)
    }
}

fn to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Delay policy between attempts.
    pub backoff: Backoff,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: Backoff::default(),
        }
    }
}

impl RetryConfig {
    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the backoff policy.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Disable retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Total number of attempts this config allows.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Per-operation retry state.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    retries: u32,
}

impl RetryPolicy {
    /// Create a new retry policy from config.
    pub fn new(config: RetryConfig) -> Self {
        Self { config, retries: 0 }
    }

    /// Number of retries performed so far.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns true if another retry is allowed.
    pub fn should_retry(&self) -> bool {
        self.retries < self.config.max_retries
    }

    /// Record a retry and return the delay to wait before it.
    /// Returns None if we've exhausted all retries.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if !self.should_retry() {
            return None;
        }

        self.retries += 1;
        Some(self.config.backoff.delay_for(self.retries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff() {
        let backoff = Backoff::default();
        assert_eq!(backoff.base_delay(), Duration::from_secs(1));
        assert_eq!(backoff.max_delay(), Duration::from_secs(180));
        assert!((backoff.factor() - 1.6).abs() < f64::EPSILON);
        assert!((backoff.jitter() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_attempt_zero_is_base_delay() {
        let backoff = Backoff::default();
        for _ in 0..100 {
            assert_eq!(backoff.delay_for(0), Duration::from_secs(1));
        }

        let custom = Backoff::default().with_base_delay(Duration::from_millis(250));
        assert_eq!(custom.delay_for(0), Duration::from_millis(250));
    }

    #[test]
    fn test_nominal_growth() {
        let backoff = Backoff::default();
        assert_eq!(backoff.nominal_delay(1), Duration::from_secs_f64(1.6));
        assert_eq!(backoff.nominal_delay(2), Duration::from_secs_f64(1.6 * 1.6));
    }

    #[test]
    fn test_nominal_delay_is_monotonic_until_clamped() {
        let backoff = Backoff::default();
        let mut previous = backoff.nominal_delay(0);
        for attempt in 1..40 {
            let current = backoff.nominal_delay(attempt);
            assert!(
                current >= previous,
                "attempt {attempt}: {current:?} < {previous:?}"
            );
            assert!(current <= backoff.max_delay());
            previous = current;
        }
        assert_eq!(backoff.nominal_delay(39), Duration::from_secs(180));
    }

    #[test]
    fn test_large_attempt_is_clamped() {
        let backoff = Backoff::default();
        assert_eq!(backoff.nominal_delay(u32::MAX), Duration::from_secs(180));
    }

    #[test]
    fn test_non_growing_factor_stays_at_base() {
        let flat = Backoff::default().with_factor(1.0);
        assert_eq!(flat.nominal_delay(u32::MAX), Duration::from_secs(1));

        let shrinking = Backoff::new(Duration::from_secs(2), Duration::from_secs(10), 0.5, 0.0);
        assert_eq!(shrinking.delay_for(u32::MAX), Duration::from_secs(2));

        let zero_base = Backoff::default().with_base_delay(Duration::ZERO);
        assert_eq!(zero_base.nominal_delay(u32::MAX), Duration::ZERO);
    }

    #[test]
    fn test_delay_bounds_for_extreme_draws() {
        let backoff = Backoff::default();
        let upper = backoff.max_delay().as_secs_f64() * (1.0 + backoff.jitter());

        for attempt in [1, 2, 5, 10, 12, 50, 1_000, u32::MAX] {
            for draw in [-1.0, -0.5, 0.0, 0.5, 1.0] {
                let delay = backoff.jittered(attempt, draw).as_secs_f64();
                assert!(delay >= 0.0);
                assert!(delay <= upper + 1e-9, "attempt {attempt} draw {draw}: {delay}");
            }
        }
    }

    #[test]
    fn test_random_delays_within_bounds() {
        let backoff = Backoff::default();
        let upper = backoff.max_delay().as_secs_f64() * (1.0 + backoff.jitter());

        for attempt in 0..30 {
            for _ in 0..50 {
                let delay = backoff.delay_for(attempt).as_secs_f64();
                assert!(delay >= 0.0);
                assert!(delay <= upper + 1e-9);
            }
        }
    }

    #[test]
    fn test_jitter_never_goes_negative() {
        // A jitter fraction above one could push the factor below zero.
        let backoff = Backoff::default().with_jitter(1.5);
        assert_eq!(backoff.jittered(3, -1.0), Duration::ZERO);
        for attempt in 1..10 {
            assert!(backoff.delay_for(attempt) <= backoff.max_delay().mul_f64(2.5));
        }
    }

    #[test]
    fn test_base_above_max_is_clamped() {
        let backoff = Backoff::new(Duration::from_secs(10), Duration::from_secs(5), 2.0, 0.0);
        assert_eq!(backoff.delay_for(0), Duration::from_secs(10));
        assert_eq!(backoff.delay_for(1), Duration::from_secs(5));
    }

    #[test]
    fn test_no_retry() {
        let policy = RetryPolicy::new(RetryConfig::no_retry());
        assert!(!policy.should_retry());
        assert_eq!(RetryConfig::no_retry().max_attempts(), 1);
    }

    #[test]
    fn test_retry_policy() {
        let backoff = Backoff::default().with_jitter(0.0);
        let mut policy = RetryPolicy::new(RetryConfig::default().with_backoff(backoff));

        assert!(policy.should_retry());
        assert_eq!(policy.retries(), 0);

        // The first retry waits for attempt one, not the base delay.
        assert_eq!(policy.next_delay(), Some(backoff.nominal_delay(1)));
        assert_eq!(policy.next_delay(), Some(backoff.nominal_delay(2)));
        assert_eq!(policy.next_delay(), Some(backoff.nominal_delay(3)));
        assert_eq!(policy.retries(), 3);

        assert!(!policy.should_retry());
        assert!(policy.next_delay().is_none());
        assert_eq!(policy.retries(), 3);
    }
}
