//! Rate-limit backoff policy.
//!
//! [`BackoffConfig`] decides how many generation attempts are made and how
//! long to wait after a rate-limited one. Only rate limits are retried;
//! every other failure ends the attempt loop immediately.

use std::time::Duration;

/// Attempt budget and wait schedule for rate-limited generation calls.
///
/// # Example
///
/// ```
/// use article_pipeline::backend::BackoffConfig;
/// use std::time::Duration;
///
/// let standard = BackoffConfig::standard();
/// assert_eq!(standard.max_attempts, 3);
/// assert_eq!(standard.delay_for_attempt(1), Duration::from_secs(2));
/// assert_eq!(standard.delay_for_attempt(3), Duration::from_secs(8));
/// ```
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Total attempts, including the first. Default: 3.
    pub max_attempts: u32,

    /// Base delay; attempt `n` (1-indexed) waits `initial_delay * multiplier^n`.
    /// Default: 1 second, giving 2s, 4s, 8s.
    pub initial_delay: Duration,

    /// Growth factor between attempts. Default: 2.0.
    pub multiplier: f64,

    /// Upper bound on computed delays. Default: 8 seconds.
    pub max_delay: Duration,

    /// Longest `Retry-After` hint worth waiting for. A longer hint ends the
    /// attempt loop instead. Default: 8 seconds.
    pub max_retry_after: Duration,

    /// Jitter strategy. Default: `None`, so waits are exact.
    pub jitter: JitterStrategy,

    /// Whether a provider `Retry-After` hint replaces the computed delay.
    /// Default: `true`.
    pub respect_retry_after: bool,
}

/// Jitter applied to computed delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterStrategy {
    /// No jitter. Delay is exactly the calculated value.
    None,

    /// Full jitter: random value in `[0, calculated_delay]`.
    Full,

    /// Equal jitter: `calculated_delay/2 + random in [0, calculated_delay/2]`.
    Equal,
}

impl BackoffConfig {
    /// A single attempt, never retried.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::standard()
        }
    }

    /// Three attempts with 2s, 4s, 8s waits and `Retry-After` honoured.
    pub fn standard() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(8),
            max_retry_after: Duration::from_secs(8),
            jitter: JitterStrategy::None,
            respect_retry_after: true,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_jitter(mut self, jitter: JitterStrategy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Computed wait after rate-limited attempt `attempt` (1-indexed).
    ///
    /// Settings that produce a negative or non-finite delay yield `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = base.min(self.max_delay.as_secs_f64());

        let jittered = match self.jitter {
            JitterStrategy::None => capped,
            JitterStrategy::Full => fastrand::f64() * capped,
            JitterStrategy::Equal => capped / 2.0 + fastrand::f64() * (capped / 2.0),
        };

        Duration::try_from_secs_f64(jittered).unwrap_or(self.max_delay)
    }

    /// Wait after rate-limited attempt `attempt`, preferring the provider's hint.
    ///
    /// Returns `None` when the hint exceeds `max_retry_after`, meaning the
    /// provider will not recover within the request's latency budget.
    pub fn wait_after(&self, attempt: u32, retry_after: Option<Duration>) -> Option<Duration> {
        match retry_after {
            Some(hint) if self.respect_retry_after => {
                (hint <= self.max_retry_after).then_some(hint)
            }
            _ => Some(self.delay_for_attempt(attempt)),
        }
    }

    pub fn with_max_retry_after(mut self, max: Duration) -> Self {
        self.max_retry_after = max;
        self
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delay_exponential() {
        let config = BackoffConfig::standard();
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_delay_capped_at_max() {
        let config = BackoffConfig::standard().with_max_attempts(10);
        assert_eq!(config.delay_for_attempt(4), Duration::from_secs(8));
        assert_eq!(config.delay_for_attempt(40), Duration::from_secs(8));
    }

    #[test]
    fn test_retry_after_used_verbatim() {
        let config = BackoffConfig::standard();
        assert_eq!(
            config.wait_after(1, Some(Duration::from_secs(7))),
            Some(Duration::from_secs(7))
        );
        assert_eq!(
            config.wait_after(1, Some(Duration::from_secs(8))),
            Some(Duration::from_secs(8))
        );
        assert_eq!(config.wait_after(2, None), Some(Duration::from_secs(4)));
    }

    #[test]
    fn test_retry_after_over_cap_is_refused() {
        let config = BackoffConfig::standard();
        assert_eq!(config.wait_after(1, Some(Duration::from_secs(3600))), None);

        let patient = config.with_max_retry_after(Duration::from_secs(60));
        assert_eq!(
            patient.wait_after(1, Some(Duration::from_secs(30))),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_negative_multiplier_falls_back_to_max_delay() {
        let config = BackoffConfig {
            multiplier: -2.0,
            ..BackoffConfig::standard()
        };
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(8));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));

        let nan = BackoffConfig {
            multiplier: f64::NAN,
            ..BackoffConfig::standard()
        };
        assert_eq!(nan.delay_for_attempt(1), Duration::from_secs(8));
    }

    #[test]
    fn test_retry_after_ignored_when_disabled() {
        let config = BackoffConfig {
            respect_retry_after: false,
            ..BackoffConfig::standard()
        };
        assert_eq!(
            config.wait_after(1, Some(Duration::from_secs(3600))),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn test_backoff_jitter_full_in_range() {
        let config = BackoffConfig::standard().with_jitter(JitterStrategy::Full);
        for _ in 0..100 {
            let d = config.delay_for_attempt(1);
            assert!(d <= Duration::from_secs(2), "delay {:?} > 2s", d);
        }
    }

    #[test]
    fn test_backoff_jitter_equal_lower_bound() {
        let config = BackoffConfig::standard().with_jitter(JitterStrategy::Equal);
        for _ in 0..100 {
            let d = config.delay_for_attempt(2);
            assert!(d >= Duration::from_secs(2) && d <= Duration::from_secs(4));
        }
    }

    #[test]
    fn test_presets() {
        assert_eq!(BackoffConfig::none().max_attempts, 1);
        assert_eq!(BackoffConfig::default().max_attempts, 3);
        assert_eq!(BackoffConfig::none().with_max_attempts(0).max_attempts, 1);
    }
}
