//! Exponential backoff with optional jitter.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fraction of the raw delay used as the jitter half-width.
const JITTER_FRACTION: f64 = 0.1;

const DEFAULT_EXPONENTIAL_BASE: f64 = 2.0;

/// Retry budget and delay curve.
///
/// Delays follow `initial_delay * exponential_base^attempt`, capped at
/// `max_delay`, with an optional uniform ±10% perturbation. The result is
/// always within `[0, max_delay]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Re-attempts after the first call. `max_retries + 1` calls in total.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Growth factor per attempt. Values that are not finite or not greater
    /// than 1 are replaced by the default base of 2 when computing delays.
    pub exponential_base: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(16_000),
            exponential_base: DEFAULT_EXPONENTIAL_BASE,
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_exponential_base(mut self, base: f64) -> Self {
        self.exponential_base = base;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Growth factor actually applied by [`delay`](Self::delay).
    pub fn effective_base(&self) -> f64 {
        if self.exponential_base.is_finite() && self.exponential_base > 1.0 {
            self.exponential_base
        } else {
            DEFAULT_EXPONENTIAL_BASE
        }
    }

    /// Total number of calls allowed.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the retry that follows failed attempt `attempt` (0-indexed).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.delay_with_rng(attempt, &mut rand::rng())
    }

    /// Same as [`delay`](Self::delay) with an explicit random source.
    pub fn delay_with_rng<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let max_ns = self.max_delay.as_nanos() as f64;
        let initial_ns = self.initial_delay.as_nanos() as f64;

        let grown = initial_ns * self.effective_base().powf(f64::from(attempt));
        let raw = if initial_ns == 0.0 {
            0.0
        } else if grown.is_finite() {
            grown.min(max_ns)
        } else {
            max_ns
        };

        let mut delay = raw;
        if self.jitter {
            let spread = raw * JITTER_FRACTION;
            if spread > 0.0 {
                delay += rng.random_range(-spread..=spread);
            }
        }

        Duration::from_nanos(delay.clamp(0.0, max_ns).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn no_jitter() -> RetryConfig {
        RetryConfig::new().with_jitter(false)
    }

    #[test]
    fn test_default_curve() {
        let config = no_jitter();
        let delays: Vec<u128> = (0..6).map(|n| config.delay(n).as_millis()).collect();
        assert_eq!(delays, vec![1_000, 2_000, 4_000, 8_000, 16_000, 16_000]);
    }

    #[test]
    fn test_cap_applies_to_huge_attempts() {
        let config = no_jitter();
        assert_eq!(config.delay(10_000), Duration::from_millis(16_000));
        assert_eq!(config.delay(u32::MAX), Duration::from_millis(16_000));
    }

    #[test]
    fn test_zero_initial_delay() {
        let config = no_jitter().with_initial_delay(Duration::ZERO);
        assert_eq!(config.delay(0), Duration::ZERO);
        assert_eq!(config.delay(3), Duration::ZERO);
    }

    #[test]
    fn test_custom_base() {
        let config = no_jitter()
            .with_initial_delay(Duration::from_millis(100))
            .with_exponential_base(3.0)
            .with_max_delay(Duration::from_secs(60));
        assert_eq!(config.delay(2), Duration::from_millis(900));
    }

    #[test]
    fn test_invalid_base_uses_default() {
        let expected = no_jitter().delay(3);
        for base in [1.0, 0.5, -2.0, f64::NAN, f64::INFINITY] {
            let config = no_jitter().with_exponential_base(base);
            assert_eq!(config.effective_base(), 2.0);
            assert_eq!(config.delay(3), expected);
        }
    }

    #[test]
    fn test_invalid_base_from_deserialize() {
        let mut value = serde_json::to_value(no_jitter()).unwrap();
        value["exponential_base"] = serde_json::json!(0.5);
        let config: RetryConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.delay(2), Duration::from_millis(4_000));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let config = RetryConfig::new();
        let mut rng = StdRng::seed_from_u64(7);

        for attempt in 0..4 {
            let raw = no_jitter().delay(attempt).as_secs_f64();
            for _ in 0..200 {
                let jittered = config.delay_with_rng(attempt, &mut rng).as_secs_f64();
                assert!(jittered >= raw * 0.9 - 1e-9, "{jittered} below band for {raw}");
                assert!(jittered <= raw * 1.1 + 1e-9, "{jittered} above band for {raw}");
            }
        }
    }

    #[test]
    fn test_jitter_never_exceeds_cap() {
        let config = RetryConfig::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            assert!(config.delay_with_rng(8, &mut rng) <= config.max_delay);
        }
    }

    #[test]
    fn test_jitter_deterministic_for_seed() {
        let config = RetryConfig::new();
        let a = config.delay_with_rng(2, &mut StdRng::seed_from_u64(9));
        let b = config.delay_with_rng(2, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_attempts() {
        assert_eq!(RetryConfig::new().with_max_retries(2).max_attempts(), 3);
        assert_eq!(RetryConfig::new().with_max_retries(0).max_attempts(), 1);
    }
}
