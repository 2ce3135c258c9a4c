//! Retry delay schedule: exponential growth with optional jitter.

use rand::Rng;
use std::time::Duration;

/// Computes retry delays for a bounded retry budget.
///
/// For retry attempt `a` (1-indexed; the first try never waits), the delay is
/// `base * 2^(a-1)`, scaled by a jitter factor drawn uniformly from
/// `[0.5, 1.5)` when jitter is enabled. No upper cap is applied; callers bound
/// the total number of attempts instead of total elapsed time.
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    base: Duration,
    jitter: bool,
}

impl BackoffSchedule {
    /// Create a schedule with the given base delay and jitter toggle.
    pub fn new(base: Duration, jitter: bool) -> Self {
        Self { base, jitter }
    }

    /// Delay to sleep before retry attempt `attempt` (>= 1).
    pub fn delay(&self, attempt: u32) -> Duration {
        debug_assert!(attempt >= 1, "the first attempt never waits");
        // Exponent is capped so the shift cannot overflow; callers never get
        // anywhere near 16 retries in practice.
        let exponent = attempt.saturating_sub(1).min(16);
        let scaled = self.base.saturating_mul(2u32.saturating_pow(exponent));
        if self.jitter {
            let factor: f64 = rand::thread_rng().gen_range(0.5..1.5);
            scaled.mul_f64(factor)
        } else {
            scaled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_without_jitter() {
        let schedule = BackoffSchedule::new(Duration::from_secs(2), false);
        let first = schedule.delay(1);
        let second = schedule.delay(2);
        let third = schedule.delay(3);

        assert_eq!(first, Duration::from_secs(2));
        assert_eq!(second, Duration::from_secs(4));
        assert_eq!(third, Duration::from_secs(8));
        assert!(first < second && second < third);
    }

    #[test]
    fn jitter_stays_within_half_to_one_and_a_half() {
        let schedule = BackoffSchedule::new(Duration::from_secs(2), true);
        for _ in 0..100 {
            let delay = schedule.delay(2);
            assert!(delay >= Duration::from_secs(2), "delay {delay:?} below 0.5x");
            assert!(delay < Duration::from_secs(6), "delay {delay:?} above 1.5x");
        }
    }

    #[test]
    fn deep_attempts_do_not_overflow() {
        let schedule = BackoffSchedule::new(Duration::from_secs(2), false);
        let delay = schedule.delay(u32::MAX);
        assert!(delay >= schedule.delay(17));
    }
}
