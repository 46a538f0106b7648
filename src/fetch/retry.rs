//! Retry policy.
//!
//! Attempt `n` (1-based) that fails is followed by a sleep of `base^n`
//! seconds, unless it was the last attempt.

use std::time::Duration;

/// HTTP statuses worth retrying.
pub const TRANSIENT_STATUSES: &[u16] = &[429, 502, 503, 504];

pub fn is_transient_status(status: u16) -> bool {
    TRANSIENT_STATUSES.contains(&status)
}

/// Delay after failed attempt `attempt` (1-based).
pub fn backoff_delay(base: f64, attempt: u32) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let secs = base.powi(exponent);
    if secs.is_nan() || secs < 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Something that can block the current thread.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        for status in [429, 502, 503, 504] {
            assert!(is_transient_status(status));
        }
        for status in [200, 400, 404, 500, 501] {
            assert!(!is_transient_status(status));
        }
    }

    #[test]
    fn test_backoff_schedule() {
        let delays: Vec<f64> = (1..=3).map(|n| backoff_delay(1.7, n).as_secs_f64()).collect();
        assert!((delays[0] - 1.7).abs() < 1e-9);
        assert!((delays[1] - 2.89).abs() < 1e-9);
        assert!((delays[2] - 4.913).abs() < 1e-9);
    }

    #[test]
    fn test_backoff_degenerate_inputs() {
        assert_eq!(backoff_delay(f64::NAN, 1), Duration::ZERO);
        assert_eq!(backoff_delay(0.0, 3), Duration::ZERO);
        assert_eq!(backoff_delay(1e300, 10), Duration::MAX);
    }
}
