//! Exponential backoff.
//!
//! No jitter is applied here; poll cadence owns jitter.

use std::time::Duration;

/// Calculate the delay before retry `attempt` (1-indexed).
///
/// `min(base_ms * 2^(attempt-1), max_ms)`, saturating on overflow.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);

    Duration::from_millis(delay_ms.min(max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_schedule() {
        let delays: Vec<u128> = (1..=6)
            .map(|k| calculate_backoff(k, 1000, 8000).as_millis())
            .collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 8000, 8000]);
    }

    #[test]
    fn test_backoff_is_monotonic_and_capped() {
        let mut previous = Duration::ZERO;
        for k in 1..=64 {
            let delay = calculate_backoff(k, 1000, 8000);
            assert!(delay >= previous);
            assert!(delay <= Duration::from_millis(8000));
            previous = delay;
        }
    }

    #[test]
    fn test_attempt_zero_has_no_delay() {
        assert_eq!(calculate_backoff(0, 1000, 8000), Duration::ZERO);
    }

    #[test]
    fn test_huge_attempt_saturates() {
        assert_eq!(calculate_backoff(200, u64::MAX / 2, u64::MAX).as_millis(), u64::MAX as u128);
    }
}
