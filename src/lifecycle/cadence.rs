//! Poll cadence with symmetric jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::PollingConfig;

/// Fast/slow polling windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCadence {
    pub fast_interval: Duration,
    pub slow_interval: Duration,
    /// Iterations (1-indexed, inclusive) that use `fast_interval`.
    pub fast_polls: u32,
    pub jitter: Duration,
}

impl PollCadence {
    /// Base interval to wait after poll `iteration` (1-indexed).
    pub fn interval_for(&self, iteration: u32) -> Duration {
        if iteration <= self.fast_polls {
            self.fast_interval
        } else {
            self.slow_interval
        }
    }

    pub fn delay_with<R: Rng + ?Sized>(&self, iteration: u32, rng: &mut R) -> Duration {
        apply_jitter(self.interval_for(iteration), self.jitter, rng)
    }

    /// Jittered delay using the thread-local RNG.
    pub fn next_delay(&self, iteration: u32) -> Duration {
        self.delay_with(iteration, &mut rand::thread_rng())
    }
}

impl From<&PollingConfig> for PollCadence {
    fn from(config: &PollingConfig) -> Self {
        Self {
            fast_interval: Duration::from_millis(config.fast_interval_ms),
            slow_interval: Duration::from_millis(config.slow_interval_ms),
            fast_polls: config.fast_poll_count,
            jitter: Duration::from_millis(config.jitter_ms),
        }
    }
}

impl Default for PollCadence {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

/// Perturb `interval` uniformly within `±spread`, floored at zero.
pub fn apply_jitter<R: Rng + ?Sized>(interval: Duration, spread: Duration, rng: &mut R) -> Duration {
    if spread.is_zero() {
        return interval;
    }

    let spread_ms = saturating_millis(spread);
    let offset = rng.gen_range(-spread_ms..=spread_ms);
    let jittered = saturating_millis(interval).saturating_add(offset).max(0);

    Duration::from_millis(u64::try_from(jittered).unwrap_or(0))
}

fn saturating_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fast_then_slow_window() {
        let cadence = PollCadence::default();
        for i in 1..=5 {
            assert_eq!(cadence.interval_for(i), Duration::from_millis(2000));
        }
        for i in 6..=20 {
            assert_eq!(cadence.interval_for(i), Duration::from_millis(5000));
        }
    }

    #[test]
    fn test_configured_fast_window() {
        let cadence = PollCadence {
            fast_polls: 2,
            ..PollCadence::default()
        };
        assert_eq!(cadence.interval_for(2), cadence.fast_interval);
        assert_eq!(cadence.interval_for(3), cadence.slow_interval);
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let spread = Duration::from_millis(300);
        for interval_ms in [0u64, 100, 299, 300, 2000, 5000] {
            let interval = Duration::from_millis(interval_ms);
            let low = Duration::from_millis(interval_ms.saturating_sub(300));
            let high = Duration::from_millis(interval_ms + 300);
            for _ in 0..500 {
                let delay = apply_jitter(interval, spread, &mut rng);
                assert!(delay >= low && delay <= high, "{:?} outside [{:?}, {:?}]", delay, low, high);
            }
        }
    }

    #[test]
    fn test_jitter_spreads_both_ways() {
        let mut rng = StdRng::seed_from_u64(42);
        let interval = Duration::from_millis(2000);
        let samples: Vec<Duration> = (0..200)
            .map(|_| apply_jitter(interval, Duration::from_millis(300), &mut rng))
            .collect();
        assert!(samples.iter().any(|d| *d < interval));
        assert!(samples.iter().any(|d| *d > interval));
    }

    #[test]
    fn test_oversized_spread_saturates() {
        let mut rng = StdRng::seed_from_u64(3);
        let cadence = PollCadence {
            jitter: Duration::from_millis(u64::MAX),
            ..PollCadence::default()
        };
        for i in 1..=20 {
            let delay = cadence.delay_with(i, &mut rng);
            assert!(delay <= Duration::from_millis(i64::MAX as u64 + 5000));
        }
    }

    #[test]
    fn test_zero_spread_is_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        let interval = Duration::from_millis(1234);
        assert_eq!(apply_jitter(interval, Duration::ZERO, &mut rng), interval);
    }
}
