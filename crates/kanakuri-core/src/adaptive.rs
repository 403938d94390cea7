//! Adaptive chunk sizing.
//!
//! Response time relative to the timeout budget is used as a proxy for
//! network/server load. Each fetch multiplies the chunk size by a value
//! interpolated linearly on one of two curves:
//!
//! ```text
//! rel   success   failure
//! 0     ms0       mf0
//! 1     ms1       mf1
//! ```
//!
//! The failure curve is steeper so that failures shrink chunks faster than
//! successes grow them.

use std::time::Duration;

use crate::config::TransferConfig;

/// Fraction of the timeout budget consumed by a response, capped at 1.0.
pub fn response_time_rel(response_time: Duration, config: &TransferConfig) -> f64 {
    let budget_ms = config.max_interval as f64;
    if budget_ms <= 0.0 {
        return 1.0;
    }
    let elapsed_ms = response_time.as_secs_f64() * 1000.0;
    (elapsed_ms / budget_ms).min(1.0)
}

/// Multiplier applied to the current chunk size for a fetch outcome.
pub fn chunk_multiplier(rel: f64, succeeded: bool, config: &TransferConfig) -> f64 {
    let (at_zero, at_full) = if succeeded {
        (config.ms0, config.ms1)
    } else {
        (config.mf0, config.mf1)
    };
    at_zero - (at_zero - at_full) * rel
}

/// Next chunk size: `floor(current * multiplier)` clamped to
/// `[chunk_size_min, chunk_size_max]`.
pub fn next_chunk_size(
    current: u64,
    response_time: Duration,
    succeeded: bool,
    config: &TransferConfig,
) -> u64 {
    let rel = response_time_rel(response_time, config);
    let scaled = (current as f64 * chunk_multiplier(rel, succeeded, config)).floor();
    clamp_chunk_size(scaled, config)
}

fn clamp_chunk_size(size: f64, config: &TransferConfig) -> u64 {
    let min = config.chunk_size_min;
    let max = config.chunk_size_max.max(min);
    if size.is_nan() || size < min as f64 {
        return min;
    }
    if size >= max as f64 {
        return max;
    }
    size as u64
}

/// Cooldown after a failed fetch: the unused share of the timeout budget, so a
/// quick failure waits longer and a failure that already used the whole budget
/// retries immediately.
pub fn failure_backoff(response_time: Duration, config: &TransferConfig) -> Duration {
    let rel = response_time_rel(response_time, config);
    config.max_interval().mul_f64((1.0 - rel).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> TransferConfig {
        TransferConfig::default()
    }

    #[test]
    fn rel_is_capped_at_one() {
        let c = cfg();
        assert_eq!(response_time_rel(Duration::ZERO, &c), 0.0);
        assert!((response_time_rel(Duration::from_millis(2_500), &c) - 0.25).abs() < 1e-9);
        assert_eq!(response_time_rel(Duration::from_secs(60), &c), 1.0);
    }

    #[test]
    fn full_timeout_failure_shrinks_to_five_percent() {
        let c = cfg();
        let next = next_chunk_size(1_000_000, c.max_interval(), false, &c);
        assert_eq!(next, 50_000);
    }

    #[test]
    fn instant_failure_keeps_size() {
        let c = cfg();
        assert_eq!(next_chunk_size(1_000_000, Duration::ZERO, false, &c), 1_000_000);
    }

    #[test]
    fn instant_success_doubles_and_clamps_at_max() {
        let c = cfg();
        assert_eq!(next_chunk_size(1_000_000, Duration::ZERO, true, &c), 2_000_000);
        assert_eq!(
            next_chunk_size(40_000_000, Duration::ZERO, true, &c),
            c.chunk_size_max
        );
    }

    #[test]
    fn slow_success_shrinks_on_default_curve() {
        let c = cfg();
        // 2 - 1.8 lands just under 0.2 in f64; floor keeps that visible.
        let full = next_chunk_size(1_000_000, c.max_interval(), true, &c);
        assert!((199_999..=200_000).contains(&full), "{}", full);
        // Half the budget: 2 - 1.8 * 0.5 = 1.1
        let half = next_chunk_size(1_000_000, Duration::from_millis(5_000), true, &c);
        assert!((1_099_999..=1_100_000).contains(&half), "{}", half);
    }

    #[test]
    fn result_is_floored() {
        let c = TransferConfig {
            chunk_size_min: 1,
            ..cfg()
        };
        // 15 * 0.05 = 0.75 -> floor 0 -> clamp 1
        assert_eq!(next_chunk_size(15, c.max_interval(), false, &c), 1);
        // 333 * 1.1 = 366.3 -> 366
        assert_eq!(
            next_chunk_size(333, Duration::from_millis(5_000), true, &c),
            366
        );
    }

    #[test]
    fn clamped_to_min_for_any_outcome() {
        let c = cfg();
        assert_eq!(
            next_chunk_size(c.chunk_size_min, c.max_interval(), false, &c),
            c.chunk_size_min
        );
    }

    #[test]
    fn stays_in_bounds_for_hostile_curves() {
        let c = TransferConfig {
            chunk_size_min: 100,
            chunk_size_max: 1_000,
            mf0: -3.0,
            mf1: 50.0,
            ms0: 1e300,
            ms1: -1e300,
            ..cfg()
        };
        let mut size = c.initial_chunk_size();
        for step in 0..200u64 {
            let elapsed = Duration::from_millis((step * 137) % 12_000);
            size = next_chunk_size(size, elapsed, step % 3 != 0, &c);
            assert!(size >= c.chunk_size_min && size <= c.chunk_size_max, "{}", size);
        }
    }

    #[test]
    fn backoff_is_unused_budget() {
        let c = cfg();
        assert_eq!(failure_backoff(Duration::ZERO, &c), Duration::from_secs(10));
        assert_eq!(
            failure_backoff(Duration::from_millis(7_500), &c),
            Duration::from_millis(2_500)
        );
        assert_eq!(failure_backoff(Duration::from_secs(30), &c), Duration::ZERO);
    }
}
