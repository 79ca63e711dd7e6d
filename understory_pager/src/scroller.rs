// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-driven settle animation.

use crate::config::PagerConfig;

/// Animates the scroll offset toward a slot origin.
///
/// The curve decelerates quadratically (`1 - (1 - t)^2`). The clock starts on
/// the first sample, so callers need not know the time when they start a
/// settle.
#[derive(Clone, Debug)]
pub(crate) struct Scroller {
    from: f64,
    to: f64,
    target: usize,
    duration_ms: u64,
    start_ms: Option<u64>,
}

impl Scroller {
    pub(crate) fn new(from: f64, to: f64, target: usize, config: &PagerConfig) -> Self {
        let distance = (to - from).abs();
        let duration = (distance * config.settle_ms_per_pixel).min(config.max_settle_duration_ms as f64);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Bounded by `max_settle_duration_ms`; sub-millisecond precision is irrelevant"
        )]
        let duration_ms = duration.max(0.0) as u64;
        Self {
            from,
            to,
            target,
            duration_ms,
            start_ms: None,
        }
    }

    /// Buffer slot this settle ends on.
    pub(crate) fn target(&self) -> usize {
        self.target
    }

    pub(crate) fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Returns the offset at `now_ms` and whether the settle is complete.
    pub(crate) fn sample(&mut self, now_ms: u64) -> (f64, bool) {
        let start = *self.start_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(start);
        if elapsed >= self.duration_ms {
            return (self.to, true);
        }
        let t = elapsed as f64 / self.duration_ms as f64;
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        (self.from + (self.to - self.from) * eased, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_scales_with_distance_and_is_bounded() {
        let config = PagerConfig::new().with_settle_timing(2.0, 600);
        assert_eq!(Scroller::new(0.0, 100.0, 1, &config).duration_ms(), 200);
        assert_eq!(Scroller::new(100.0, 0.0, 0, &config).duration_ms(), 200);
        assert_eq!(Scroller::new(0.0, 1000.0, 1, &config).duration_ms(), 600);
        assert_eq!(Scroller::new(50.0, 50.0, 0, &config).duration_ms(), 0);
    }

    #[test]
    fn sample_decelerates_toward_target() {
        let config = PagerConfig::new().with_settle_timing(2.0, 600);
        let mut s = Scroller::new(0.0, 100.0, 1, &config);
        assert_eq!(s.sample(1000), (0.0, false));
        let (half, done) = s.sample(1100);
        assert!(!done);
        // Past the linear midpoint because the curve decelerates.
        assert!((half - 75.0).abs() < 1e-9);
        assert_eq!(s.sample(1200), (100.0, true));
        assert_eq!(s.target(), 1);
    }

    #[test]
    fn zero_length_settle_finishes_on_first_sample() {
        let mut s = Scroller::new(30.0, 30.0, 2, &PagerConfig::new());
        assert_eq!(s.sample(5), (30.0, true));
    }
}
