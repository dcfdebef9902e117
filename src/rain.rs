//! # Rain Accumulator
//!
//! Turns the station's cumulative rain counter into a bounded per-sample
//! delta with spike rejection.
//!
//! The counter is monotonic by device design but glitches upward
//! sporadically; a single-cycle jump above [`RainAccumulator::max_jump`]
//! (10 mm by default) is treated as sensor noise, not rainfall. The
//! threshold is an empirical spike filter, not a physical rain-rate limit.
//!
//! This is the only stateful piece of the decode pipeline: one `f64` of
//! carried state, owned exclusively by the accumulator and read-modify-
//! written once per cycle.

/// Per-sample output of the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainReading {
    /// Rainfall since the previous sample in mm (0 for the baseline sample
    /// and for rejected spikes)
    pub delta_mm: f64,
    /// Running total in mm, pinned at its previous value across a rejected
    /// spike
    pub total_mm: f64,
}

/// Stateful filter over the cumulative rain counter.
///
/// Starts uninitialized (`previous_total == 0.0` sentinel); the first
/// sample establishes the baseline and always reports a zero delta, so a
/// freshly started logger never invents a cloudburst out of whatever the
/// counter happens to read.
#[derive(Debug)]
pub struct RainAccumulator {
    /// Counter value accepted on the previous cycle; 0.0 means "no baseline
    /// yet"
    previous_total: f64,
    /// Largest single-cycle increase accepted as real rain, in mm
    max_jump: f64,
}

impl RainAccumulator {
    /// Default spike threshold in mm per cycle.
    pub const DEFAULT_MAX_JUMP_MM: f64 = 10.0;

    pub fn new(max_jump: f64) -> Self {
        Self {
            previous_total: 0.0,
            max_jump,
        }
    }

    /// Feed one already-scaled counter value (mm) and get the filtered
    /// delta and running total.
    ///
    /// State transitions:
    /// - uninitialized: adopt `raw_total` as the baseline, delta 0
    /// - jump above `max_jump`: discard, delta 0, total stays pinned
    /// - otherwise: accept, delta = increase, total advances to `raw_total`
    pub fn update(&mut self, raw_total: f64) -> RainReading {
        if self.previous_total == 0.0 {
            self.previous_total = raw_total;
            return RainReading {
                delta_mm: 0.0,
                total_mm: raw_total,
            };
        }

        let delta = raw_total - self.previous_total;
        if delta > self.max_jump {
            return RainReading {
                delta_mm: 0.0,
                total_mm: self.previous_total,
            };
        }

        self.previous_total = raw_total;
        RainReading {
            delta_mm: delta,
            total_mm: raw_total,
        }
    }
}

impl Default for RainAccumulator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_JUMP_MM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn first_sample_establishes_baseline_with_zero_delta() {
        let mut acc = RainAccumulator::default();
        let reading = acc.update(123.9);
        assert_eq!(reading.delta_mm, 0.0);
        assert!((reading.total_mm - 123.9).abs() < EPS);
    }

    #[test]
    fn baseline_delta_is_zero_for_any_starting_counter() {
        for raw in [0.3, 50.0, 300.0, 19660.5] {
            let mut acc = RainAccumulator::default();
            assert_eq!(acc.update(raw).delta_mm, 0.0);
        }
    }

    #[test]
    fn accepts_increase_at_exactly_the_threshold() {
        let mut acc = RainAccumulator::default();
        acc.update(100.0);
        let reading = acc.update(110.0);
        assert!((reading.delta_mm - 10.0).abs() < EPS);
        assert!((reading.total_mm - 110.0).abs() < EPS);
    }

    #[test]
    fn rejects_spike_above_threshold_and_pins_total() {
        let mut acc = RainAccumulator::default();
        acc.update(100.0);
        let reading = acc.update(111.0);
        assert_eq!(reading.delta_mm, 0.0);
        assert!((reading.total_mm - 100.0).abs() < EPS);

        // The spike did not advance the baseline: a sane follow-up reading
        // is measured against the pinned total.
        let reading = acc.update(102.0);
        assert!((reading.delta_mm - 2.0).abs() < EPS);
        assert!((reading.total_mm - 102.0).abs() < EPS);
    }

    #[test]
    fn steady_drizzle_accumulates() {
        let mut acc = RainAccumulator::default();
        acc.update(300.0);
        let mut last = RainReading {
            delta_mm: 0.0,
            total_mm: 300.0,
        };
        for step in 1..=5 {
            last = acc.update(300.0 + step as f64 * 0.3);
            assert!((last.delta_mm - 0.3).abs() < EPS);
        }
        assert!((last.total_mm - 301.5).abs() < EPS);
    }

    #[test]
    fn counter_reset_passes_through_as_negative_delta() {
        // A counter reset (battery swap) is below the spike threshold and is
        // deliberately not filtered; downstream consumers see the jump.
        let mut acc = RainAccumulator::default();
        acc.update(100.0);
        let reading = acc.update(3.0);
        assert!((reading.delta_mm - (-97.0)).abs() < EPS);
        assert!((reading.total_mm - 3.0).abs() < EPS);
    }
}
