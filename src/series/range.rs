use crate::types::Sample;

/// Initial upper bound; keeps `min != max` meaningful before any reply.
pub const INITIAL_MAX_LATENCY: f64 = 0.001;

/// Widening min/max of every valid latency seen so far. Drops are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeTracker {
    min: f64,
    max: f64,
}

impl RangeTracker {
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: INITIAL_MAX_LATENCY,
        }
    }

    /// Fold one sample into the bounds. Returns true when either bound moved.
    pub fn observe(&mut self, sample: Sample) -> bool {
        let Sample::Valid(ms) = sample else {
            return false;
        };
        let mut changed = false;
        if ms < self.min {
            self.min = ms;
            changed = true;
        }
        if ms > self.max {
            self.max = ms;
            changed = true;
        }
        changed
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// True until there is a usable, non-empty logarithmic range.
    pub fn is_degenerate(&self) -> bool {
        !self.min.is_finite() || self.min == self.max
    }

    /// Latency at `ratio` along the log scale from min to max.
    pub fn log_interpolate(&self, ratio: f64) -> f64 {
        if self.is_degenerate() {
            return if self.min.is_finite() { self.min } else { self.max };
        }
        self.min * (ratio * (self.max / self.min).ln()).exp()
    }
}

impl Default for RangeTracker {
    fn default() -> Self {
        Self::new()
    }
}
