//! Whole-session latency summary for the header line.

use hdrhistogram::Histogram;

use crate::types::Sample;

/// Probes sent, replies lost and a histogram of reply latencies.
/// Latencies are stored in microseconds.
#[derive(Debug)]
pub struct SessionStats {
    histogram: Histogram<u64>,
    sent: u64,
    lost: u64,
}

impl SessionStats {
    /// Tracks 1us to 100s, 3 significant figures.
    pub fn new() -> Self {
        let histogram =
            Histogram::new_with_bounds(1, 100_000_000, 3).expect("valid histogram bounds");
        Self {
            histogram,
            sent: 0,
            lost: 0,
        }
    }

    pub fn record(&mut self, sample: Sample) {
        self.sent += 1;
        match sample {
            Sample::Valid(ms) => {
                let us = (ms * 1000.0).round().max(1.0) as u64;
                self.histogram.saturating_record(us);
            }
            Sample::Drop => self.lost += 1,
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn lost(&self) -> u64 {
        self.lost
    }

    /// Percentage of probes without a reply. Zero before the first probe.
    pub fn loss_percent(&self) -> f64 {
        if self.sent == 0 {
            0.0
        } else {
            self.lost as f64 * 100.0 / self.sent as f64
        }
    }

    /// Return (p50_ms, p95_ms, p99_ms). None if no replies yet.
    pub fn percentiles(&self) -> Option<(f64, f64, f64)> {
        if self.histogram.len() == 0 {
            return None;
        }
        let ms = |q: f64| self.histogram.value_at_quantile(q) as f64 / 1000.0;
        Some((ms(0.5), ms(0.95), ms(0.99)))
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}
