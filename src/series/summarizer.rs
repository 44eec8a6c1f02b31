//! Order-statistic downsampling of a chunk of raw samples.
//!
//! A chunk of `n` samples is reduced to `round(log2(n))` evenly spaced order
//! statistics plus the number of drops. Drops take the lowest positions of
//! the ordered chunk, so a statistic slot that lands on one reports
//! `Sample::Drop` instead of a latency.

use crate::types::Sample;

/// Summary of one completed chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSummary {
    /// Order statistics, lowest first.
    pub quantiles: Vec<Sample>,
    /// Drops in the chunk.
    pub lost: usize,
}

impl ChunkSummary {
    /// Statistic slots plus the trailing drop count.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.quantiles.len() + 1
    }
}

/// Number of order statistics kept for a chunk of `n` samples (never zero).
pub fn statistic_count(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    ((n as f64).log2().round() as usize).max(1)
}

pub fn summarize(chunk: &[Sample]) -> ChunkSummary {
    let mut valid: Vec<f64> = chunk.iter().filter_map(|s| s.latency()).collect();
    let lost = chunk.len() - valid.len();
    valid.sort_by(|a, b| a.total_cmp(b));

    let n = chunk.len();
    if n == 0 {
        return ChunkSummary {
            quantiles: vec![Sample::Drop],
            lost: 0,
        };
    }

    // Position `i` of the ordered chunk: drops first, then ascending latency.
    let at = |i: usize| {
        if i < lost {
            Sample::Drop
        } else {
            Sample::Valid(valid[i - lost])
        }
    };

    let samples = statistic_count(n);
    let quantiles = if samples == 1 {
        vec![at((n - 1) / 2)]
    } else {
        let step = (samples - 1) as f64 / (n - 1) as f64;
        (0..samples)
            .map(|k| {
                let idx = (k as f64 / step).round() as usize;
                at(idx.min(n - 1))
            })
            .collect()
    };

    ChunkSummary { quantiles, lost }
}
