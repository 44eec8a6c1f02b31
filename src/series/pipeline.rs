use tracing::{debug, warn};

use crate::series::summarizer::{statistic_count, summarize};
use crate::series::window::SampleWindow;
use crate::types::Sample;

/// One resolution of the cascade: a summary per completed chunk of
/// `chunk_size` raw samples.
#[derive(Debug, Clone)]
pub struct AggregationLevel {
    pub index: usize,
    pub chunk_size: usize,
    /// `quantile_rows[r][c]` is the r-th order statistic of chunk `c`.
    quantile_rows: Vec<Vec<Sample>>,
    /// Drop count of each chunk.
    loss_row: Vec<usize>,
}

impl AggregationLevel {
    pub fn new(index: usize, chunk_size: usize) -> Self {
        Self {
            index,
            chunk_size,
            quantile_rows: vec![Vec::new(); statistic_count(chunk_size)],
            loss_row: Vec::new(),
        }
    }

    /// Statistic rows plus the loss row.
    #[cfg(test)]
    pub fn row_count(&self) -> usize {
        self.quantile_rows.len() + 1
    }

    pub fn quantile_rows(&self) -> &[Vec<Sample>] {
        &self.quantile_rows
    }

    pub fn loss_row(&self) -> &[usize] {
        &self.loss_row
    }

    /// Completed chunks so far.
    pub fn chunks(&self) -> usize {
        self.loss_row.len()
    }

    fn push_chunk(&mut self, chunk: &[Sample]) {
        let summary = summarize(chunk);
        for (row, value) in self.quantile_rows.iter_mut().zip(summary.quantiles) {
            row.push(value);
        }
        self.loss_row.push(summary.lost);
        debug!(
            level = self.index,
            chunk_size = self.chunk_size,
            lost = summary.lost,
            "level {} chunk #{} complete",
            self.index,
            self.chunks()
        );
    }
}

/// Cascading levels with chunk sizes `g, g^2, g^3, ...`, all cut from the raw
/// stream.
#[derive(Debug, Clone)]
pub struct AggregationPipeline {
    levels: Vec<AggregationLevel>,
}

impl AggregationPipeline {
    pub fn new(group_size: usize, levels: usize) -> Self {
        let mut chunk_size = 1usize;
        let levels = (0..levels)
            .map(|i| {
                chunk_size = chunk_size.saturating_mul(group_size);
                AggregationLevel::new(i, chunk_size)
            })
            .collect();
        Self { levels }
    }

    /// Run every level whose chunk boundary falls on `counter`, the number of
    /// raw samples ingested so far (this one included). A level is skipped
    /// while the window holds fewer samples than its chunk, so its rows
    /// always grow together.
    pub fn ingest(&mut self, counter: u64, window: &SampleWindow) {
        if window.is_empty() {
            return;
        }
        let mut chunk: Vec<Sample> = Vec::new();
        for level in &mut self.levels {
            if counter % level.chunk_size as u64 != 0 {
                continue;
            }
            if window.len() < level.chunk_size {
                warn!(
                    level = level.index,
                    chunk_size = level.chunk_size,
                    window = window.len(),
                    "window shorter than chunk, skipping level"
                );
                continue;
            }
            chunk.clear();
            chunk.extend(window.tail(level.chunk_size));
            level.push_chunk(&chunk);
        }
    }

    pub fn levels(&self) -> &[AggregationLevel] {
        &self.levels
    }

    /// Chunk size of the coarsest level; the raw window must hold at least
    /// this many samples.
    pub fn largest_chunk(&self) -> usize {
        self.levels.last().map_or(1, |l| l.chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(pipeline: &mut AggregationPipeline, window: &mut SampleWindow, n: u64) {
        for i in 1..=n {
            let sample = if i % 7 == 0 {
                Sample::Drop
            } else {
                Sample::Valid((i % 50) as f64 + 1.0)
            };
            window.append(sample);
            pipeline.ingest(i, window);
        }
    }

    #[test]
    fn chunk_sizes_multiply() {
        let p = AggregationPipeline::new(32, 3);
        let sizes: Vec<usize> = p.levels().iter().map(|l| l.chunk_size).collect();
        assert_eq!(sizes, vec![32, 1024, 32768]);
        assert_eq!(p.levels()[0].row_count(), 6);
        assert_eq!(p.levels()[1].row_count(), 11);
    }

    #[test]
    fn levels_fire_on_their_boundaries_only() {
        let mut p = AggregationPipeline::new(32, 2);
        let mut w = SampleWindow::new(1 << 20);

        feed(&mut p, &mut w, 31);
        assert_eq!(p.levels()[0].chunks(), 0);

        feed_from(&mut p, &mut w, 32, 1023);
        assert_eq!(p.levels()[0].chunks(), 31);
        assert_eq!(p.levels()[1].chunks(), 0);

        feed_from(&mut p, &mut w, 1024, 2048);
        assert_eq!(p.levels()[0].chunks(), 64);
        assert_eq!(p.levels()[1].chunks(), 2);
    }

    fn feed_from(p: &mut AggregationPipeline, w: &mut SampleWindow, from: u64, to: u64) {
        for i in from..=to {
            w.append(Sample::Valid(i as f64));
            p.ingest(i, w);
        }
    }

    #[test]
    fn rows_grow_in_lockstep() {
        let mut p = AggregationPipeline::new(4, 2);
        let mut w = SampleWindow::new(1024);
        feed(&mut p, &mut w, 100);
        for level in p.levels() {
            let chunks = level.chunks();
            assert!(level.quantile_rows().iter().all(|r| r.len() == chunks));
        }
        assert_eq!(p.levels()[0].chunks(), 25);
        assert_eq!(p.levels()[1].chunks(), 6);
    }

    #[test]
    fn loss_row_counts_drops_in_the_latest_chunk() {
        let mut p = AggregationPipeline::new(4, 1);
        let mut w = SampleWindow::new(64);
        let pattern = [
            Sample::Valid(1.0),
            Sample::Drop,
            Sample::Drop,
            Sample::Valid(2.0),
        ];
        for (i, s) in pattern.into_iter().enumerate() {
            w.append(s);
            p.ingest(i as u64 + 1, &w);
        }
        assert_eq!(p.levels()[0].loss_row(), &[2]);
        assert_eq!(
            p.levels()[0].quantile_rows()[0],
            vec![Sample::Drop],
            "lowest slot lands on a drop"
        );
    }

    fn assert_lockstep(p: &AggregationPipeline) {
        for level in p.levels() {
            let lens: Vec<usize> = level.quantile_rows().iter().map(Vec::len).collect();
            assert!(
                lens.iter().all(|&l| l == level.chunks()),
                "level {} rows out of step: {lens:?} vs {} chunks",
                level.index,
                level.chunks()
            );
        }
    }

    #[test]
    fn short_window_skips_level_instead_of_truncating_chunk() {
        let mut p = AggregationPipeline::new(4, 2);
        let mut w = SampleWindow::new(8);
        feed_from(&mut p, &mut w, 1, 16);
        assert_eq!(p.levels()[0].chunks(), 4);
        assert_eq!(p.levels()[1].chunks(), 0);
        assert_lockstep(&p);
    }

    #[test]
    fn window_capped_at_largest_chunk_keeps_rows_in_step() {
        let mut p = AggregationPipeline::new(4, 3);
        assert_eq!(p.largest_chunk(), 64);
        let mut w = SampleWindow::new(p.largest_chunk());
        feed(&mut p, &mut w, 64 * 5 + 3);
        assert_eq!(w.len(), 64);
        assert_eq!(p.levels()[0].chunks(), 80);
        assert_eq!(p.levels()[1].chunks(), 20);
        assert_eq!(p.levels()[2].chunks(), 5);
        assert_eq!(p.levels()[2].row_count(), 7);
        assert_lockstep(&p);
    }

    #[test]
    fn empty_window_is_ignored() {
        let mut p = AggregationPipeline::new(2, 1);
        let w = SampleWindow::new(8);
        p.ingest(2, &w);
        assert_eq!(p.levels()[0].chunks(), 0);
    }
}
