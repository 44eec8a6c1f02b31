use tracing::{debug, info};

use crate::color::ColorMapper;
use crate::config::{Config, INITIAL_VIEW_WIDTH, LEGEND_STEPS, WINDOW_LENGTH_FACTOR};
use crate::legend::{Legend, LegendGrid};
use crate::series::{AggregationPipeline, RangeTracker, SampleWindow};
use crate::state::session::SessionStats;
use crate::types::Sample;

/// Everything accumulated from the probe stream. Owned by the UI loop and
/// mutated only through [`LatencyState::ingest`], one sample at a time.
#[derive(Debug)]
pub struct LatencyState {
    window: SampleWindow,
    range: RangeTracker,
    pipeline: AggregationPipeline,
    session: SessionStats,
    legend: Legend,
    /// Samples ingested so far.
    counter: u64,
    /// Set once the first reply arrives.
    initialized: bool,
    /// Bounds changed since the legend was last built.
    legend_dirty: bool,
    view_width: usize,
}

impl LatencyState {
    pub fn new(group_size: usize, levels: usize) -> Self {
        let pipeline = AggregationPipeline::new(group_size, levels);
        Self {
            window: SampleWindow::new(window_cap(INITIAL_VIEW_WIDTH, &pipeline)),
            range: RangeTracker::new(),
            pipeline,
            session: SessionStats::new(),
            legend: Legend::default(),
            counter: 0,
            initialized: false,
            legend_dirty: true,
            view_width: INITIAL_VIEW_WIDTH,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.group_size, cfg.levels)
    }

    pub fn ingest(&mut self, sample: Sample) {
        self.window.append(sample);
        if self.range.observe(sample) {
            let (min, max) = self.range.bounds();
            info!(min_ms = min, max_ms = max, "latency range widened to {min:.3}..{max:.3} ms");
            self.legend_dirty = true;
        }
        if !sample.is_drop() {
            self.initialized = true;
        }
        self.counter += 1;
        self.pipeline.ingest(self.counter, &self.window);
        self.session.record(sample);
        debug!(counter = self.counter, %sample, "sample ingested");
    }

    pub fn set_view_width(&mut self, width: usize) {
        let width = width.max(1);
        if width != self.view_width {
            debug!(width, "view width changed");
        }
        self.view_width = width;
        self.window.set_max_len(window_cap(width, &self.pipeline));
    }

    /// Legend grid for the current bounds and width, rebuilt when stale.
    pub fn legend_grid(&mut self) -> &LegendGrid {
        if self.legend_dirty {
            self.legend.rebuild(&self.range, LEGEND_STEPS);
            self.legend_dirty = false;
        }
        self.legend.grid(self.view_width)
    }

    pub fn mapper(&self) -> ColorMapper {
        ColorMapper::new(self.range)
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    #[cfg(test)]
    pub fn range(&self) -> &RangeTracker {
        &self.range
    }

    pub fn pipeline(&self) -> &AggregationPipeline {
        &self.pipeline
    }

    pub fn session(&self) -> &SessionStats {
        &self.session
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[cfg(test)]
    pub fn legend_dirty(&self) -> bool {
        self.legend_dirty
    }

    pub fn view_width(&self) -> usize {
        self.view_width
    }
}

/// Raw samples kept for a view `width` columns wide. Never below the
/// coarsest chunk, or that level could not fill a chunk.
fn window_cap(width: usize, pipeline: &AggregationPipeline) -> usize {
    width
        .saturating_mul(WINDOW_LENGTH_FACTOR)
        .max(pipeline.largest_chunk())
}
