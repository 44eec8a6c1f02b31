//! Latency legend: log-spaced sample latencies laid out in a column-major grid
//! that reflows to the terminal width.

use crate::color::{ColorMapper, Rgb};
use crate::series::RangeTracker;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub color: Rgb,
    pub label: String,
    /// Rendered width of the unpadded entry: glyph, space, label, space.
    pub width: usize,
}

pub fn format_latency_label(ms: f64) -> String {
    if ms >= 100.0 {
        format!("{ms:.0}")
    } else {
        format!("{ms:.1}")
    }
}

/// Entries for `steps` latencies evenly spaced on a log scale between the
/// current bounds. Rebuild whenever the bounds change.
pub fn build_entries(range: &RangeTracker, steps: usize) -> Vec<LegendEntry> {
    let mapper = ColorMapper::new(*range);
    let last = steps.saturating_sub(1).max(1) as f64;
    (0..steps)
        .map(|i| {
            let latency = range.log_interpolate(i as f64 / last);
            let label = format_latency_label(latency);
            let width = 3 + label.chars().count();
            LegendEntry {
                color: mapper.latency_color(latency),
                label,
                width,
            }
        })
        .collect()
}

/// Column-major placement of legend entries. Every cell is padded to
/// `cell_width` so columns line up.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendGrid {
    pub columns: Vec<Vec<LegendEntry>>,
    pub rows: usize,
    pub cell_width: usize,
}

impl LegendGrid {
    pub fn layout(entries: &[LegendEntry], available_width: usize) -> Self {
        let cell_width = entries.iter().map(|e| e.width).max().unwrap_or(1).max(1);
        if entries.is_empty() {
            return Self {
                columns: Vec::new(),
                rows: 0,
                cell_width,
            };
        }
        let max_columns = (available_width / cell_width).max(1);
        let rows = entries.len().div_ceil(max_columns);
        let columns = entries.chunks(rows).map(|c| c.to_vec()).collect();
        Self {
            columns,
            rows,
            cell_width,
        }
    }

    pub fn entry_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn total_width(&self) -> usize {
        self.columns.len() * self.cell_width
    }

    /// Entries on grid row `row`, left to right. The last column may be short.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &LegendEntry> + '_ {
        self.columns.iter().filter_map(move |c| c.get(row))
    }
}

/// Cached legend entries and layout, rebuilt lazily.
#[derive(Debug, Default)]
pub struct Legend {
    entries: Vec<LegendEntry>,
    grid: Option<LegendGrid>,
    laid_out_width: usize,
}

impl Legend {
    pub fn rebuild(&mut self, range: &RangeTracker, steps: usize) {
        self.entries = build_entries(range, steps);
        self.grid = None;
    }

    pub fn grid(&mut self, available_width: usize) -> &LegendGrid {
        if self.grid.is_none() || self.laid_out_width != available_width {
            self.laid_out_width = available_width;
            self.grid = Some(LegendGrid::layout(&self.entries, available_width));
        }
        self.grid.get_or_insert_with(|| LegendGrid::layout(&[], available_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::GRADIENT;
    use crate::types::Sample;

    fn range(values: &[f64]) -> RangeTracker {
        let mut r = RangeTracker::new();
        for v in values {
            r.observe(Sample::Valid(*v));
        }
        r
    }

    #[test]
    fn labels_switch_precision_at_100ms() {
        assert_eq!(format_latency_label(9.87), "9.9");
        assert_eq!(format_latency_label(99.9), "99.9");
        assert_eq!(format_latency_label(100.0), "100");
        assert_eq!(format_latency_label(1234.4), "1234");
    }

    #[test]
    fn entries_span_the_range_log_evenly() {
        let entries = build_entries(&range(&[1.0, 1000.0]), 4);
        for (entry, want) in entries.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
            let got: f64 = entry.label.parse().unwrap();
            assert!((got - want).abs() / want < 0.01, "{got} != {want}");
        }
        assert_eq!(entries[0].color, GRADIENT[0]);
        assert_eq!(entries[3].color, GRADIENT[7]);
        assert_eq!(entries[0].label, "1.0");
        assert_eq!(entries[0].width, 6);
        assert_eq!(entries[3].width, 7);
    }

    #[test]
    fn grid_never_exceeds_available_width() {
        let entries = build_entries(&range(&[0.4, 2500.0]), 90);
        for width in [8, 20, 37, 80, 81, 133, 400] {
            let grid = LegendGrid::layout(&entries, width);
            assert!(grid.total_width() <= width, "width {width}");
            assert_eq!(grid.entry_count(), 90);
        }
    }

    #[test]
    fn grid_is_column_major() {
        let entries = build_entries(&range(&[1.0, 50.0]), 10);
        let width = entries.iter().map(|e| e.width).max().unwrap() * 3;
        let grid = LegendGrid::layout(&entries, width);
        assert_eq!(grid.rows, 4);
        assert_eq!(grid.columns.len(), 3);
        assert_eq!(grid.columns[0][1], entries[1]);
        assert_eq!(grid.columns[1][0], entries[4]);
        assert_eq!(grid.columns[2].len(), 2);
        let second_row: Vec<_> = grid.row(1).cloned().collect();
        assert_eq!(second_row, vec![entries[1].clone(), entries[5].clone(), entries[9].clone()]);
    }

    #[test]
    fn narrow_terminal_falls_back_to_one_column() {
        let entries = build_entries(&range(&[1.0, 50.0]), 5);
        let grid = LegendGrid::layout(&entries, 2);
        assert_eq!(grid.columns.len(), 1);
        assert_eq!(grid.rows, 5);
    }

    #[test]
    fn legend_relayouts_on_width_change_only() {
        let mut legend = Legend::default();
        legend.rebuild(&range(&[1.0, 50.0]), 12);
        let wide = legend.grid(200).clone();
        assert_eq!(legend.grid(200), &wide);
        let narrow = legend.grid(10).clone();
        assert!(narrow.columns.len() < wide.columns.len());
        assert_eq!(narrow.entry_count(), 12);
    }

    #[test]
    fn degenerate_range_still_yields_all_entries() {
        let entries = build_entries(&RangeTracker::new(), 90);
        assert_eq!(entries.len(), 90);
        assert!(entries
            .iter()
            .all(|e| e.label.parse::<f64>().is_ok_and(f64::is_finite)));
    }
}
