//! Latency to color mapping along a fixed multi-stop gradient.
//!
//! Positions are logarithmic in latency: every doubling moves the same
//! distance along the gradient, whatever the absolute magnitude.

use crate::series::RangeTracker;
use crate::types::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> Self {
        ratatui::style::Color::Rgb(c.0, c.1, c.2)
    }
}

/// Background for drops, kept out of the gradient palette.
pub const DROP_COLOR: Rgb = Rgb(0x60, 0x00, 0x60);

/// Used for every value while no latency range exists yet.
pub const DEFAULT_COLOR: Rgb = Rgb(0x00, 0xFF, 0x00);

/// Turbo-like ramp, fast (blue) to slow (dark red).
pub const GRADIENT: [Rgb; 8] = [
    Rgb(0x46, 0x6b, 0xe3),
    Rgb(0x29, 0xbb, 0xec),
    Rgb(0x31, 0xf1, 0x99),
    Rgb(0xa3, 0xfd, 0x3d),
    Rgb(0xed, 0xd0, 0x3a),
    Rgb(0xfb, 0x80, 0x22),
    Rgb(0xd2, 0x31, 0x05),
    Rgb(0x7a, 0x04, 0x03),
];

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let v = a as f64 + t * (b as f64 - a as f64);
    v.round().clamp(0.0, 255.0) as u8
}

pub fn lerp_color(a: Rgb, b: Rgb, t: f64) -> Rgb {
    Rgb(
        lerp_channel(a.0, b.0, t),
        lerp_channel(a.1, b.1, t),
        lerp_channel(a.2, b.2, t),
    )
}

/// Color at `ratio` along `stops`. Ratios outside (0, 1), NaN included, snap
/// to the nearest end stop.
pub fn gradient_color(stops: &[Rgb], ratio: f64) -> Rgb {
    debug_assert!(stops.len() >= 2);
    let last = stops.len() - 1;
    if ratio.is_nan() || ratio <= 0.0 {
        return stops[0];
    }
    if ratio >= 1.0 {
        return stops[last];
    }
    let scaled = ratio * last as f64;
    let index = (scaled as usize).min(last - 1);
    let t = scaled - index as f64;
    lerp_color(stops[index], stops[index + 1], t)
}

/// Maps samples to colors against a snapshot of the observed range.
#[derive(Debug, Clone, Copy)]
pub struct ColorMapper {
    range: RangeTracker,
}

impl ColorMapper {
    pub fn new(range: RangeTracker) -> Self {
        Self { range }
    }

    pub fn color_for(&self, sample: Sample) -> Rgb {
        match sample {
            Sample::Drop => DROP_COLOR,
            Sample::Valid(ms) => self.latency_color(ms),
        }
    }

    pub fn latency_color(&self, ms: f64) -> Rgb {
        if self.range.is_degenerate() {
            return DEFAULT_COLOR;
        }
        let (min, max) = self.range.bounds();
        let ratio = (ms / min).ln() / (max / min).ln();
        gradient_color(&GRADIENT, ratio)
    }
}
