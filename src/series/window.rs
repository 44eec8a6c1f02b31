use std::collections::VecDeque;

use crate::types::Sample;

/// Append-only buffer of raw samples, capped at `max_len`.
///
/// Each append evicts at most one sample from the front, matching the
/// one-sample-per-tick ingestion rate.
#[derive(Debug)]
pub struct SampleWindow {
    samples: VecDeque<Sample>,
    max_len: usize,
}

impl SampleWindow {
    pub fn new(max_len: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            max_len: max_len.max(1),
        }
    }

    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        if self.samples.len() > self.max_len {
            self.samples.pop_front();
        }
    }

    /// The last `min(n, len)` samples, oldest first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = Sample> + '_ {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.iter().skip(skip).copied()
    }

    pub fn tail_vec(&self, n: usize) -> Vec<Sample> {
        self.tail(n).collect()
    }

    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len.max(1);
    }

    #[cfg(test)]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Right-aligned view of the last `width` entries. Shorter streams are
/// returned whole, never padded.
pub fn tail_view<T>(stream: &[T], width: usize) -> &[T] {
    &stream[stream.len().saturating_sub(width)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: f64) -> Sample {
        Sample::Valid(v)
    }

    #[test]
    fn append_evicts_oldest_once_full() {
        let mut w = SampleWindow::new(3);
        for v in 1..=4 {
            w.append(ms(v as f64));
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.tail_vec(10), vec![ms(2.0), ms(3.0), ms(4.0)]);
    }

    #[test]
    fn shrinking_cap_drops_one_per_append() {
        let mut w = SampleWindow::new(10);
        for v in 0..10 {
            w.append(ms(v as f64));
        }
        w.set_max_len(5);
        w.append(ms(10.0));
        assert_eq!(w.len(), 10);
        assert_eq!(w.tail_vec(1), vec![ms(10.0)]);
    }

    #[test]
    fn tail_returns_last_n_in_order() {
        let mut w = SampleWindow::new(100);
        w.append(ms(1.0));
        w.append(Sample::Drop);
        w.append(ms(3.0));
        assert_eq!(w.tail_vec(2), vec![Sample::Drop, ms(3.0)]);
        assert_eq!(w.tail_vec(0), Vec::<Sample>::new());
    }

    #[test]
    fn tail_view_does_not_pad_short_streams() {
        let stream: Vec<u32> = (0..50).collect();
        assert_eq!(tail_view(&stream, 80), &stream[..]);
    }

    #[test]
    fn tail_view_keeps_last_width_entries() {
        let stream: Vec<u32> = (0..200).collect();
        let view = tail_view(&stream, 80);
        assert_eq!(view.len(), 80);
        assert_eq!(view[0], 120);
        assert_eq!(view[79], 199);
    }
}
