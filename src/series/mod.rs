pub mod pipeline;
pub mod range;
pub mod summarizer;
pub mod window;

pub use pipeline::{AggregationLevel, AggregationPipeline};
pub use range::RangeTracker;
pub use window::{tail_view, SampleWindow};
