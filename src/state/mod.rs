pub mod latency_state;
pub mod session;

pub use latency_state::LatencyState;
pub use session::SessionStats;
