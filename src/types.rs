use std::fmt;
use std::time::Duration;

/// One probe result: a round-trip time in milliseconds, or no reply in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Valid(f64),
    Drop,
}

impl Sample {
    pub fn from_rtt(rtt: Duration) -> Self {
        Sample::Valid(rtt.as_secs_f64() * 1000.0)
    }

    pub fn latency(self) -> Option<f64> {
        match self {
            Sample::Valid(ms) => Some(ms),
            Sample::Drop => None,
        }
    }

    pub fn is_drop(self) -> bool {
        matches!(self, Sample::Drop)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sample::Valid(ms) => write!(f, "{ms:.3}ms"),
            Sample::Drop => write!(f, "drop"),
        }
    }
}
