pub mod icmp;

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::error::Result;
use crate::types::Sample;

pub use icmp::IcmpProber;

/// Produces one latency sample per call. `Ok(Sample::Drop)` means no reply
/// in time; `Err` is fatal for the whole session.
pub trait Prober: Send + 'static {
    fn probe(&mut self) -> impl Future<Output = Result<Sample>> + Send;
}

/// Drives a [`Prober`] once per tick and forwards the results, in order, to
/// the single consumer of the aggregation state.
pub struct ProbeRunner<P: Prober> {
    prober: P,
    tick: Duration,
    sample_tx: mpsc::Sender<Result<Sample>>,
}

impl<P: Prober> ProbeRunner<P> {
    pub fn new(prober: P, tick: Duration, sample_tx: mpsc::Sender<Result<Sample>>) -> Self {
        Self {
            prober,
            tick,
            sample_tx,
        }
    }

    /// Runs until a probe fails or the receiver goes away.
    pub async fn run(mut self) {
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("probe loop started, tick {}ms", self.tick.as_millis());

        loop {
            ticker.tick().await;
            let result = self.prober.probe().await;
            let fatal = result.is_err();
            match &result {
                Ok(sample) => debug!(%sample, "probe result"),
                Err(e) => error!("probe failed: {e}"),
            }
            if self.sample_tx.send(result).await.is_err() {
                debug!("sample receiver dropped, stopping probe loop");
                return;
            }
            if fatal {
                return;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::*;
    use crate::error::AppError;

    /// Replays a fixed script of results, then keeps reporting drops.
    pub struct ScriptedProber {
        script: VecDeque<Result<Sample>>,
    }

    impl ScriptedProber {
        pub fn new(script: Vec<Result<Sample>>) -> Self {
            Self {
                script: script.into(),
            }
        }

        pub fn fatal(reason: &str) -> Result<Sample> {
            Err(AppError::Config(reason.to_string()))
        }
    }

    impl Prober for ScriptedProber {
        fn probe(&mut self) -> impl Future<Output = Result<Sample>> + Send {
            let next = self.script.pop_front().unwrap_or(Ok(Sample::Drop));
            async move { next }
        }
    }
}
