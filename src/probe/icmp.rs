use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use surge_ping::{Client, Config as PingConfig, PingIdentifier, PingSequence, Pinger, SurgeError, ICMP};
use tracing::{debug, info};

use crate::config::PING_PAYLOAD_LEN;
use crate::error::{AppError, Result};
use crate::probe::Prober;
use crate::types::Sample;

/// ICMP echo prober for a single resolved target.
pub struct IcmpProber {
    // Dropping the client stops its receive task.
    _client: Client,
    pinger: Pinger,
    target: IpAddr,
    sequence: u16,
    payload: Vec<u8>,
}

impl IcmpProber {
    /// Resolve `host` and open an ICMP socket of the matching family.
    /// Each echo waits at most `timeout` for its reply.
    pub async fn connect(host: &str, timeout: Duration) -> Result<Self> {
        let target = resolve(host).await?;
        let kind = if target.is_ipv4() { ICMP::V4 } else { ICMP::V6 };
        let client = Client::new(&PingConfig::builder().kind(kind).build())?;

        let mut pinger = client
            .pinger(target, PingIdentifier(std::process::id() as u16))
            .await;
        pinger.timeout(timeout);

        info!(%target, host, timeout_ms = timeout.as_millis() as u64, "ICMP prober ready");
        Ok(Self {
            _client: client,
            pinger,
            target,
            sequence: 0,
            payload: vec![0u8; PING_PAYLOAD_LEN],
        })
    }

    pub fn target(&self) -> IpAddr {
        self.target
    }
}

impl Prober for IcmpProber {
    fn probe(&mut self) -> impl Future<Output = Result<Sample>> + Send {
        let seq = self.sequence;
        self.sequence = self.sequence.wrapping_add(1);
        async move {
            match self.pinger.ping(PingSequence(seq), &self.payload).await {
                Ok((_packet, rtt)) => Ok(Sample::from_rtt(rtt)),
                Err(SurgeError::Timeout { .. }) => {
                    debug!(seq, target = %self.target, "echo timed out");
                    Ok(Sample::Drop)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// IP literals are used as-is; names go through the system resolver and the
/// first address wins.
pub async fn resolve(host: &str) -> Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    let mut addrs = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|e| AppError::Resolve {
            host: host.to_string(),
            reason: e.to_string(),
        })?;
    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| AppError::Resolve {
            host: host.to_string(),
            reason: "no addresses found".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ip_literals_skip_the_resolver() {
        assert_eq!(resolve("127.0.0.1").await.unwrap(), IpAddr::from([127, 0, 0, 1]));
        assert_eq!(resolve("::1").await.unwrap(), "::1".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn localhost_resolves() {
        let ip = resolve("localhost").await.unwrap();
        assert!(ip.is_loopback());
    }

    #[tokio::test]
    async fn invalid_names_are_resolve_errors() {
        let err = resolve("no such host.invalid").await.unwrap_err();
        assert!(matches!(err, AppError::Resolve { .. }));
    }
}
