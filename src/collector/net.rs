// src/collector/net.rs
//! Network throughput, outbound address and interface table.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};

use crate::collector::{InterfaceAddr, MetricsSource, NetCounters, ProbeError, Reading};
use crate::format::format_rate;
use crate::payload::{INTERFACE_CONNECTED, InterfaceInfo, LinkStatus, NetworkMetrics};

/// Counter reading tagged with the instant it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    pub counters: NetCounters,
    pub at: Instant,
}

impl CounterSample {
    pub fn now(counters: NetCounters) -> Self {
        Self {
            counters,
            at: Instant::now(),
        }
    }
}

/// Upload and download rates in bytes per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub upload: f64,
    pub download: f64,
}

/// Function to derive rates from two counter samples. The measured elapsed
/// time divides the delta, so a window stretched by scheduling still yields a
/// correct rate. Counter resets and a zero elapsed time give zero.
pub fn throughput(prior: &CounterSample, current: &CounterSample) -> Throughput {
    let elapsed = current.at.saturating_duration_since(prior.at).as_secs_f64();
    if elapsed <= 0.0 {
        return Throughput {
            upload: 0.0,
            download: 0.0,
        };
    }

    let sent = current
        .counters
        .bytes_sent
        .saturating_sub(prior.counters.bytes_sent);
    let recv = current
        .counters
        .bytes_recv
        .saturating_sub(prior.counters.bytes_recv);

    Throughput {
        upload: sent as f64 / elapsed,
        download: recv as f64 / elapsed,
    }
}

/// Samples the network family over a fixed window.
#[derive(Debug, Clone, Copy)]
pub struct NetworkProvider {
    window: Duration,
}

impl NetworkProvider {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Function to collect the network family. Any failure collapses the
    /// whole record to [`NetworkMetrics::offline`].
    pub async fn sample<S: MetricsSource + ?Sized>(&self, source: &mut S) -> Reading<NetworkMetrics> {
        match self.try_sample(source).await {
            Ok(metrics) => Reading::Fresh(metrics),
            Err(e) => Reading::degraded(NetworkMetrics::offline(), e),
        }
    }

    async fn try_sample<S: MetricsSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<NetworkMetrics, ProbeError> {
        let prior = CounterSample::now(source.net_counters()?);
        tokio::time::sleep(self.window).await;
        let current = CounterSample::now(source.net_counters()?);
        let rates = throughput(&prior, &current);

        let ip = source.outbound_ip()?;

        let addrs = source.interfaces()?;
        if addrs.is_empty() {
            return Err(ProbeError::Unavailable("network interfaces"));
        }

        Ok(NetworkMetrics {
            status: LinkStatus::Online,
            download: format_rate(rates.download),
            upload: format_rate(rates.upload),
            ip: ip.to_string(),
            interfaces: ipv4_interfaces(&addrs),
        })
    }
}

/// Function to build the interface table: IPv4 only, first address per
/// interface, in source order.
pub fn ipv4_interfaces(addrs: &[InterfaceAddr]) -> Vec<InterfaceInfo> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut interfaces = Vec::new();

    for iface in addrs {
        let IpAddr::V4(addr) = iface.addr else {
            continue;
        };
        if !seen.insert(&iface.name) {
            continue;
        }

        interfaces.push(InterfaceInfo {
            name: iface.name.clone(),
            ip_address: addr.to_string(),
            netmask: netmask(iface.prefix).to_string(),
            status: INTERFACE_CONNECTED.to_string(),
        });
    }

    interfaces
}

/// Function to turn a prefix length into a dotted IPv4 netmask.
pub fn netmask(prefix: u8) -> Ipv4Addr {
    let prefix = u32::from(prefix.min(32));
    let bits = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
    Ipv4Addr::from(bits)
}
