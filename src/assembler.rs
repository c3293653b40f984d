// src/assembler.rs
//! Builds one payload per tick out of every metric provider.

use std::fmt;

use tracing::{debug, warn};

use crate::collector::{
    CpuProvider, MetricsSource, NetworkProvider, Reading, collect_battery, collect_memory,
    collect_processes, collect_storage,
};
use crate::config::SamplingConfig;
use crate::payload::Payload;

/// Metric families carried in a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFamily {
    Cpu,
    Memory,
    Battery,
    Network,
    Storage,
    Processes,
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricFamily::Cpu => "cpu",
            MetricFamily::Memory => "memory",
            MetricFamily::Battery => "battery",
            MetricFamily::Network => "network",
            MetricFamily::Storage => "storage",
            MetricFamily::Processes => "processes",
        };
        f.write_str(name)
    }
}

/// A finished payload and the families that fell back to placeholders.
#[derive(Debug, Clone)]
pub struct Collection {
    pub payload: Payload,
    pub degraded: Vec<MetricFamily>,
}

impl Collection {
    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }
}

/// Owns the metrics source and runs every provider against it.
pub struct Assembler<S> {
    source: S,
    cpu: CpuProvider,
    network: NetworkProvider,
    profile_id: i64,
}

impl<S: MetricsSource> Assembler<S> {
    pub fn new(source: S, sampling: SamplingConfig, profile_id: i64) -> Self {
        Self {
            source,
            cpu: CpuProvider::new(sampling.cpu_window),
            network: NetworkProvider::new(sampling.net_window),
            profile_id,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Function to collect every family once. Never fails: a family that
    /// cannot be read is replaced by its placeholder, battery is dropped.
    ///
    /// Processes are read right after the CPU window so their usage covers
    /// the same interval.
    pub async fn assemble(&mut self) -> Collection {
        let mut degraded = Vec::new();

        let cpu = self.cpu.sample(&mut self.source).await;
        let cpu = settle(MetricFamily::Cpu, cpu, &mut degraded);

        let processes = collect_processes(&mut self.source);
        let processes = settle(MetricFamily::Processes, processes, &mut degraded);

        let memory = collect_memory(&mut self.source);
        let memory = settle(MetricFamily::Memory, memory, &mut degraded);

        let battery = collect_battery(&mut self.source);
        let battery = settle(MetricFamily::Battery, battery, &mut degraded);

        let network = self.network.sample(&mut self.source).await;
        let network = settle(MetricFamily::Network, network, &mut degraded);

        let storage = collect_storage(&mut self.source);
        let storage = settle(MetricFamily::Storage, storage, &mut degraded);

        debug!(
            processes = processes.len(),
            devices = storage.devices.len(),
            battery = battery.is_some(),
            "snapshot assembled"
        );

        Collection {
            payload: Payload {
                profile_id: self.profile_id,
                cpu,
                memory,
                network,
                battery,
                storage,
                processes,
            },
            degraded,
        }
    }
}

fn settle<T>(family: MetricFamily, reading: Reading<T>, degraded: &mut Vec<MetricFamily>) -> T {
    if let Reading::Degraded { reason, .. } = &reading {
        warn!(%family, %reason, "metric family degraded to placeholder");
        degraded.push(family);
    }
    reading.into_value()
}
