// src/collector/mod.rs
//! Metric providers and the OS source they read from.
//!
//! Every provider reads through [`MetricsSource`] and returns a [`Reading`],
//! so a family that cannot be read degrades to a placeholder instead of
//! failing the whole snapshot.

pub mod battery;
pub mod cpu;
pub mod disk;
pub mod memory;
pub mod net;
pub mod platform;
pub mod process;
pub mod sys;

use std::fmt;
use std::io;
use std::net::IpAddr;
use std::path::PathBuf;

use thiserror::Error;

pub use battery::collect_battery;
pub use cpu::CpuProvider;
pub use disk::collect_storage;
pub use memory::collect_memory;
pub use net::{CounterSample, NetworkProvider, throughput};
pub use platform::Platform;
pub use process::{TOP_PROCESSES, collect_processes};
pub use sys::{HostProfile, SysinfoSource};

/// Errors raised while reading a single metric family.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0} is not available")]
    Unavailable(&'static str),

    #[error("no network route: {0}")]
    NoRoute(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Outcome of one provider: either a fresh value or a placeholder with the
/// reason the real value could not be read.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    Fresh(T),
    Degraded { value: T, reason: String },
}

impl<T> Reading<T> {
    pub fn degraded(value: T, reason: impl fmt::Display) -> Self {
        Reading::Degraded {
            value,
            reason: reason.to_string(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Reading::Degraded { .. })
    }

    pub fn value(&self) -> &T {
        match self {
            Reading::Fresh(value) | Reading::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Reading::Fresh(value) | Reading::Degraded { value, .. } => value,
        }
    }
}

/// Raw CPU utilization and topology.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuSample {
    /// Global utilization since the window was opened, 0-100.
    pub usage: f32,
    pub physical_cores: Option<usize>,
    pub logical_cpus: Option<usize>,
}

/// Best-effort descriptive CPU data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuIdentity {
    pub model: Option<String>,
    pub frequency_mhz: Option<u64>,
}

/// Virtual memory counters in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySample {
    pub total: u64,
    pub used: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatterySample {
    /// Charge level, 0-100.
    pub percent: f64,
    pub power_plugged: bool,
    /// None when the remaining time is unknown or unlimited.
    pub secs_left: Option<u64>,
}

/// Cumulative byte counters summed over all interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// One address assigned to an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub name: String,
    pub addr: IpAddr,
    pub prefix: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub device: String,
    pub mountpoint: PathBuf,
    pub fs_type: String,
}

/// Space accounting for one mounted filesystem, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    /// Resident set size in bytes.
    pub rss: u64,
}

/// Access to the OS counters every provider reads from.
///
/// The production implementation is [`SysinfoSource`]; tests drive the
/// providers with scripted sources.
pub trait MetricsSource: Send {
    /// Opens a CPU sampling window. CPU and per-process usage reported by
    /// [`MetricsSource::cpu`] and [`MetricsSource::processes`] cover the time
    /// since the last call.
    fn begin_cpu_window(&mut self);

    fn cpu(&mut self) -> Result<CpuSample, ProbeError>;

    /// Model and clock lookups. Never fails; unknown fields stay `None`.
    fn cpu_identity(&mut self) -> CpuIdentity;

    fn memory(&mut self) -> Result<MemorySample, ProbeError>;

    /// `Ok(None)` when the host has no battery.
    fn battery(&mut self) -> Result<Option<BatterySample>, ProbeError>;

    fn net_counters(&mut self) -> Result<NetCounters, ProbeError>;

    fn interfaces(&mut self) -> Result<Vec<InterfaceAddr>, ProbeError>;

    /// Local address the OS would use to reach the outside world.
    fn outbound_ip(&mut self) -> Result<IpAddr, ProbeError>;

    fn partitions(&mut self) -> Result<Vec<Partition>, ProbeError>;

    fn disk_usage(&mut self, partition: &Partition) -> Result<DiskUsage, ProbeError>;

    fn processes(&mut self) -> Result<Vec<ProcessSample>, ProbeError>;
}
