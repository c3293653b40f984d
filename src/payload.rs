// src/payload.rs
//! Wire shape of the snapshot posted to the collector every tick.

use serde::{Deserialize, Serialize};

/// One tick's worth of metrics for a single profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Caller-supplied identifier of the monitored host/profile.
    pub profile_id: i64,
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub network: NetworkMetrics,
    /// Only present when a battery sensor was detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatteryMetrics>,
    pub storage: Storage,
    /// Top consumers by CPU usage, highest first.
    pub processes: Vec<ProcessInfo>,
}

impl Payload {
    /// Function to encode the payload as the JSON request body.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuMetrics {
    /// Utilization over the sampling window, 0-100.
    pub usage: f64,
    /// Physical core count, 1 when unknown.
    pub cores: usize,
    /// Logical CPU count, 1 when unknown.
    pub threads: usize,
    /// Current clock, e.g. "2400.00 MHz", or "Unknown".
    pub speed: String,
    pub model: String,
}

impl CpuMetrics {
    pub fn placeholder() -> Self {
        Self {
            usage: 0.0,
            cores: 1,
            threads: 1,
            speed: UNKNOWN.to_string(),
            model: DEFAULT_CPU_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetrics {
    pub used_percentage: f64,
    pub used: String,
    pub total: String,
}

impl MemoryMetrics {
    pub fn placeholder() -> Self {
        Self {
            used_percentage: 0.0,
            used: "0.00 GB".to_string(),
            total: "0.00 GB".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryStatus {
    Charging,
    Discharging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryMetrics {
    /// Charge level, 0-100.
    pub level: f64,
    pub status: BatteryStatus,
    /// "<n> minutes" or "Unknown".
    pub time_remaining: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStatus {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub status: LinkStatus,
    pub download: String,
    pub upload: String,
    /// Local address of the primary outbound route.
    pub ip: String,
    pub interfaces: Vec<InterfaceInfo>,
}

impl NetworkMetrics {
    /// Record reported whenever any part of the network sample fails.
    pub fn offline() -> Self {
        Self {
            status: LinkStatus::Offline,
            download: "0 KB/s".to_string(),
            upload: "0 KB/s".to_string(),
            ip: "127.0.0.1".to_string(),
            interfaces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub name: String,
    pub ip_address: String,
    pub netmask: String,
    /// Always "connected"; link state is not probed.
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    pub devices: Vec<StorageDevice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageDevice {
    pub name: String,
    pub mountpoint: String,
    #[serde(rename = "type")]
    pub fs_type: String,
    /// e.g. "465.63 GB Total"
    pub total_space: String,
    /// e.g. "120.02 GB Used"
    pub used_space: String,
    pub used_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_usage: f64,
    /// Resident memory, e.g. "84.12 MB".
    pub memory_usage: String,
}

pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_CPU_MODEL: &str = "CPU";
pub const INTERFACE_CONNECTED: &str = "connected";
