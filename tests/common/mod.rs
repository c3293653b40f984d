#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::Value;
use tokio::sync::Mutex;

use tinypulse::SamplingConfig;
use tinypulse::collector::{
    BatterySample, CpuIdentity, CpuSample, DiskUsage, InterfaceAddr, MemorySample, MetricsSource,
    NetCounters, Partition, ProbeError, ProcessSample,
};

/// Scripted metrics source. A `None` field makes the matching read fail.
#[derive(Debug, Clone)]
pub struct FakeSource {
    pub cpu: Option<CpuSample>,
    pub identity: CpuIdentity,
    pub memory: Option<MemorySample>,
    pub battery: Option<Option<BatterySample>>,
    pub counters: Option<NetCounters>,
    pub interfaces: Option<Vec<InterfaceAddr>>,
    pub outbound_ip: Option<IpAddr>,
    pub partitions: Option<Vec<Partition>>,
    /// Usage per partition, matched by mountpoint; missing entries fail.
    pub usage: Vec<(PathBuf, DiskUsage)>,
    pub processes: Option<Vec<ProcessSample>>,
    pub cpu_windows: usize,
}

impl FakeSource {
    /// A healthy laptop-like host.
    pub fn healthy() -> Self {
        Self {
            cpu: Some(CpuSample {
                usage: 45.3,
                physical_cores: Some(4),
                logical_cpus: Some(8),
            }),
            identity: CpuIdentity {
                model: Some("Intel(R) Core(TM) i7-8550U CPU @ 1.80GHz".to_string()),
                frequency_mhz: Some(1800),
            },
            memory: Some(MemorySample {
                total: 16 * 1024 * 1024 * 1024,
                used: 4 * 1024 * 1024 * 1024,
            }),
            battery: Some(Some(BatterySample {
                percent: 87.0,
                power_plugged: false,
                secs_left: Some(7260),
            })),
            counters: Some(NetCounters {
                bytes_sent: 1_000,
                bytes_recv: 5_000,
            }),
            interfaces: Some(vec![
                iface("eth0", IpAddr::V6(Ipv6Addr::LOCALHOST), 64),
                iface("eth0", IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20)), 24),
                iface("eth0", IpAddr::V4(Ipv4Addr::new(192, 168, 1, 21)), 24),
                iface("lo", IpAddr::V4(Ipv4Addr::LOCALHOST), 8),
            ]),
            outbound_ip: Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20))),
            partitions: Some(vec![
                partition("/dev/sda1", "/", "ext4"),
                partition("/dev/sda2", "/home", "ext4"),
            ]),
            usage: vec![
                (PathBuf::from("/"), gib_usage(100, 25)),
                (PathBuf::from("/home"), gib_usage(400, 100)),
            ],
            processes: Some(
                (1..=15)
                    .map(|pid| process(pid, &format!("proc{pid}"), pid as f32 * 1.5))
                    .collect(),
            ),
            cpu_windows: 0,
        }
    }

    /// A host where every read fails.
    pub fn broken() -> Self {
        Self {
            cpu: None,
            identity: CpuIdentity::default(),
            memory: None,
            battery: None,
            counters: None,
            interfaces: None,
            outbound_ip: None,
            partitions: None,
            usage: Vec::new(),
            processes: None,
            cpu_windows: 0,
        }
    }
}

impl MetricsSource for FakeSource {
    fn begin_cpu_window(&mut self) {
        self.cpu_windows += 1;
    }

    fn cpu(&mut self) -> Result<CpuSample, ProbeError> {
        self.cpu.clone().ok_or(ProbeError::Unavailable("cpu usage"))
    }

    fn cpu_identity(&mut self) -> CpuIdentity {
        self.identity.clone()
    }

    fn memory(&mut self) -> Result<MemorySample, ProbeError> {
        self.memory.ok_or(ProbeError::Unavailable("memory"))
    }

    fn battery(&mut self) -> Result<Option<BatterySample>, ProbeError> {
        self.battery.clone().ok_or(ProbeError::Unavailable("battery"))
    }

    fn net_counters(&mut self) -> Result<NetCounters, ProbeError> {
        self.counters.ok_or(ProbeError::Unavailable("network counters"))
    }

    fn interfaces(&mut self) -> Result<Vec<InterfaceAddr>, ProbeError> {
        self.interfaces
            .clone()
            .ok_or(ProbeError::Unavailable("network interfaces"))
    }

    fn outbound_ip(&mut self) -> Result<IpAddr, ProbeError> {
        self.outbound_ip.ok_or_else(|| {
            ProbeError::NoRoute(std::io::Error::new(
                std::io::ErrorKind::NetworkUnreachable,
                "network is unreachable",
            ))
        })
    }

    fn partitions(&mut self) -> Result<Vec<Partition>, ProbeError> {
        self.partitions
            .clone()
            .ok_or(ProbeError::Unavailable("partitions"))
    }

    fn disk_usage(&mut self, partition: &Partition) -> Result<DiskUsage, ProbeError> {
        self.usage
            .iter()
            .find(|(mount, _)| *mount == partition.mountpoint)
            .map(|(_, usage)| *usage)
            .ok_or(ProbeError::Unavailable("disk usage"))
    }

    fn processes(&mut self) -> Result<Vec<ProcessSample>, ProbeError> {
        self.processes
            .clone()
            .ok_or(ProbeError::Unavailable("processes"))
    }
}

pub fn iface(name: &str, addr: IpAddr, prefix: u8) -> InterfaceAddr {
    InterfaceAddr {
        name: name.to_string(),
        addr,
        prefix,
    }
}

pub fn partition(device: &str, mountpoint: &str, fs_type: &str) -> Partition {
    Partition {
        device: device.to_string(),
        mountpoint: PathBuf::from(mountpoint),
        fs_type: fs_type.to_string(),
    }
}

pub fn gib_usage(total: u64, used: u64) -> DiskUsage {
    const GIB: u64 = 1024 * 1024 * 1024;
    DiskUsage {
        total: total * GIB,
        used: used * GIB,
    }
}

pub fn process(pid: u32, name: &str, cpu_percent: f32) -> ProcessSample {
    ProcessSample {
        pid,
        name: name.to_string(),
        cpu_percent,
        rss: 64 * 1024 * 1024,
    }
}

/// Sampling windows short enough for tests.
pub fn instant_sampling() -> SamplingConfig {
    SamplingConfig {
        cpu_window: Duration::from_millis(1),
        net_window: Duration::from_millis(1),
    }
}

/// Bodies received by a [`spawn_collector`] stub.
pub type Received = Arc<Mutex<Vec<Value>>>;

/// Function to start an in-process collector on a random port that answers
/// every POST /api/metrics with `status`. Returns the base URL.
pub async fn spawn_collector(status: StatusCode) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let state = received.clone();

    let app = Router::new().route(
        "/api/metrics",
        post(move |Json(body): Json<Value>| {
            let state = state.clone();
            async move {
                state.lock().await.push(body);
                (status, "collector says no")
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), received)
}

/// Function to find a local port with nothing listening on it.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
