// src/collector/sys.rs
//! sysinfo-backed metrics source and host profile.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::path::PathBuf;

use sysinfo::{Disks, Networks, ProcessesToUpdate, System};

use crate::collector::{
    BatterySample, CpuIdentity, CpuSample, DiskUsage, InterfaceAddr, MemorySample, MetricsSource,
    NetCounters, Partition, Platform, ProbeError, ProcessSample, battery,
};
use crate::error::AgentError;

/// Default sysfs directory scanned for batteries.
pub const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

/// Static description of the host, logged once at startup.
#[derive(Debug, Clone)]
pub struct HostProfile {
    pub hostname: String,
    pub os_name: String,
    pub os_version: String,
    pub os_arch: String,
}

impl HostProfile {
    /// Function to extract the host profile of the running system.
    pub fn detect() -> Self {
        Self {
            hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            os_name: System::name().unwrap_or_else(|| "unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "unknown".to_string()),
            os_arch: std::env::consts::ARCH.to_string(),
        }
    }
}

/// Reads host counters through sysinfo, with sysfs for batteries and a UDP
/// socket for outbound route resolution.
pub struct SysinfoSource {
    sys: System,
    disks: Disks,
    platform: Platform,
    route_probe: SocketAddr,
    power_supply_dir: PathBuf,
}

impl SysinfoSource {
    /// Function to create the source. Fails when sysinfo has no backend for
    /// this OS.
    pub fn new(route_probe: SocketAddr) -> Result<Self, AgentError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(AgentError::UnsupportedPlatform);
        }

        Ok(Self {
            sys: System::new(),
            disks: Disks::new(),
            platform: Platform::detect(),
            route_probe,
            power_supply_dir: PathBuf::from(POWER_SUPPLY_DIR),
        })
    }

    /// Function to point battery discovery at another sysfs directory.
    pub fn with_power_supply_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.power_supply_dir = dir.into();
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

impl MetricsSource for SysinfoSource {
    fn begin_cpu_window(&mut self) {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
    }

    fn cpu(&mut self) -> Result<CpuSample, ProbeError> {
        self.sys.refresh_cpu_usage();

        let logical = self.sys.cpus().len();
        if logical == 0 {
            return Err(ProbeError::Unavailable("cpu usage"));
        }

        Ok(CpuSample {
            usage: self.sys.global_cpu_usage(),
            physical_cores: self.sys.physical_core_count(),
            logical_cpus: Some(logical),
        })
    }

    fn cpu_identity(&mut self) -> CpuIdentity {
        self.sys.refresh_cpu_frequency();
        let first = self.sys.cpus().first();

        let model = self.platform.cpu_model().or_else(|| {
            first
                .map(|cpu| cpu.brand().trim().to_string())
                .filter(|brand| !brand.is_empty())
        });

        CpuIdentity {
            model,
            frequency_mhz: first.map(|cpu| cpu.frequency()).filter(|&mhz| mhz > 0),
        }
    }

    fn memory(&mut self) -> Result<MemorySample, ProbeError> {
        self.sys.refresh_memory();

        Ok(MemorySample {
            total: self.sys.total_memory(),
            used: self.sys.used_memory(),
        })
    }

    fn battery(&mut self) -> Result<Option<BatterySample>, ProbeError> {
        if self.platform != Platform::Linux {
            return Ok(None);
        }
        Ok(battery::read_power_supply(&self.power_supply_dir)?)
    }

    fn net_counters(&mut self) -> Result<NetCounters, ProbeError> {
        let networks = Networks::new_with_refreshed_list();

        let counters = networks.list().iter().fold(
            NetCounters {
                bytes_sent: 0,
                bytes_recv: 0,
            },
            |acc, (_, data)| NetCounters {
                bytes_sent: acc.bytes_sent.saturating_add(data.total_transmitted()),
                bytes_recv: acc.bytes_recv.saturating_add(data.total_received()),
            },
        );

        Ok(counters)
    }

    fn interfaces(&mut self) -> Result<Vec<InterfaceAddr>, ProbeError> {
        let networks = Networks::new_with_refreshed_list();

        let list = networks.list();
        let mut names: Vec<&String> = list.keys().collect();
        names.sort();

        let mut addrs = Vec::new();
        for name in names {
            let Some(data) = list.get(name) else {
                continue;
            };
            for network in data.ip_networks() {
                addrs.push(InterfaceAddr {
                    name: name.clone(),
                    addr: network.addr,
                    prefix: network.prefix,
                });
            }
        }

        Ok(addrs)
    }

    fn outbound_ip(&mut self) -> Result<IpAddr, ProbeError> {
        let bind_addr: SocketAddr = match self.route_probe {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        // Connecting a UDP socket only selects a route; nothing is sent.
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(self.route_probe).map_err(ProbeError::NoRoute)?;

        Ok(socket.local_addr()?.ip())
    }

    fn partitions(&mut self) -> Result<Vec<Partition>, ProbeError> {
        self.disks = Disks::new_with_refreshed_list();

        Ok(self
            .disks
            .list()
            .iter()
            .map(|disk| Partition {
                device: disk.name().to_string_lossy().into_owned(),
                mountpoint: disk.mount_point().to_path_buf(),
                fs_type: disk.file_system().to_string_lossy().into_owned(),
            })
            .collect())
    }

    fn disk_usage(&mut self, partition: &Partition) -> Result<DiskUsage, ProbeError> {
        let disk = self
            .disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == partition.mountpoint)
            .ok_or(ProbeError::Unavailable("mounted device"))?;

        // sysinfo reports zero totals when statvfs failed for the mount.
        let total = disk.total_space();
        if total == 0 {
            return Err(ProbeError::Unavailable("disk usage"));
        }

        Ok(DiskUsage {
            total,
            used: total.saturating_sub(disk.available_space()),
        })
    }

    fn processes(&mut self) -> Result<Vec<ProcessSample>, ProbeError> {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);

        let mut samples: Vec<ProcessSample> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| ProcessSample {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                cpu_percent: process.cpu_usage(),
                rss: process.memory(),
            })
            .collect();

        // HashMap order is arbitrary; pid order keeps ties deterministic.
        samples.sort_by_key(|sample| sample.pid);

        Ok(samples)
    }
}
