// src/collector/platform.rs
//! Per-OS CPU model lookup, selected once at startup.

use std::fs;
use std::process::Command;
use std::str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Reads `model name` from /proc/cpuinfo.
    Linux,
    /// Asks sysctl for `machdep.cpu.brand_string`.
    MacOs,
    /// No dedicated lookup; the sysinfo brand string is used instead.
    Generic,
}

impl Platform {
    /// Function to pick the lookup strategy for the running OS.
    pub fn detect() -> Self {
        if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Generic
        }
    }

    /// Function to look up the CPU model name. Any failure yields `None`.
    pub fn cpu_model(&self) -> Option<String> {
        match self {
            Platform::Linux => fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|text| parse_cpuinfo_model(&text)),
            Platform::MacOs => sysctl_brand_string(),
            Platform::Generic => None,
        }
    }
}

/// Function to extract the first `model name` entry of a /proc/cpuinfo dump.
pub fn parse_cpuinfo_model(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .filter(|line| line.starts_with("model name"))
        .find_map(|line| line.split_once(':'))
        .map(|(_, model)| model.trim().to_string())
        .filter(|model| !model.is_empty())
}

fn sysctl_brand_string() -> Option<String> {
    let output = Command::new("sysctl")
        .args(["-n", "machdep.cpu.brand_string"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    str::from_utf8(&output.stdout)
        .ok()
        .map(|brand| brand.trim().to_string())
        .filter(|brand| !brand.is_empty())
}
