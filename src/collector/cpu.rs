// src/collector/cpu.rs
//! CPU utilization, topology and identity.

use std::time::Duration;

use crate::collector::{CpuIdentity, CpuSample, MetricsSource, Reading};
use crate::format::round1;
use crate::payload::{CpuMetrics, DEFAULT_CPU_MODEL, UNKNOWN};

/// Samples CPU usage over a fixed window.
#[derive(Debug, Clone, Copy)]
pub struct CpuProvider {
    window: Duration,
}

impl CpuProvider {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    /// Function to open a sampling window on the source, wait it out and read
    /// the result. The wait is part of the tick latency.
    pub async fn sample<S: MetricsSource + ?Sized>(&self, source: &mut S) -> Reading<CpuMetrics> {
        source.begin_cpu_window();
        tokio::time::sleep(self.window).await;

        // Usage first: a frequency refresh also restarts the usage window.
        let sample = source.cpu();
        let identity = source.cpu_identity();
        match sample {
            Ok(sample) => Reading::Fresh(cpu_metrics(&sample, &identity)),
            Err(e) => Reading::degraded(CpuMetrics::placeholder(), e),
        }
    }
}

/// Function to normalize a raw sample into the wire record.
pub fn cpu_metrics(sample: &CpuSample, identity: &CpuIdentity) -> CpuMetrics {
    CpuMetrics {
        usage: round1(usage_percent(sample.usage)),
        // Unknown counts are reported as 1, the same as a real single core.
        cores: sample.physical_cores.filter(|&n| n > 0).unwrap_or(1),
        threads: sample.logical_cpus.filter(|&n| n > 0).unwrap_or(1),
        speed: format_speed(identity.frequency_mhz),
        model: identity
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_CPU_MODEL.to_string()),
    }
}

fn usage_percent(usage: f32) -> f64 {
    let usage = f64::from(usage);
    if usage.is_finite() {
        usage.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

fn format_speed(frequency_mhz: Option<u64>) -> String {
    match frequency_mhz {
        Some(mhz) if mhz > 0 => format!("{:.2} MHz", mhz as f64),
        _ => UNKNOWN.to_string(),
    }
}
