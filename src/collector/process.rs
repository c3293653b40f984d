// src/collector/process.rs
//! Top processes by CPU usage.

use crate::collector::{MetricsSource, ProcessSample, Reading};
use crate::format::{format_mb, round1};
use crate::payload::ProcessInfo;

/// Number of processes kept in each payload.
pub const TOP_PROCESSES: usize = 10;

pub fn collect_processes<S: MetricsSource + ?Sized>(source: &mut S) -> Reading<Vec<ProcessInfo>> {
    match source.processes() {
        Ok(samples) => Reading::Fresh(top_processes(samples, TOP_PROCESSES)),
        Err(e) => Reading::degraded(Vec::new(), e),
    }
}

/// Function to keep the `limit` heaviest CPU consumers, highest first.
/// The sort is stable, so ties keep the source's order.
pub fn top_processes(mut samples: Vec<ProcessSample>, limit: usize) -> Vec<ProcessInfo> {
    for sample in &mut samples {
        if !sample.cpu_percent.is_finite() {
            sample.cpu_percent = 0.0;
        }
    }
    samples.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    samples.truncate(limit);

    samples
        .into_iter()
        .map(|sample| ProcessInfo {
            pid: sample.pid,
            name: sample.name,
            cpu_usage: round1(f64::from(sample.cpu_percent)),
            memory_usage: format_mb(sample.rss),
        })
        .collect()
}
