// src/collector/memory.rs
//! Virtual memory usage.

use crate::collector::{MetricsSource, ProbeError, Reading};
use crate::format::{format_gb, percent};
use crate::payload::MemoryMetrics;

/// Function to read instantaneous memory counters.
pub fn collect_memory<S: MetricsSource + ?Sized>(source: &mut S) -> Reading<MemoryMetrics> {
    match source.memory() {
        Ok(sample) if sample.total == 0 => Reading::degraded(
            MemoryMetrics::placeholder(),
            ProbeError::Unavailable("total memory"),
        ),
        Ok(sample) => {
            let used = sample.used.min(sample.total);
            Reading::Fresh(MemoryMetrics {
                used_percentage: percent(used, sample.total),
                used: format_gb(used),
                total: format_gb(sample.total),
            })
        }
        Err(e) => Reading::degraded(MemoryMetrics::placeholder(), e),
    }
}
