// src/collector/disk.rs
//! Mounted filesystem usage.

use tracing::debug;

use crate::collector::{MetricsSource, Reading};
use crate::format::{format_gb, percent};
use crate::payload::{Storage, StorageDevice};

/// Function to get usage for every mounted filesystem with a known type.
/// A device whose usage cannot be read is skipped.
pub fn collect_storage<S: MetricsSource + ?Sized>(source: &mut S) -> Reading<Storage> {
    let partitions = match source.partitions() {
        Ok(partitions) => partitions,
        Err(e) => return Reading::degraded(Storage::default(), e),
    };

    let mut devices = Vec::with_capacity(partitions.len());

    for partition in partitions.iter().filter(|p| !p.fs_type.is_empty()) {
        let usage = match source.disk_usage(partition) {
            Ok(usage) => usage,
            Err(e) => {
                debug!(
                    mount = %partition.mountpoint.display(),
                    error = %e,
                    "skipping device without usage"
                );
                continue;
            }
        };

        let used = usage.used.min(usage.total);
        devices.push(StorageDevice {
            name: partition.device.clone(),
            mountpoint: partition.mountpoint.to_string_lossy().into_owned(),
            fs_type: partition.fs_type.clone(),
            total_space: format!("{} Total", format_gb(usage.total)),
            used_space: format!("{} Used", format_gb(used)),
            used_percentage: percent(used, usage.total),
        });
    }

    Reading::Fresh(Storage { devices })
}
