// src/collector/battery.rs
//! Battery level and charging state.

use std::fs;
use std::io;
use std::path::Path;

use crate::collector::{BatterySample, MetricsSource, Reading};
use crate::format::round1;
use crate::payload::{BatteryMetrics, BatteryStatus, UNKNOWN};

/// Function to read the battery family. A host without a battery yields
/// `Fresh(None)`; a failed read is omitted from the payload as well.
pub fn collect_battery<S: MetricsSource + ?Sized>(
    source: &mut S,
) -> Reading<Option<BatteryMetrics>> {
    match source.battery() {
        Ok(sample) => Reading::Fresh(sample.as_ref().map(battery_metrics)),
        Err(e) => Reading::degraded(None, e),
    }
}

pub fn battery_metrics(sample: &BatterySample) -> BatteryMetrics {
    let status = if sample.power_plugged {
        BatteryStatus::Charging
    } else {
        BatteryStatus::Discharging
    };

    BatteryMetrics {
        level: round1(sample.percent.clamp(0.0, 100.0)),
        status,
        time_remaining: match sample.secs_left {
            Some(secs) => format!("{} minutes", secs / 60),
            None => UNKNOWN.to_string(),
        },
    }
}

/// Function to find the first battery under a sysfs power_supply directory
/// (normally `/sys/class/power_supply`).
///
/// A missing directory means no battery, not an error.
pub fn read_power_supply(dir: &Path) -> io::Result<Option<BatterySample>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut supplies: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
    supplies.sort();

    for supply in supplies {
        if read_attr(&supply, "type").as_deref() != Some("Battery") {
            continue;
        }
        if let Some(sample) = read_battery(&supply) {
            return Ok(Some(sample));
        }
    }

    Ok(None)
}

fn read_battery(supply: &Path) -> Option<BatterySample> {
    let percent = read_num(supply, "capacity")
        .map(|capacity| capacity as f64)
        .or_else(|| ratio(read_num(supply, "energy_now")?, read_num(supply, "energy_full")?))
        .or_else(|| ratio(read_num(supply, "charge_now")?, read_num(supply, "charge_full")?))?;

    let status = read_attr(supply, "status").unwrap_or_default();
    let power_plugged = !status.eq_ignore_ascii_case("discharging");

    // Remaining time is only meaningful while discharging.
    let secs_left = if power_plugged {
        None
    } else {
        remaining_secs(read_num(supply, "energy_now"), read_num(supply, "power_now"))
            .or_else(|| remaining_secs(read_num(supply, "charge_now"), read_num(supply, "current_now")))
    };

    Some(BatterySample {
        percent,
        power_plugged,
        secs_left,
    })
}

fn ratio(now: u64, full: u64) -> Option<f64> {
    (full > 0).then(|| now as f64 / full as f64 * 100.0)
}

fn remaining_secs(stored: Option<u64>, rate: Option<u64>) -> Option<u64> {
    match (stored, rate) {
        (Some(stored), Some(rate)) if rate > 0 => Some(stored * 3600 / rate),
        _ => None,
    }
}

fn read_attr(supply: &Path, name: &str) -> Option<String> {
    fs::read_to_string(supply.join(name))
        .ok()
        .map(|value| value.trim().to_string())
}

fn read_num(supply: &Path, name: &str) -> Option<u64> {
    read_attr(supply, name)?.parse().ok()
}
