// src/format.rs
//! Human-readable renderings shared by the metric providers.

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Function to render a byte-per-second rate with a B/s, KB/s or MB/s unit.
pub fn format_rate(bytes_per_sec: f64) -> String {
    if bytes_per_sec < KIB {
        format!("{:.2} B/s", bytes_per_sec)
    } else if bytes_per_sec < MIB {
        format!("{:.2} KB/s", bytes_per_sec / KIB)
    } else {
        format!("{:.2} MB/s", bytes_per_sec / MIB)
    }
}

/// Function to render a byte count as gigabytes, e.g. "7.81 GB".
pub fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / GIB)
}

/// Function to render a byte count as megabytes, e.g. "12.50 MB".
pub fn format_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / MIB)
}

/// Function to compute `part / whole` as a percentage with one decimal.
/// Returns 0 when `whole` is zero.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

/// Function to round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
