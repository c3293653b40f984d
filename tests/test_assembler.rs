mod common;

use common::{FakeSource, instant_sampling};
use tinypulse::payload::{CpuMetrics, MemoryMetrics, NetworkMetrics};
use tinypulse::{Assembler, MetricFamily, Payload};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_healthy_snapshot() {
        let mut assembler = Assembler::new(FakeSource::healthy(), instant_sampling(), 7);
        let collection = assembler.assemble().await;

        assert!(collection.is_complete());
        let payload = collection.payload;
        assert_eq!(payload.profile_id, 7);
        assert_eq!(payload.cpu.usage, 45.3);
        assert_eq!(payload.processes.len(), 10);
        assert_eq!(payload.storage.devices.len(), 2);
        assert!(payload.battery.is_some());
        assert_eq!(assembler.source().cpu_windows, 1);
    }

    #[tokio::test]
    async fn test_wire_shape() {
        let mut assembler = Assembler::new(FakeSource::healthy(), instant_sampling(), 1);
        let payload = assembler.assemble().await.payload;
        let json = serde_json::to_value(&payload).unwrap();

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ["profileId", "cpu", "memory", "network", "battery", "storage", "processes"] {
            assert!(keys.contains(&key), "missing {key} in {keys:?}");
        }

        assert_eq!(json["profileId"], 1);
        assert!(json["storage"]["devices"].is_array());
        assert!(json["memory"]["usedPercentage"].is_f64());
        assert_eq!(json["battery"]["status"], "Discharging");
        assert_eq!(json["battery"]["timeRemaining"], "121 minutes");
        assert_eq!(json["network"]["interfaces"][0]["ipAddress"], "192.168.1.20");
        assert!(json["processes"][0]["cpuUsage"].is_f64());
        assert!(json["processes"][0]["memoryUsage"].is_string());
    }

    #[tokio::test]
    async fn test_no_battery_key_without_sensor() {
        let mut source = FakeSource::healthy();
        source.battery = Some(None);

        let mut assembler = Assembler::new(source, instant_sampling(), 1);
        let collection = assembler.assemble().await;
        assert!(collection.is_complete());

        let json = serde_json::to_value(&collection.payload).unwrap();
        assert!(json.get("battery").is_none());
    }

    #[tokio::test]
    async fn test_every_provider_failing_keeps_required_fields() {
        let mut assembler = Assembler::new(FakeSource::broken(), instant_sampling(), 3);
        let collection = assembler.assemble().await;

        assert_eq!(
            collection.degraded,
            [
                MetricFamily::Cpu,
                MetricFamily::Processes,
                MetricFamily::Memory,
                MetricFamily::Battery,
                MetricFamily::Network,
                MetricFamily::Storage,
            ]
        );

        let payload = &collection.payload;
        assert_eq!(payload.profile_id, 3);
        assert_eq!(payload.cpu, CpuMetrics::placeholder());
        assert_eq!(payload.memory, MemoryMetrics::placeholder());
        assert_eq!(payload.network, NetworkMetrics::offline());
        assert!(payload.battery.is_none());
        assert!(payload.storage.devices.is_empty());
        assert!(payload.processes.is_empty());

        let json = serde_json::to_value(payload).unwrap();
        for key in ["profileId", "cpu", "memory", "network", "storage", "processes"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("battery").is_none());
    }

    #[tokio::test]
    async fn test_one_family_failing_leaves_others() {
        let mut source = FakeSource::healthy();
        source.memory = None;

        let mut assembler = Assembler::new(source, instant_sampling(), 1);
        let collection = assembler.assemble().await;

        assert_eq!(collection.degraded, [MetricFamily::Memory]);
        assert_eq!(collection.payload.cpu.cores, 4);
        assert_eq!(collection.payload.storage.devices.len(), 2);
    }

    #[tokio::test]
    async fn test_serialization_is_stable() {
        let mut assembler = Assembler::new(FakeSource::healthy(), instant_sampling(), 1);
        let payload = assembler.assemble().await.payload;

        let first = payload.to_json_bytes().unwrap();
        let second = payload.to_json_bytes().unwrap();
        assert_eq!(first, second);

        let decoded: Payload = serde_json::from_slice(&first).unwrap();
        assert_eq!(decoded.profile_id, payload.profile_id);
        assert_eq!(decoded.processes.len(), payload.processes.len());
        assert_eq!(decoded.network.interfaces, payload.network.interfaces);
    }
}
