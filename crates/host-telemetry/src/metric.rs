use crate::{MachineSnapshot, MetricValue};

/// The closed set of metrics a collector exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    CpuRate,
    Memory,
    AvailableMemory,
    UplinkSpeed,
    DownlinkSpeed,
    Temperature,
    Battery,
}

/// Display metadata for one metric, used when describing the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub metric: Metric,
    pub id: &'static str,
    pub name: &'static str,
    pub data_type: &'static str,
    pub unit: Option<&'static str>,
    pub unit_name: Option<&'static str>,
}

/// Every known metric, in the order it is described.
pub const METRICS: [MetricDescriptor; 7] = [
    MetricDescriptor {
        metric: Metric::CpuRate,
        id: "CpuRate",
        name: "CPU usage",
        data_type: "double",
        unit: Some("%"),
        unit_name: Some("percent"),
    },
    MetricDescriptor {
        metric: Metric::Memory,
        id: "Memory",
        name: "Total memory",
        data_type: "long",
        unit: Some("B"),
        unit_name: Some("bytes"),
    },
    MetricDescriptor {
        metric: Metric::AvailableMemory,
        id: "AvailableMemory",
        name: "Available memory",
        data_type: "long",
        unit: Some("B"),
        unit_name: Some("bytes"),
    },
    MetricDescriptor {
        metric: Metric::UplinkSpeed,
        id: "UplinkSpeed",
        name: "Uplink speed",
        data_type: "long",
        unit: Some("B/s"),
        unit_name: Some("bytes per second"),
    },
    MetricDescriptor {
        metric: Metric::DownlinkSpeed,
        id: "DownlinkSpeed",
        name: "Downlink speed",
        data_type: "long",
        unit: Some("B/s"),
        unit_name: Some("bytes per second"),
    },
    MetricDescriptor {
        metric: Metric::Temperature,
        id: "Temperature",
        name: "Temperature",
        data_type: "double",
        unit: Some("°C"),
        unit_name: Some("degrees Celsius"),
    },
    MetricDescriptor {
        metric: Metric::Battery,
        id: "Battery",
        name: "Battery level",
        data_type: "double",
        unit: Some("%"),
        unit_name: Some("percent"),
    },
];

impl Metric {
    pub fn descriptor(self) -> &'static MetricDescriptor {
        // METRICS is indexed in declaration order
        &METRICS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.descriptor().id
    }

    /// Case-insensitive lookup by metric id.
    pub fn from_name(name: &str) -> Option<Self> {
        METRICS
            .iter()
            .find(|d| d.id.eq_ignore_ascii_case(name))
            .map(|d| d.metric)
    }

    pub fn value_of(self, snap: &MachineSnapshot) -> MetricValue {
        match self {
            Metric::CpuRate => snap.cpu_rate.into(),
            Metric::Memory => snap.memory.into(),
            Metric::AvailableMemory => snap.available_memory.into(),
            Metric::UplinkSpeed => snap.uplink_speed.into(),
            Metric::DownlinkSpeed => snap.downlink_speed.into(),
            Metric::Temperature => snap.temperature.into(),
            Metric::Battery => snap.battery.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_table_matches_enum_order() {
        for (i, d) in METRICS.iter().enumerate() {
            assert_eq!(d.metric as usize, i);
            assert_eq!(d.metric.descriptor().id, d.id);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Metric::from_name("cpurate"), Some(Metric::CpuRate));
        assert_eq!(Metric::from_name("AVAILABLEMEMORY"), Some(Metric::AvailableMemory));
        assert_eq!(Metric::from_name("Battery"), Some(Metric::Battery));
        assert_eq!(Metric::from_name("Gateway"), None);
        assert_eq!(Metric::from_name(""), None);
    }

    #[test]
    fn integer_metrics_saturate() {
        let snap = MachineSnapshot {
            cpu_rate: 12.5,
            memory: u64::MAX,
            available_memory: 1024,
            uplink_speed: 0,
            downlink_speed: 0,
            temperature: 0.0,
            battery: 0.0,
            ts: None,
        };
        assert_eq!(Metric::Memory.value_of(&snap), MetricValue::Int(i64::MAX));
        assert_eq!(Metric::AvailableMemory.value_of(&snap), MetricValue::Int(1024));
        assert_eq!(Metric::CpuRate.value_of(&snap), MetricValue::Float(12.5));
    }
}
