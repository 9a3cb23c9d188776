use core::fmt;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single metric reading: integer, floating point or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{v}"),
            MetricValue::Float(v) => write!(f, "{v}"),
            MetricValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<u64> for MetricValue {
    fn from(v: u64) -> Self {
        MetricValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

/// Point-in-time machine reading delivered by a [`crate::TelemetryCollector`].
///
/// Memory figures are bytes, link speeds bytes per second, `cpu_rate` and
/// `battery` percentages in `0..=100`, `temperature` degrees Celsius. A value
/// the platform cannot provide is reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub cpu_rate: f64,
    pub memory: u64,
    pub available_memory: u64,
    pub uplink_speed: u64,
    pub downlink_speed: u64,
    pub temperature: f64,
    pub battery: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<OffsetDateTime>,
}
