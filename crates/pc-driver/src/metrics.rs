use crate::{DriverError, Result};
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

/// Driver activity counters, exported in Prometheus text format.
#[derive(Clone)]
pub struct DriverMetrics {
    pub registry: Registry,
    pub points_read: IntCounter,
    pub points_skipped: IntCounter,
    pub probe_failures: IntCounter,
    pub commands_dispatched: IntCounter,
    pub commands_rejected: IntCounter,
    pub described_properties: IntGauge,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter> {
    let c = IntCounter::new(name, help).map_err(|e| DriverError::Metrics(e.to_string()))?;
    registry
        .register(Box::new(c.clone()))
        .map_err(|e| DriverError::Metrics(e.to_string()))?;
    Ok(c)
}

impl DriverMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let points_read = counter(&registry, "pc_points_read", "Points resolved to a value")?;
        let points_skipped = counter(
            &registry,
            "pc_points_skipped",
            "Points with neither an address nor a known metric name",
        )?;
        let probe_failures = counter(
            &registry,
            "pc_probe_failures",
            "Probed points that produced no round-trip value",
        )?;
        let commands_dispatched =
            counter(&registry, "pc_commands_dispatched", "Control commands executed")?;
        let commands_rejected = counter(
            &registry,
            "pc_commands_rejected",
            "Control commands refused as unknown or malformed",
        )?;
        let described_properties = IntGauge::new(
            "pc_described_properties",
            "Properties in the most recent self-description",
        )
        .map_err(|e| DriverError::Metrics(e.to_string()))?;
        registry
            .register(Box::new(described_properties.clone()))
            .map_err(|e| DriverError::Metrics(e.to_string()))?;

        Ok(Self {
            registry,
            points_read,
            points_skipped,
            probe_failures,
            commands_dispatched,
            commands_rejected,
            described_properties,
        })
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
