use crate::{MachineSnapshot, MetricValue, Result};

/// A platform telemetry source producing whole-machine snapshots.
pub trait TelemetryCollector: Send + Sync {
    /// Sample the machine now. Implementations must not return stale readings.
    fn current_snapshot(&self) -> Result<MachineSnapshot>;
}

/// Uniform "named metric -> value" lookup.
pub trait MetricSource: Send + Sync {
    /// Ids of every metric this source can answer, in description order.
    fn list_metrics(&self) -> Vec<&'static str>;

    /// Current value of `name` (case-insensitive), `None` if the name is unknown.
    fn get_metric(&self, name: &str) -> Result<Option<MetricValue>>;

    /// Values for several names from a single sample, one entry per name in order.
    fn get_metrics(&self, names: &[&str]) -> Vec<Result<Option<MetricValue>>> {
        names.iter().map(|n| self.get_metric(n)).collect()
    }
}
