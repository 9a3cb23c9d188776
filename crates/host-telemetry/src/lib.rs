//! host-telemetry: named machine metrics behind a uniform lookup
//!
//! A [`TelemetryCollector`] samples the whole machine; [`CollectorMetrics`] turns it into a
//! case-insensitive [`MetricSource`] over the fixed set of metrics in [`METRICS`]. The default
//! build only ships the `mock` collector; enable `sysinfo` for the real host backend.

mod types;
pub use types::{MachineSnapshot, MetricValue};

mod error;
pub use error::{Result, TelemetryError};

mod metric;
pub use metric::{Metric, MetricDescriptor, METRICS};

mod traits;
pub use traits::{MetricSource, TelemetryCollector};

mod adapter;
pub use adapter::CollectorMetrics;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::MockCollector;

#[cfg(feature = "sysinfo")]
mod host;
#[cfg(feature = "sysinfo")]
pub use host::SysinfoCollector;
