use crate::{Metric, MetricSource, MetricValue, Result, TelemetryCollector, METRICS};
use tracing::trace;

/// Exposes a [`TelemetryCollector`] as a [`MetricSource`].
///
/// Every lookup takes a fresh snapshot; a batch lookup shares one snapshot
/// across its names. Nothing is kept between calls.
pub struct CollectorMetrics<C> {
    collector: C,
}

impl<C: TelemetryCollector> CollectorMetrics<C> {
    pub fn new(collector: C) -> Self {
        Self { collector }
    }

    pub fn collector(&self) -> &C {
        &self.collector
    }
}

impl<C: TelemetryCollector> MetricSource for CollectorMetrics<C> {
    fn list_metrics(&self) -> Vec<&'static str> {
        METRICS.iter().map(|d| d.id).collect()
    }

    fn get_metric(&self, name: &str) -> Result<Option<MetricValue>> {
        let Some(metric) = Metric::from_name(name) else {
            return Ok(None);
        };
        let snap = self.collector.current_snapshot()?;
        let value = metric.value_of(&snap);
        trace!(metric = metric.id(), %value, "metric sampled");
        Ok(Some(value))
    }

    fn get_metrics(&self, names: &[&str]) -> Vec<Result<Option<MetricValue>>> {
        let metrics: Vec<Option<Metric>> = names.iter().map(|n| Metric::from_name(n)).collect();
        if metrics.iter().all(Option::is_none) {
            return names.iter().map(|_| Ok(None)).collect();
        }
        let snap = self.collector.current_snapshot();
        metrics
            .into_iter()
            .map(|metric| match (metric, &snap) {
                (None, _) => Ok(None),
                (Some(m), Ok(snap)) => Ok(Some(m.value_of(snap))),
                (Some(_), Err(e)) => Err(e.clone()),
            })
            .collect()
    }
}
