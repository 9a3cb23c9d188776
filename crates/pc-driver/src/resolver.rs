use crate::{status_key, DriverMetrics, PcParameter, Point, PointValue, ReadResult};
use host_telemetry::MetricSource;
use net_reach::ReachabilityProbe;
use std::time::Duration;
use tracing::{debug, warn};

/// Turns requested points into values, one point at a time.
///
/// A point's failure lands in its `-Status` entry and never stops the batch.
/// Metric points of one read share a single telemetry sample.
pub struct PointResolver<'a> {
    pub source: &'a dyn MetricSource,
    pub probe: &'a dyn ReachabilityProbe,
    pub stats: &'a DriverMetrics,
}

impl PointResolver<'_> {
    pub fn read(&self, param: &PcParameter, points: &[Point]) -> ReadResult {
        let mut out = ReadResult::new();
        let timeout = Duration::from_millis(param.timeout_ms);
        let mut metric_points = Vec::new();
        for point in points {
            match point.target() {
                Some(address) => self.probe_point(point, address, timeout, param, &mut out),
                None => metric_points.push(point),
            }
        }
        if !metric_points.is_empty() {
            let names: Vec<&str> = metric_points.iter().map(|p| p.name.as_str()).collect();
            let values = self.source.get_metrics(&names);
            for (point, value) in metric_points.into_iter().zip(values) {
                self.metric_point(point, value, &mut out);
            }
        }
        out
    }

    fn probe_point(
        &self,
        point: &Point,
        address: &str,
        timeout: Duration,
        param: &PcParameter,
        out: &mut ReadResult,
    ) {
        match self.probe.probe(address, timeout) {
            Ok(reply) if reply.status.is_success() => {
                debug!(point = %point.name, address, rtt_ms = reply.round_trip_ms, "probe ok");
                self.stats.points_read.inc();
                out.insert(point.name.clone(), reply.round_trip_ms.into());
                if param.retrieve_status {
                    out.insert(status_key(&point.name), status_value(reply.status.as_str()));
                }
            }
            Ok(reply) => {
                debug!(point = %point.name, address, status = %reply.status, "probe got no reply");
                self.stats.probe_failures.inc();
                out.insert(status_key(&point.name), status_value(reply.status.as_str()));
            }
            Err(e) => {
                warn!(point = %point.name, address, "probe failed: {e}");
                self.stats.probe_failures.inc();
                out.insert(status_key(&point.name), status_value(&e.to_string()));
            }
        }
    }

    fn metric_point(
        &self,
        point: &Point,
        value: host_telemetry::Result<Option<PointValue>>,
        out: &mut ReadResult,
    ) {
        match value {
            Ok(Some(value)) => {
                debug!(point = %point.name, %value, "metric read");
                self.stats.points_read.inc();
                out.insert(point.name.clone(), value);
            }
            Ok(None) => {
                debug!(point = %point.name, "no address and no such metric, skipped");
                self.stats.points_skipped.inc();
            }
            Err(e) => {
                warn!(point = %point.name, "metric read failed: {e}");
                out.insert(status_key(&point.name), status_value(&e.to_string()));
            }
        }
    }
}

fn status_value(msg: &str) -> PointValue {
    PointValue::Text(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use host_telemetry::{CollectorMetrics, MockCollector};
    use net_reach::{MockProbe, ProbeStatus};

    struct Fixture {
        source: CollectorMetrics<MockCollector>,
        probe: MockProbe,
        stats: DriverMetrics,
    }

    impl Fixture {
        fn new(probe: MockProbe) -> anyhow::Result<Self> {
            Ok(Self {
                source: CollectorMetrics::new(MockCollector::default()),
                probe,
                stats: DriverMetrics::new()?,
            })
        }

        fn failing_source(probe: MockProbe) -> anyhow::Result<Self> {
            Ok(Self {
                source: CollectorMetrics::new(MockCollector::failing("sensor offline")),
                probe,
                stats: DriverMetrics::new()?,
            })
        }

        fn read(&self, param: &PcParameter, points: &[Point]) -> ReadResult {
            PointResolver {
                source: &self.source,
                probe: &self.probe,
                stats: &self.stats,
            }
            .read(param, points)
        }
    }

    #[test]
    fn empty_batch_is_empty_result() -> anyhow::Result<()> {
        let fx = Fixture::new(MockProbe::new())?;
        assert!(fx.read(&PcParameter::default(), &[]).is_empty());
        assert!(fx.probe.calls().is_empty());
        Ok(())
    }

    #[test]
    fn reachable_address_yields_round_trip() -> anyhow::Result<()> {
        let fx = Fixture::new(MockProbe::new().reachable("10.0.0.1", 7))?;
        let res = fx.read(&PcParameter::default(), &[Point::with_address("Gateway", "10.0.0.1")]);
        assert_eq!(res.get("Gateway"), Some(&PointValue::Int(7)));
        assert!(!res.contains_key("Gateway-Status"));
        Ok(())
    }

    #[test]
    fn retrieve_status_adds_status_entry() -> anyhow::Result<()> {
        let fx = Fixture::new(MockProbe::new().reachable("10.0.0.1", 7))?;
        let param = PcParameter {
            retrieve_status: true,
            ..PcParameter::default()
        };
        let res = fx.read(&param, &[Point::with_address("Gateway", "10.0.0.1")]);
        assert_eq!(res.get("Gateway"), Some(&PointValue::Int(7)));
        assert_eq!(
            res.get("Gateway-Status"),
            Some(&PointValue::Text("Success".into()))
        );
        Ok(())
    }

    #[test]
    fn probe_uses_configured_timeout() -> anyhow::Result<()> {
        let fx = Fixture::new(MockProbe::new().reachable("10.0.0.1", 1))?;
        let param = PcParameter {
            timeout_ms: 250,
            ..PcParameter::default()
        };
        fx.read(&param, &[Point::with_address("Gateway", "10.0.0.1")]);
        assert_eq!(fx.probe.calls()[0].1, Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn unreachable_address_reports_status_only() -> anyhow::Result<()> {
        let fx = Fixture::new(
            MockProbe::new()
                .status("10.0.0.9", ProbeStatus::TimedOut)
                .failing("10.0.0.8", "network down"),
        )?;
        let res = fx.read(
            &PcParameter::default(),
            &[
                Point::with_address("Slow", "10.0.0.9"),
                Point::with_address("Down", "10.0.0.8"),
                Point::with_address("Bogus", "no-such-host.invalid"),
            ],
        );
        for name in ["Slow", "Down", "Bogus"] {
            assert!(!res.contains_key(name), "{name} has a value");
            match res.get(&status_key(name)) {
                Some(PointValue::Text(s)) => assert!(!s.is_empty()),
                other => panic!("{name}: unexpected status {other:?}"),
            }
        }
        assert_eq!(
            res.get("Slow-Status"),
            Some(&PointValue::Text("TimedOut".into()))
        );
        assert_eq!(fx.stats.probe_failures.get(), 3);
        Ok(())
    }

    #[test]
    fn one_failure_does_not_hide_other_points() -> anyhow::Result<()> {
        let fx = Fixture::new(
            MockProbe::new()
                .failing("10.0.0.8", "network down")
                .reachable("10.0.0.1", 3),
        )?;
        let res = fx.read(
            &PcParameter::default(),
            &[
                Point::with_address("Down", "10.0.0.8"),
                Point::with_address("Up", "10.0.0.1"),
                Point::named("cpurate"),
            ],
        );
        assert_eq!(res.get("Up"), Some(&PointValue::Int(3)));
        assert!(res.contains_key("Down-Status"));
        assert!(res.contains_key("cpurate"));
        assert_eq!(fx.probe.calls().len(), 2);
        Ok(())
    }

    #[test]
    fn metric_keeps_requested_name() -> anyhow::Result<()> {
        let fx = Fixture::new(MockProbe::new())?;
        let res = fx.read(
            &PcParameter::default(),
            &[Point::named("cpuRATE"), Point::named("Memory")],
        );
        assert!(matches!(res.get("cpuRATE"), Some(PointValue::Float(_))));
        assert!(!res.contains_key("CpuRate"));
        assert!(matches!(res.get("Memory"), Some(PointValue::Int(m)) if *m > 0));
        assert_eq!(fx.stats.points_read.get(), 2);
        Ok(())
    }

    #[test]
    fn all_metrics_in_one_read_share_a_sample() -> anyhow::Result<()> {
        let fx = Fixture::new(MockProbe::new().reachable("10.0.0.1", 4))?;
        let mut points: Vec<Point> = fx.source.list_metrics().into_iter().map(Point::named).collect();
        points.push(Point::with_address("Gw", "10.0.0.1"));
        points.push(Point::named("Fan"));

        let res = fx.read(&PcParameter::default(), &points);
        assert_eq!(fx.source.collector().calls(), 1);
        assert_eq!(res.len(), 8);
        assert_eq!(res.get("Battery"), Some(&PointValue::Float(87.0)));
        assert_eq!(res.get("Gw"), Some(&PointValue::Int(4)));

        fx.read(&PcParameter::default(), &points);
        assert_eq!(fx.source.collector().calls(), 2);
        Ok(())
    }

    #[test]
    fn probe_only_read_does_not_sample() -> anyhow::Result<()> {
        let fx = Fixture::new(MockProbe::new().reachable("10.0.0.1", 4))?;
        fx.read(&PcParameter::default(), &[Point::with_address("Gw", "10.0.0.1")]);
        assert_eq!(fx.source.collector().calls(), 0);
        Ok(())
    }

    #[test]
    fn unknown_points_are_skipped_silently() -> anyhow::Result<()> {
        let fx = Fixture::new(MockProbe::new())?;
        let res = fx.read(
            &PcParameter::default(),
            &[Point::named("Fan"), Point::with_address("Blank", " ")],
        );
        assert!(res.is_empty());
        assert_eq!(fx.stats.points_skipped.get(), 2);
        assert!(fx.probe.calls().is_empty());
        Ok(())
    }

    #[test]
    fn collector_failure_is_isolated_per_point() -> anyhow::Result<()> {
        let fx = Fixture::failing_source(MockProbe::new().reachable("10.0.0.1", 2))?;
        let res = fx.read(
            &PcParameter::default(),
            &[Point::named("Temperature"), Point::with_address("Gw", "10.0.0.1")],
        );
        assert!(!res.contains_key("Temperature"));
        assert!(res.contains_key("Temperature-Status"));
        assert_eq!(res.get("Gw"), Some(&PointValue::Int(2)));
        Ok(())
    }
}
