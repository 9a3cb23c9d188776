use crate::describe::{describe_metrics, describe_network};
use crate::resolver::PointResolver;
use crate::{
    Command, CommandRequest, DiscoveryMode, DriverError, DriverMetrics, PcParameter, Point,
    ReadResult, Result, ThingSpec,
};
use host_actions::{PowerControl, Speaker};
use host_telemetry::MetricSource;
use net_reach::{InterfaceSource, ReachabilityProbe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// The contract an orchestrator drives: open a node, read points, run commands, describe.
pub trait Driver: Send + Sync {
    type Parameter;
    type Node;

    fn default_parameter(&self) -> Self::Parameter;

    fn open(&self, parameter: Self::Parameter) -> Result<Self::Node>;

    fn close(&self, _node: Self::Node) {}

    /// Never fails: per-point problems are reported inside the result.
    fn read(&self, node: &Self::Node, points: &[Point]) -> ReadResult;

    fn control(&self, node: &Self::Node, request: &CommandRequest) -> Result<()>;

    fn describe(&self) -> ThingSpec;
}

/// An opened node. Holds configuration only, no connection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcNode {
    pub parameter: PcParameter,
}

/// Local machine driver: telemetry metrics, reachability probes, speech and reboot.
pub struct PcDriver {
    discovery: DiscoveryMode,
    metrics: Arc<dyn MetricSource>,
    probe: Arc<dyn ReachabilityProbe>,
    interfaces: Arc<dyn InterfaceSource>,
    speaker: Arc<dyn Speaker>,
    power: Arc<dyn PowerControl>,
    stats: DriverMetrics,
}

impl PcDriver {
    /// Registration code the orchestrator knows this driver by.
    pub const CODE: &'static str = "PC";
    pub const DISPLAY_NAME: &'static str = "PC driver";

    pub fn builder() -> PcDriverBuilder {
        PcDriverBuilder::default()
    }

    pub fn discovery(&self) -> DiscoveryMode {
        self.discovery
    }

    pub fn stats(&self) -> &DriverMetrics {
        &self.stats
    }

    fn run(&self, cmd: Command) -> Result<()> {
        match cmd {
            Command::Speak { text } => {
                self.speaker.speak(&text)?;
                info!(chars = text.chars().count(), "speak dispatched");
            }
            Command::Reboot { timeout } => {
                let pid = self.power.reboot(Duration::from_secs(u64::from(timeout)))?;
                info!(timeout, pid, "reboot dispatched");
            }
        }
        Ok(())
    }
}

impl Driver for PcDriver {
    type Parameter = PcParameter;
    type Node = PcNode;

    fn default_parameter(&self) -> PcParameter {
        PcParameter::default()
    }

    fn open(&self, parameter: PcParameter) -> Result<PcNode> {
        if parameter.timeout_ms == 0 {
            return Err(DriverError::Config("timeout_ms must be positive".into()));
        }
        debug!(
            timeout_ms = parameter.timeout_ms,
            retrieve_status = parameter.retrieve_status,
            "node opened"
        );
        Ok(PcNode { parameter })
    }

    fn read(&self, node: &PcNode, points: &[Point]) -> ReadResult {
        if points.is_empty() {
            return ReadResult::new();
        }
        PointResolver {
            source: self.metrics.as_ref(),
            probe: self.probe.as_ref(),
            stats: &self.stats,
        }
        .read(&node.parameter, points)
    }

    fn control(&self, _node: &PcNode, request: &CommandRequest) -> Result<()> {
        let cmd = match Command::parse(request) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!(name = %request.name, "command rejected: {e}");
                self.stats.commands_rejected.inc();
                return Err(e);
            }
        };
        let service = cmd.service();
        debug!(service = service.id, "dispatching");
        self.run(cmd)?;
        self.stats.commands_dispatched.inc();
        Ok(())
    }

    fn describe(&self) -> ThingSpec {
        let spec = match self.discovery {
            DiscoveryMode::Metrics => describe_metrics(self.metrics.as_ref()),
            DiscoveryMode::Network => describe_network(self.interfaces.as_ref()),
        };
        self.stats
            .described_properties
            .set(i64::try_from(spec.properties.len()).unwrap_or(i64::MAX));
        spec
    }
}

/// Assembles a [`PcDriver`] from its collaborators; every one is required.
#[derive(Default)]
pub struct PcDriverBuilder {
    discovery: DiscoveryMode,
    metrics: Option<Arc<dyn MetricSource>>,
    probe: Option<Arc<dyn ReachabilityProbe>>,
    interfaces: Option<Arc<dyn InterfaceSource>>,
    speaker: Option<Arc<dyn Speaker>>,
    power: Option<Arc<dyn PowerControl>>,
}

impl PcDriverBuilder {
    pub fn discovery(mut self, mode: DiscoveryMode) -> Self {
        self.discovery = mode;
        self
    }

    pub fn metrics(mut self, source: Arc<dyn MetricSource>) -> Self {
        self.metrics = Some(source);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn interfaces(mut self, source: Arc<dyn InterfaceSource>) -> Self {
        self.interfaces = Some(source);
        self
    }

    pub fn speaker(mut self, speaker: Arc<dyn Speaker>) -> Self {
        self.speaker = Some(speaker);
        self
    }

    pub fn power(mut self, power: Arc<dyn PowerControl>) -> Self {
        self.power = Some(power);
        self
    }

    pub fn build(self) -> Result<PcDriver> {
        fn need<T>(v: Option<T>, what: &str) -> Result<T> {
            v.ok_or_else(|| DriverError::Config(format!("no {what} configured")))
        }
        Ok(PcDriver {
            discovery: self.discovery,
            metrics: need(self.metrics, "metric source")?,
            probe: need(self.probe, "reachability probe")?,
            interfaces: need(self.interfaces, "interface source")?,
            speaker: need(self.speaker, "speaker")?,
            power: need(self.power, "power control")?,
            stats: DriverMetrics::new()?,
        })
    }
}

#[cfg(feature = "system")]
impl PcDriver {
    /// Driver wired to the real host backends.
    pub fn from_config(cfg: &crate::DriverConfig) -> Result<Self> {
        use host_actions::{CommandSpeaker, ShutdownCommand};
        use host_telemetry::{CollectorMetrics, SysinfoCollector};
        use net_reach::{ProcNetInterfaces, SystemPing};

        Self::builder()
            .discovery(cfg.discovery)
            .metrics(Arc::new(CollectorMetrics::new(SysinfoCollector::new())))
            .probe(Arc::new(SystemPing::new()))
            .interfaces(Arc::new(ProcNetInterfaces::new()))
            .speaker(Arc::new(CommandSpeaker::new(cfg.speech.clone())))
            .power(Arc::new(ShutdownCommand::new(cfg.reboot.clone())))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{status_key, AccessMode, PointValue};
    use host_actions::{RecordingPower, RecordingSpeaker};
    use host_telemetry::{CollectorMetrics, MockCollector};
    use net_reach::{InterfaceInfo, MockProbe, StaticInterfaces};
    use serde_json::json;
    use std::thread;

    struct Rig {
        driver: PcDriver,
        speaker: Arc<RecordingSpeaker>,
        power: Arc<RecordingPower>,
    }

    fn rig(discovery: DiscoveryMode) -> anyhow::Result<Rig> {
        let speaker = Arc::new(RecordingSpeaker::new());
        let power = Arc::new(RecordingPower::new());
        let driver = PcDriver::builder()
            .discovery(discovery)
            .metrics(Arc::new(CollectorMetrics::new(MockCollector::default())))
            .probe(Arc::new(
                MockProbe::new()
                    .reachable("192.168.1.1", 2)
                    .failing("10.9.9.9", "host unreachable"),
            ))
            .interfaces(Arc::new(StaticInterfaces::new(vec![InterfaceInfo {
                name: "eth0".into(),
                gateways: vec!["192.168.1.1".parse()?],
                dns_servers: vec!["192.168.1.1".parse()?],
            }])))
            .speaker(speaker.clone())
            .power(power.clone())
            .build()?;
        Ok(Rig {
            driver,
            speaker,
            power,
        })
    }

    #[test]
    fn open_rejects_zero_timeout() -> anyhow::Result<()> {
        let r = rig(DiscoveryMode::Metrics)?;
        let param = PcParameter {
            timeout_ms: 0,
            ..r.driver.default_parameter()
        };
        assert!(matches!(r.driver.open(param), Err(DriverError::Config(_))));
        Ok(())
    }

    #[test]
    fn read_mixes_probes_and_metrics() -> anyhow::Result<()> {
        let r = rig(DiscoveryMode::Metrics)?;
        let node = r.driver.open(r.driver.default_parameter())?;
        let res = r.driver.read(
            &node,
            &[
                Point::with_address("Gateway", "192.168.1.1"),
                Point::with_address("Remote", "10.9.9.9"),
                Point::named("Battery"),
                Point::named("Unknown"),
            ],
        );
        assert_eq!(res.get("Gateway"), Some(&PointValue::Int(2)));
        assert_eq!(
            res.get(&status_key("Remote")),
            Some(&PointValue::Text("probe failed: host unreachable".into()))
        );
        assert_eq!(res.get("Battery"), Some(&PointValue::Float(87.0)));
        assert_eq!(res.len(), 3);
        assert!(r.driver.read(&node, &[]).is_empty());
        Ok(())
    }

    #[test]
    fn speak_runs_once() -> anyhow::Result<()> {
        let r = rig(DiscoveryMode::Metrics)?;
        let node = r.driver.open(PcParameter::default())?;
        r.driver
            .control(&node, &CommandRequest::new("Speak", json!("hello")))?;
        assert_eq!(r.speaker.spoken(), vec!["hello".to_string()]);
        assert!(r.power.reboots().is_empty());
        assert_eq!(r.driver.stats().commands_dispatched.get(), 1);
        Ok(())
    }

    #[test]
    fn reboot_gets_integer_delay() -> anyhow::Result<()> {
        let r = rig(DiscoveryMode::Metrics)?;
        let node = r.driver.open(PcParameter::default())?;
        r.driver
            .control(&node, &CommandRequest::new("Reboot", json!("15")))?;
        assert_eq!(r.power.reboots(), vec![Duration::from_secs(15)]);
        assert!(r.speaker.spoken().is_empty());
        Ok(())
    }

    #[test]
    fn unknown_command_has_no_side_effect() -> anyhow::Result<()> {
        let r = rig(DiscoveryMode::Metrics)?;
        let node = r.driver.open(PcParameter::default())?;
        let err = r
            .driver
            .control(&node, &CommandRequest::new("Nonexistent", json!("x")));
        assert!(matches!(err, Err(DriverError::NotImplemented(ref n)) if n == "Nonexistent"));

        let err = r
            .driver
            .control(&node, &CommandRequest::new("Reboot", json!("later")));
        assert!(matches!(err, Err(DriverError::InvalidInput { .. })));

        assert!(r.speaker.spoken().is_empty());
        assert!(r.power.reboots().is_empty());
        assert_eq!(r.driver.stats().commands_rejected.get(), 2);
        assert_eq!(r.driver.stats().commands_dispatched.get(), 0);
        Ok(())
    }

    #[test]
    fn describe_follows_discovery_mode() -> anyhow::Result<()> {
        let metrics = rig(DiscoveryMode::Metrics)?.driver.describe();
        assert_eq!(metrics.properties.len(), 7);
        assert_eq!(metrics.services.len(), 2);
        assert!(metrics
            .properties
            .iter()
            .all(|p| p.access_mode == AccessMode::Read));

        let r = rig(DiscoveryMode::Network)?;
        let network = r.driver.describe();
        let ids: Vec<&str> = network.properties.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["Gateway", "Dns"]);
        assert_eq!(r.driver.describe(), network);
        assert_eq!(r.driver.stats().described_properties.get(), 2);
        Ok(())
    }

    #[test]
    fn builder_requires_every_collaborator() {
        let err = PcDriver::builder().build().err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("configuration error: no metric source configured")
        );
    }

    #[test]
    fn read_and_describe_run_concurrently() -> anyhow::Result<()> {
        let r = Arc::new(rig(DiscoveryMode::Metrics)?);
        let node = r.driver.open(PcParameter::default())?;
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let r = Arc::clone(&r);
                let node = node.clone();
                thread::spawn(move || {
                    if i % 2 == 0 {
                        r.driver
                            .read(&node, &[Point::with_address("Gateway", "192.168.1.1")])
                            .len()
                    } else {
                        r.driver.describe().properties.len()
                    }
                })
            })
            .collect();
        for (i, h) in handles.into_iter().enumerate() {
            let n = h.join().map_err(|_| anyhow::anyhow!("worker panicked"))?;
            assert_eq!(n, if i % 2 == 0 { 1 } else { 7 });
        }
        Ok(())
    }
}
