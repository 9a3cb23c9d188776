use anyhow::Context;
use host_actions::{RebootConfig, SpeechConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-node parameter handed to [`crate::Driver::open`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcParameter {
    /// Probe timeout in milliseconds.
    #[serde(default = "default_timeout_ms", alias = "Timeout", alias = "timeout")]
    pub timeout_ms: u64,
    /// Also report the probe status of successful probes.
    #[serde(default, alias = "RetrieveStatus", alias = "retrieveStatus")]
    pub retrieve_status: bool,
}

fn default_timeout_ms() -> u64 {
    3000
}

impl Default for PcParameter {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            retrieve_status: false,
        }
    }
}

/// Which discovery strategy `describe` uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMode {
    /// Fixed machine metrics plus the registered services.
    #[default]
    Metrics,
    /// Gateways and DNS servers of the local interfaces, read by probing.
    Network,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub discovery: DiscoveryMode,
    pub parameter: PcParameter,
    pub speech: SpeechConfig,
    pub reboot: RebootConfig,
}

/// Load a driver config from YAML, or JSON when the file ends in `.json`.
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<DriverConfig> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading config: {}", path.display()))?;
    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        return serde_json::from_str(&raw)
            .with_context(|| format!("parsing json: {}", path.display()));
    }
    if raw.trim().is_empty() {
        return Ok(DriverConfig::default());
    }
    let val: serde_yaml::Value =
        serde_yaml::from_str(&raw).with_context(|| format!("parsing yaml: {}", path.display()))?;
    let cfg: DriverConfig = serde_yaml::from_value(val)
        .with_context(|| format!("decoding config: {}", path.display()))?;
    Ok(cfg)
}
