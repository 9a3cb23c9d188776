use crate::{MachineSnapshot, Result, TelemetryCollector, TelemetryError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use sysinfo::{Components, Networks, System, MINIMUM_CPU_UPDATE_INTERVAL};
use time::OffsetDateTime;
use tracing::debug;

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

struct Baseline {
    sys: System,
    networks: Networks,
    refreshed_at: Instant,
    primed: bool,
}

/// Host collector backed by `sysinfo`.
///
/// CPU usage and link speeds are deltas, so the collector keeps the previous
/// refresh as a baseline. Only the first sample after construction waits out the
/// CPU update interval; later samples cover the time since the previous one.
pub struct SysinfoCollector {
    baseline: Mutex<Baseline>,
    power_supply_dir: PathBuf,
}

impl SysinfoCollector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self {
            baseline: Mutex::new(Baseline {
                sys,
                networks: Networks::new_with_refreshed_list(),
                refreshed_at: Instant::now(),
                primed: false,
            }),
            power_supply_dir: PathBuf::from(POWER_SUPPLY_DIR),
        }
    }

    /// Override where battery capacity is read from (Linux sysfs layout).
    pub fn with_power_supply_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.power_supply_dir = dir.into();
        self
    }

    fn sample_deltas(&self) -> Result<DeltaSample> {
        let mut base = self
            .baseline
            .lock()
            .map_err(|_| TelemetryError::Backend("collector state poisoned".into()))?;

        if !base.primed {
            let since = base.refreshed_at.elapsed();
            if since < MINIMUM_CPU_UPDATE_INTERVAL {
                thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL - since);
            }
            base.primed = true;
        }
        base.sys.refresh_cpu_usage();
        base.sys.refresh_memory();
        base.networks.refresh();
        let window = base.refreshed_at.elapsed();
        base.refreshed_at = Instant::now();

        let (rx, tx) = base
            .networks
            .list()
            .iter()
            .filter(|(name, _)| name.as_str() != "lo")
            .fold((0u64, 0u64), |acc, (_, data)| {
                (acc.0 + data.received(), acc.1 + data.transmitted())
            });

        Ok(DeltaSample {
            cpu_rate: f64::from(base.sys.global_cpu_usage()),
            memory: base.sys.total_memory(),
            available_memory: base.sys.available_memory(),
            uplink_speed: per_second(tx, window),
            downlink_speed: per_second(rx, window),
            window,
        })
    }
}

impl Default for SysinfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

struct DeltaSample {
    cpu_rate: f64,
    memory: u64,
    available_memory: u64,
    uplink_speed: u64,
    downlink_speed: u64,
    window: Duration,
}

impl TelemetryCollector for SysinfoCollector {
    fn current_snapshot(&self) -> Result<MachineSnapshot> {
        let d = self.sample_deltas()?;
        let snap = MachineSnapshot {
            cpu_rate: d.cpu_rate,
            memory: d.memory,
            available_memory: d.available_memory,
            uplink_speed: d.uplink_speed,
            downlink_speed: d.downlink_speed,
            temperature: max_temperature(),
            battery: battery_level(&self.power_supply_dir),
            ts: Some(OffsetDateTime::now_utc()),
        };
        debug!(cpu = snap.cpu_rate, window_ms = d.window.as_millis() as u64, "host snapshot");
        Ok(snap)
    }
}

fn per_second(bytes: u64, window: Duration) -> u64 {
    let secs = window.as_secs_f64();
    if secs <= 0.0 {
        return 0;
    }
    (bytes as f64 / secs) as u64
}

fn max_temperature() -> f64 {
    let components = Components::new_with_refreshed_list();
    components
        .list()
        .iter()
        .map(|c| f64::from(c.temperature()))
        .filter(|t| t.is_finite())
        .fold(0.0, f64::max)
}

// Linux exposes batteries as power_supply entries with type "Battery".
fn battery_level(dir: &Path) -> f64 {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0.0;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let kind = fs::read_to_string(path.join("type")).unwrap_or_default();
        if kind.trim() != "Battery" {
            continue;
        }
        if let Ok(raw) = fs::read_to_string(path.join("capacity")) {
            if let Ok(level) = raw.trim().parse::<f64>() {
                return level.clamp(0.0, 100.0);
            }
        }
    }
    0.0
}
