use crate::{MachineSnapshot, Result, TelemetryCollector, TelemetryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use time::OffsetDateTime;

/// In-process collector returning a fixed snapshot. Counts how often it was sampled.
pub struct MockCollector {
    snapshot: MachineSnapshot,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockCollector {
    pub fn new(snapshot: MachineSnapshot) -> Self {
        Self {
            snapshot,
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A collector whose every sample fails with `msg`.
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Default for MockCollector {
    fn default() -> Self {
        Self::new(MachineSnapshot {
            cpu_rate: 23.5,
            memory: 16 * 1024 * 1024 * 1024,
            available_memory: 6 * 1024 * 1024 * 1024,
            uplink_speed: 12_800,
            downlink_speed: 256_000,
            temperature: 48.0,
            battery: 87.0,
            ts: None,
        })
    }
}

impl TelemetryCollector for MockCollector {
    fn current_snapshot(&self) -> Result<MachineSnapshot> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(msg) = &self.fail_with {
            return Err(TelemetryError::Backend(msg.clone()));
        }
        let mut snap = self.snapshot.clone();
        snap.ts = Some(OffsetDateTime::now_utc());
        Ok(snap)
    }
}
