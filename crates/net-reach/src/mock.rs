use crate::{
    InterfaceInfo, InterfaceSource, ProbeError, ProbeReply, ProbeStatus, ReachabilityProbe, Result,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Scripted {
    Reply(ProbeReply),
    Fail(String),
}

/// Scripted probe: each address answers the way it was configured.
/// Addresses with no script fail to resolve.
#[derive(Default)]
pub struct MockProbe {
    script: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, Duration)>>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// `address` answers successfully after `round_trip_ms`.
    pub fn reachable(mut self, address: &str, round_trip_ms: u64) -> Self {
        self.script.insert(
            address.to_string(),
            Scripted::Reply(ProbeReply::success(round_trip_ms)),
        );
        self
    }

    /// `address` completes the probe with a non-success `status`.
    pub fn status(mut self, address: &str, status: ProbeStatus) -> Self {
        self.script
            .insert(address.to_string(), Scripted::Reply(ProbeReply::failed(status)));
        self
    }

    /// Probing `address` fails outright with `message`.
    pub fn failing(mut self, address: &str, message: &str) -> Self {
        self.script
            .insert(address.to_string(), Scripted::Fail(message.to_string()));
        self
    }

    /// Every (address, timeout) pair probed so far, in call order.
    pub fn calls(&self) -> Vec<(String, Duration)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ReachabilityProbe for MockProbe {
    fn probe(&self, address: &str, timeout: Duration) -> Result<ProbeReply> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((address.to_string(), timeout));
        }
        match self.script.get(address) {
            Some(Scripted::Reply(reply)) => Ok(*reply),
            Some(Scripted::Fail(msg)) => Err(ProbeError::Failed(msg.clone())),
            None => Err(ProbeError::Resolve(format!("no such host: {address}"))),
        }
    }
}

/// Fixed interface list, or a fixed enumeration error.
pub struct StaticInterfaces {
    interfaces: Option<Vec<InterfaceInfo>>,
}

impl StaticInterfaces {
    pub fn new(interfaces: Vec<InterfaceInfo>) -> Self {
        Self {
            interfaces: Some(interfaces),
        }
    }

    /// A source whose enumeration always fails.
    pub fn unavailable() -> Self {
        Self { interfaces: None }
    }
}

impl InterfaceSource for StaticInterfaces {
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        self.interfaces
            .clone()
            .ok_or(ProbeError::Unsupported("interface enumeration unavailable"))
    }
}
