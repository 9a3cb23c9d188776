use crate::{InterfaceInfo, ProbeReply, Result};
use std::time::Duration;

/// A blocking echo probe.
pub trait ReachabilityProbe: Send + Sync {
    /// Probe `address` (hostname or IP), blocking for at most roughly `timeout`.
    ///
    /// A probe that ran but got no good answer is `Ok` with a non-success status;
    /// `Err` means the probe could not be carried out at all.
    fn probe(&self, address: &str, timeout: Duration) -> Result<ProbeReply>;
}

/// Enumerates local interfaces with their gateways and DNS servers.
pub trait InterfaceSource: Send + Sync {
    /// Interfaces in platform enumeration order.
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>>;
}
