//! net-reach: reachability probes and local gateway/DNS enumeration
//!
//! [`ReachabilityProbe`] is a blocking echo with a timeout; [`InterfaceSource`] lists local
//! interfaces with their gateways and resolvers. The default build enables only the `mock`
//! backend; `system` adds the `ping`-based probe and the Linux procfs enumerator.

mod types;
pub use types::{InterfaceInfo, ProbeReply, ProbeStatus};

mod error;
pub use error::{ProbeError, Result};

mod traits;
pub use traits::{InterfaceSource, ReachabilityProbe};

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockProbe, StaticInterfaces};

#[cfg(feature = "system")]
mod ping;
#[cfg(feature = "system")]
pub use ping::SystemPing;

#[cfg(feature = "system")]
mod iface;
#[cfg(feature = "system")]
pub use iface::ProcNetInterfaces;
