use core::fmt;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Outcome reported by an echo probe that completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStatus {
    Success,
    TimedOut,
    DestinationHostUnreachable,
    DestinationNetworkUnreachable,
    TtlExpired,
    Unknown,
}

impl ProbeStatus {
    pub fn is_success(self) -> bool {
        self == ProbeStatus::Success
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeStatus::Success => "Success",
            ProbeStatus::TimedOut => "TimedOut",
            ProbeStatus::DestinationHostUnreachable => "DestinationHostUnreachable",
            ProbeStatus::DestinationNetworkUnreachable => "DestinationNetworkUnreachable",
            ProbeStatus::TtlExpired => "TtlExpired",
            ProbeStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReply {
    pub status: ProbeStatus,
    /// Round-trip time in milliseconds; zero unless `status` is `Success`.
    pub round_trip_ms: u64,
}

impl ProbeReply {
    pub fn success(round_trip_ms: u64) -> Self {
        Self {
            status: ProbeStatus::Success,
            round_trip_ms,
        }
    }

    pub fn failed(status: ProbeStatus) -> Self {
        Self {
            status,
            round_trip_ms: 0,
        }
    }
}

/// One local network interface with the addresses worth probing from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    #[serde(default)]
    pub gateways: Vec<IpAddr>,
    #[serde(default)]
    pub dns_servers: Vec<IpAddr>,
}
