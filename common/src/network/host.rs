//! # Discovered Host Model
//!
//! The canonical record for a host reported by the scanning service. The
//! service's wire payloads are inconsistently cased (Go-marshalled structs
//! next to lowercase variants); normalization into this one schema happens
//! exactly once, at the stream-ingestion boundary, so rendering and export
//! never repeat multi-spelling lookups.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the service established that a host is up.
///
/// Derived, not reported: ping results carry a round-trip time, ARP results
/// never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiscoveryMethod {
    Ping,
    Arp,
}

impl DiscoveryMethod {
    /// Status label the control panel historically used for this method.
    pub fn status_label(&self) -> &'static str {
        match self {
            DiscoveryMethod::Ping => "UP",
            DiscoveryMethod::Arp => "ACTIVE",
        }
    }
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryMethod::Ping => write!(f, "PING"),
            DiscoveryMethod::Arp => write!(f, "ARP"),
        }
    }
}

/// One discovered host. `ip` is the unique key inside a result store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResult {
    pub ip: String,
    pub mac: Option<String>,
    pub hostname: Option<String>,
    pub vendor: Option<String>,
    pub alive: bool,
    pub rtt_nanos: Option<u64>,
    pub method: DiscoveryMethod,
}

impl HostResult {
    /// Response time rendered the way the panel did, or `None` for ARP
    /// results that carry no round-trip time.
    pub fn response_time(&self) -> Option<String> {
        self.rtt_nanos.map(format_rtt)
    }
}

/// Renders a round-trip time in nanoseconds as whole milliseconds.
///
/// Durations that round below one millisecond collapse to `"<1ms"`.
pub fn format_rtt(nanos: u64) -> String {
    let ms = nanos as f64 / 1_000_000.0;
    if ms < 1.0 {
        return String::from("<1ms");
    }
    format!("{}ms", ms.round() as u64)
}
