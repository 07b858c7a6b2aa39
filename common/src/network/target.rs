//! # Scan Target Model
//!
//! Defines what the user asks the service to scan and how it is validated
//! before any request leaves the client:
//! * A network in CIDR notation (e.g., `192.168.1.0/24`).
//! * The scan technique the engine should use (`ping`, `arp`, or `both`).
//!
//! Validation is the client's only responsibility here — enumeration of the
//! addresses inside the block is the scanning engine's job.

use std::fmt;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use serde::{Serialize, Serializer};

use crate::error::ScanError;

/// A validated network in CIDR notation, kept in the exact spelling the
/// user supplied so the request body matches their input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network(String);

impl Network {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the `/24` surrounding a detected host address, mirroring how
    /// the service's own panel pre-fills the network field.
    pub fn surrounding_ip(ip: &str) -> Option<Network> {
        let octets: Vec<&str> = ip.trim().split('.').collect();
        if octets.len() != 4 || octets.iter().any(|o| o.parse::<u8>().is_err()) {
            return None;
        }
        let cidr = format!("{}.{}.{}.0/24", octets[0], octets[1], octets[2]);
        cidr.parse().ok()
    }
}

impl FromStr for Network {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ScanError::EmptyNetwork);
        }

        trimmed
            .parse::<IpNetwork>()
            .map_err(|e| ScanError::InvalidNetwork {
                network: trimmed.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Network(trimmed.to_string()))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// The scan technique requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Ping,
    Arp,
    Both,
}

impl FromStr for ScanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ping" => Ok(ScanType::Ping),
            "arp" => Ok(ScanType::Arp),
            "both" => Ok(ScanType::Both),
            other => Err(format!(
                "invalid scan type '{other}', use 'ping', 'arp', or 'both'"
            )),
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanType::Ping => write!(f, "ping"),
            ScanType::Arp => write!(f, "arp"),
            ScanType::Both => write!(f, "both"),
        }
    }
}

/// Everything the service needs to run one scan. Field names and units match
/// the `/api/scan` request body (`timeout` is in seconds).
///
/// An empty or malformed network is unrepresentable here — [`Network`]
/// rejects it at parse time, before any request can be built.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRequest {
    pub network: Network,
    pub scan_type: ScanType,
    pub threads: u32,
    pub timeout: u64,
}
