//! # Push-Stream Event Model
//!
//! The service delivers a sequence of tagged JSON events over its progress
//! stream. This module is the single normalization boundary: wire payloads —
//! with their Go-marshalled capitalized field names, their lowercase
//! variants, and their two spellings of the aliveness flag — are decoded
//! here into one canonical shape, and nothing downstream ever sees the raw
//! form again.

use serde::Deserialize;
use tracing::debug;

use crossnet_common::error::ScanError;
use crossnet_common::network::host::{DiscoveryMethod, HostResult};

/// A classified event from the scan-progress stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Progress { percent: i64, message: String },
    Result(HostResult),
    Complete { message: String },
    Error { message: String },
}

/// Wire shape of one stream frame, mirroring the service's event struct.
#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    progress: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<WireHost>,
    #[serde(default)]
    error: Option<String>,
}

/// Wire shape of a host record. The service emits two record families (ping
/// results and ARP entries) and two casings of each field; aliases fold them
/// into one struct. A payload repeating a logical field in both spellings is
/// a duplicate-field error and the whole event is rejected — the service
/// defines no precedence, so neither do we.
#[derive(Debug, Deserialize)]
struct WireHost {
    #[serde(default, alias = "IP")]
    ip: Option<String>,
    #[serde(default, alias = "MAC")]
    mac: Option<String>,
    #[serde(default, alias = "Hostname")]
    hostname: Option<String>,
    #[serde(default, alias = "Vendor")]
    vendor: Option<String>,
    #[serde(default, alias = "Alive")]
    alive: Option<bool>,
    #[serde(default, alias = "Online")]
    online: Option<bool>,
    #[serde(default, alias = "RTT")]
    rtt: Option<u64>,
}

impl WireHost {
    fn normalize(self) -> Result<HostResult, ScanError> {
        let ip = match self.ip {
            Some(ip) if !ip.is_empty() => ip,
            _ => {
                return Err(ScanError::MalformedEvent(
                    "result event without an address".to_string(),
                ));
            }
        };

        // Ping results report `Alive`, ARP entries report `Online`; only one
        // family carries a round-trip time.
        let alive = self.alive.or(self.online).unwrap_or(false);
        let method = if self.rtt.is_some() {
            DiscoveryMethod::Ping
        } else {
            DiscoveryMethod::Arp
        };

        Ok(HostResult {
            ip,
            mac: none_if_empty(self.mac),
            hostname: none_if_empty(self.hostname),
            vendor: none_if_empty(self.vendor),
            alive,
            rtt_nanos: self.rtt,
            method,
        })
    }
}

/// Go marshals absent strings as `""`; collapse those to a real absence.
fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Decodes one frame payload into a classified event.
///
/// Returns `Ok(None)` for tags this client does not know — unknown tags are
/// ignored, not errors.
pub fn decode(payload: &str) -> Result<Option<ScanEvent>, ScanError> {
    let wire: WireEvent = serde_json::from_str(payload)
        .map_err(|e| ScanError::MalformedEvent(e.to_string()))?;

    let event = match wire.kind.as_str() {
        "progress" => ScanEvent::Progress {
            percent: wire.progress.unwrap_or(0),
            message: wire.message.unwrap_or_default(),
        },
        "result" => {
            let host = wire
                .result
                .ok_or_else(|| {
                    ScanError::MalformedEvent("result event without a payload".to_string())
                })?
                .normalize()?;
            ScanEvent::Result(host)
        }
        "complete" => ScanEvent::Complete {
            message: wire.message.unwrap_or_default(),
        },
        // The stop path sends its text in `message`, scan failures in `error`.
        "error" => ScanEvent::Error {
            message: wire
                .error
                .or(wire.message)
                .unwrap_or_else(|| "scan failed".to_string()),
        },
        other => {
            debug!("ignoring unknown event tag '{other}'");
            return Ok(None);
        }
    };

    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_progress() {
        let event = decode(r#"{"type":"progress","progress":42,"message":"Ping scan progress: 42/100"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            ScanEvent::Progress {
                percent: 42,
                message: "Ping scan progress: 42/100".to_string()
            }
        );
    }

    #[test]
    fn decodes_capitalized_ping_result() {
        let event = decode(
            r#"{"type":"result","result":{"IP":"10.0.0.5","Hostname":"box","Alive":true,"RTT":2400000}}"#,
        )
        .unwrap()
        .unwrap();

        let ScanEvent::Result(host) = event else {
            panic!("expected a result event");
        };
        assert_eq!(host.ip, "10.0.0.5");
        assert_eq!(host.hostname.as_deref(), Some("box"));
        assert!(host.alive);
        assert_eq!(host.rtt_nanos, Some(2_400_000));
        assert_eq!(host.method, DiscoveryMethod::Ping);
    }

    #[test]
    fn decodes_lowercase_arp_result() {
        let event = decode(
            r#"{"type":"result","result":{"ip":"10.0.0.9","mac":"AA:BB:CC:DD:EE:FF","online":true}}"#,
        )
        .unwrap()
        .unwrap();

        let ScanEvent::Result(host) = event else {
            panic!("expected a result event");
        };
        assert!(host.alive);
        assert_eq!(host.mac.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(host.rtt_nanos, None);
        assert_eq!(host.method, DiscoveryMethod::Arp);
    }

    #[test]
    fn empty_strings_collapse_to_absence() {
        let event = decode(
            r#"{"type":"result","result":{"IP":"10.0.0.7","MAC":"","Hostname":"","Online":true}}"#,
        )
        .unwrap()
        .unwrap();

        let ScanEvent::Result(host) = event else {
            panic!("expected a result event");
        };
        assert_eq!(host.mac, None);
        assert_eq!(host.hostname, None);
    }

    #[test]
    fn unknown_tag_is_ignored() {
        assert_eq!(decode(r#"{"type":"heartbeat"}"#).unwrap(), None);
    }

    #[test]
    fn unknown_result_fields_are_tolerated() {
        // ARP entries carry fields this client never renders.
        let event = decode(
            r#"{"type":"result","result":{"IP":"10.0.0.2","Online":true,"FirstSeen":"2026-01-01T00:00:00Z","Error":""}}"#,
        )
        .unwrap()
        .unwrap();
        assert!(matches!(event, ScanEvent::Result(_)));
    }

    #[test]
    fn mixed_case_duplicates_are_rejected() {
        let err = decode(
            r#"{"type":"result","result":{"IP":"10.0.0.5","ip":"10.0.0.6","Alive":true}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScanError::MalformedEvent(_)));
    }

    #[test]
    fn result_without_address_is_rejected() {
        let err = decode(r#"{"type":"result","result":{"Alive":true}}"#).unwrap_err();
        assert!(matches!(err, ScanError::MalformedEvent(_)));
    }

    #[test]
    fn stop_error_text_comes_from_message_field() {
        let event = decode(r#"{"type":"error","message":"Scan stopped by user"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            ScanEvent::Error {
                message: "Scan stopped by user".to_string()
            }
        );
    }
}
