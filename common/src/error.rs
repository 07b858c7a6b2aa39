//! # Error Taxonomy
//!
//! Every failure the session controller can surface, grouped by where it
//! originates: local validation, the scan-start request, or the push stream.
//!
//! Stop notifications are deliberately absent — a failed stop is logged and
//! swallowed, never surfaced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// Rejected before any request is sent.
    #[error("network must not be empty")]
    EmptyNetwork,

    /// Rejected before any request is sent.
    #[error("invalid network '{network}': {reason}")]
    InvalidNetwork { network: String, reason: String },

    /// A second start was attempted while a session is in flight.
    #[error("a scan is already in progress")]
    SessionActive,

    /// The scan-start or IP-detection request failed, or the service
    /// answered with a non-success status.
    #[error("request failed: {0}")]
    Request(String),

    /// Transport-level break in the push channel. Treated as an implicit
    /// scan-complete-with-error by the session.
    #[error("event stream fault: {0}")]
    StreamFault(String),

    /// An event frame that could not be decoded into a known shape.
    /// Includes payloads carrying the same logical field in two spellings,
    /// which are rejected rather than resolved by guessing.
    #[error("malformed event payload: {0}")]
    MalformedEvent(String),

    /// Serializing an export artifact failed.
    #[error("export failed: {0}")]
    Export(String),
}
