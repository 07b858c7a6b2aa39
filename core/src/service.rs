//! The central **abstraction** for talking to the scanning service.
//!
//! This module defines the unified interface the session controller depends
//! on. High-level code holds the trait object and never knows whether events
//! arrive from a live HTTP endpoint or a scripted fixture; the concrete
//! transport lives in [`http`].

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Deserialize;

use crossnet_common::error::ScanError;
use crossnet_common::network::target::ScanRequest;

use crate::events::ScanEvent;

pub mod http;
mod sse;

/// The push stream as the session consumes it: already framed, decoded and
/// normalized. A yielded `Err` is a transport fault; the end of the stream
/// is the server closing the channel.
pub type EventStream = BoxStream<'static, Result<ScanEvent, ScanError>>;

/// The address/network pair the service detected for this machine.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentIp {
    pub ip: String,
    pub network: String,
}

/// Client-side port onto the scanning service.
#[async_trait]
pub trait ScanService: Send + Sync {
    /// Asks the service which address and network this machine is on.
    async fn current_ip(&self) -> Result<CurrentIp, ScanError>;

    /// Submits a scan request. `Ok` means the service accepted it and will
    /// publish events on the progress stream.
    async fn start_scan(&self, request: &ScanRequest) -> Result<(), ScanError>;

    /// Best-effort stop notification. Callers are expected to log failures
    /// rather than surface them.
    async fn stop_scan(&self) -> Result<(), ScanError>;

    /// Opens the progress stream for the running scan.
    async fn subscribe(&self) -> Result<EventStream, ScanError>;
}
