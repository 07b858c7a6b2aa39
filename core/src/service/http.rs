//! HTTP adapter for the scanning service.
//!
//! Request/response endpoints are plain JSON over `reqwest`; the progress
//! stream is the service's server-sent-events channel, decoded frame by
//! frame into normalized [`ScanEvent`]s. Malformed frames are logged and
//! skipped so one bad payload cannot kill a running session; transport
//! faults are yielded to the session, which treats them as terminal.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use serde::Deserialize;
use tracing::warn;

use crossnet_common::error::ScanError;
use crossnet_common::network::target::ScanRequest;

use crate::events::{self, ScanEvent};
use crate::service::sse::SseDecoder;
use crate::service::{CurrentIp, EventStream, ScanService};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire shape of `/api/current-ip`.
#[derive(Debug, Deserialize)]
struct CurrentIpResponse {
    success: bool,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    network: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpScanService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScanService {
    /// Builds a client for the service at `base_url`.
    ///
    /// Only the connection attempt is bounded; the progress stream stays
    /// open for the lifetime of a scan, so no overall request timeout is
    /// set.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ScanError::Request(e.to_string()))?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ScanService for HttpScanService {
    async fn current_ip(&self) -> Result<CurrentIp, ScanError> {
        let response = self
            .client
            .get(self.url("/api/current-ip"))
            .send()
            .await
            .map_err(|e| ScanError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScanError::Request(format!(
                "IP detection answered {}",
                response.status()
            )));
        }

        let body: CurrentIpResponse = response
            .json()
            .await
            .map_err(|e| ScanError::Request(e.to_string()))?;

        if !body.success {
            return Err(ScanError::Request(
                body.error.unwrap_or_else(|| "IP detection failed".to_string()),
            ));
        }

        Ok(CurrentIp {
            ip: body.ip.unwrap_or_default(),
            network: body.network.unwrap_or_default(),
        })
    }

    async fn start_scan(&self, request: &ScanRequest) -> Result<(), ScanError> {
        let response = self
            .client
            .post(self.url("/api/scan"))
            .json(request)
            .send()
            .await
            .map_err(|e| ScanError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The service answers 409 with a plain-text reason when a scan
            // is already running; pass that through.
            let reason = response.text().await.unwrap_or_default();
            let reason = reason.trim();
            return Err(ScanError::Request(if reason.is_empty() {
                format!("scan request refused ({status})")
            } else {
                format!("scan request refused ({status}): {reason}")
            }));
        }

        Ok(())
    }

    async fn stop_scan(&self) -> Result<(), ScanError> {
        let response = self
            .client
            .post(self.url("/api/stop-scan"))
            .send()
            .await
            .map_err(|e| ScanError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScanError::Request(format!(
                "stop notification answered {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn subscribe(&self) -> Result<EventStream, ScanError> {
        let response = self
            .client
            .get(self.url("/api/scan-progress"))
            .send()
            .await
            .map_err(|e| ScanError::StreamFault(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScanError::StreamFault(format!(
                "progress stream answered {}",
                response.status()
            )));
        }

        Ok(event_stream(response.bytes_stream().boxed()).boxed())
    }
}

struct StreamState<S> {
    bytes: S,
    decoder: SseDecoder,
    ready: VecDeque<ScanEvent>,
    faulted: bool,
}

/// Adapts the raw byte stream into a stream of normalized events, preserving
/// arrival order. Holds nothing beyond the bytes of the frame currently
/// being assembled.
fn event_stream<S, B>(bytes: S) -> impl futures::Stream<Item = Result<ScanEvent, ScanError>> + Send
where
    S: futures::Stream<Item = reqwest::Result<B>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = StreamState {
        bytes,
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        faulted: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.ready.pop_front() {
                return Some((Ok(event), state));
            }
            if state.faulted {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for payload in state.decoder.feed(chunk.as_ref()) {
                        match events::decode(&payload) {
                            Ok(Some(event)) => state.ready.push_back(event),
                            Ok(None) => {}
                            Err(err) => warn!("skipping event: {err}"),
                        }
                    }
                }
                Some(Err(err)) => {
                    state.faulted = true;
                    return Some((Err(ScanError::StreamFault(err.to_string())), state));
                }
                None => return None,
            }
        }
    })
}
