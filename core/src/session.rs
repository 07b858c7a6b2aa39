//! # Scan Session Controller
//!
//! Owns the lifecycle of one scan attempt: submit the request, consume the
//! push stream, feed the result store and progress projection, and decide
//! the terminal state. All mutation happens on the single task that drives
//! [`ScanSession::next_update`]; the only handle that escapes is the service
//! reference used by the detached stop notification, so no further locking
//! is needed.

use std::sync::Arc;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crossnet_common::error::ScanError;
use crossnet_common::network::host::HostResult;
use crossnet_common::network::target::ScanRequest;

use crate::events::ScanEvent;
use crate::progress::Progress;
use crate::results::ResultStore;
use crate::service::{EventStream, ScanService};

/// Where a session is in its lifecycle. Transitions are driven only by
/// stream events or an explicit stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Starting,
    Streaming,
    Complete,
    Stopped,
    Error,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Complete | SessionState::Stopped | SessionState::Error
        )
    }

    fn is_active(&self) -> bool {
        matches!(self, SessionState::Starting | SessionState::Streaming)
    }
}

/// What the latest event did to the session, for the layer rendering it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Progress { percent: u8, message: String },
    Host(HostResult),
    Finished(SessionState),
}

pub struct ScanSession {
    service: Arc<dyn ScanService>,
    state: SessionState,
    request: Option<ScanRequest>,
    store: ResultStore,
    progress: Progress,
    stream: Option<EventStream>,
}

impl ScanSession {
    pub fn new(service: Arc<dyn ScanService>) -> Self {
        Self {
            service,
            state: SessionState::default(),
            request: None,
            store: ResultStore::new(),
            progress: Progress::default(),
            stream: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The configuration of the current (or last finished) attempt.
    pub fn request(&self) -> Option<&ScanRequest> {
        self.request.as_ref()
    }

    pub fn results(&self) -> &ResultStore {
        &self.store
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Submits a scan and opens the push stream.
    ///
    /// Fails fast while another session is in flight, leaving it untouched.
    /// A rejected request or an unopenable stream puts the session into
    /// `Error`; [`reset`](Self::reset) returns it to `Idle` — recovery is
    /// always user-initiated.
    pub async fn start(&mut self, request: &ScanRequest) -> Result<(), ScanError> {
        if self.state != SessionState::Idle {
            return Err(ScanError::SessionActive);
        }

        self.state = SessionState::Starting;
        self.request = Some(request.clone());
        self.store.clear();
        self.progress.reset();

        if let Err(err) = self.service.start_scan(request).await {
            self.state = SessionState::Error;
            self.progress.note(&err.to_string());
            return Err(err);
        }

        match self.service.subscribe().await {
            Ok(stream) => {
                self.stream = Some(stream);
                self.state = SessionState::Streaming;
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Error;
                self.progress.note(&err.to_string());
                Err(err)
            }
        }
    }

    /// Pulls the next event off the stream and applies it, in strict arrival
    /// order. Returns `Finished` once the session has reached a terminal
    /// state; transport faults and truncated streams land in `Error` so the
    /// caller can never wedge in `Streaming`.
    pub async fn next_update(&mut self) -> SessionUpdate {
        let item = match self.stream.as_mut() {
            Some(stream) => stream.next().await,
            None => return SessionUpdate::Finished(self.state),
        };

        match item {
            Some(Ok(event)) => self.apply(event),
            Some(Err(err)) => {
                warn!("{err}");
                self.fail(&err.to_string());
                SessionUpdate::Finished(self.state)
            }
            None => {
                // The server closes the channel after `complete`/`error`
                // events, which already detached the stream; ending up here
                // means the channel broke mid-scan.
                self.fail("event stream closed unexpectedly");
                SessionUpdate::Finished(self.state)
            }
        }
    }

    /// Stops the running session. The stream subscription is dropped first,
    /// synchronously, so no queued event is processed after this call; the
    /// stop notification then goes out on a detached task and its outcome is
    /// only ever logged. The returned handle lets a caller that is about to
    /// exit wait the notification out — nothing requires it. Stopping a
    /// session that is not active is a no-op.
    pub fn stop(&mut self) -> Option<JoinHandle<()>> {
        if !self.state.is_active() {
            return None;
        }

        self.stream = None;

        let service = self.service.clone();
        let notification = tokio::spawn(async move {
            if let Err(err) = service.stop_scan().await {
                warn!("stop notification failed: {err}");
            }
        });

        self.state = SessionState::Stopped;
        self.progress.note("Scan stopped by user");
        Some(notification)
    }

    /// Returns a finished session to `Idle` so a new scan can start. Results
    /// and progress stay readable until the next start clears them.
    pub fn reset(&mut self) {
        if self.state.is_terminal() {
            self.state = SessionState::Idle;
            self.request = None;
        }
    }

    fn apply(&mut self, event: ScanEvent) -> SessionUpdate {
        match event {
            ScanEvent::Progress { percent, message } => {
                self.progress.report(percent, &message);
                SessionUpdate::Progress {
                    percent: self.progress.percent(),
                    message: self.progress.message().to_string(),
                }
            }
            ScanEvent::Result(host) => {
                debug!("result for {}", host.ip);
                self.store.upsert(host.clone());
                SessionUpdate::Host(host)
            }
            ScanEvent::Complete { message } => {
                self.stream = None;
                self.state = SessionState::Complete;
                if !message.is_empty() {
                    self.progress.note(&message);
                }
                SessionUpdate::Finished(self.state)
            }
            ScanEvent::Error { message } => {
                // A server-reported error still completes the scan; only
                // transport faults land in `Error`.
                warn!("service reported: {message}");
                self.stream = None;
                self.state = SessionState::Complete;
                self.progress.note(&message);
                SessionUpdate::Finished(self.state)
            }
        }
    }

    fn fail(&mut self, reason: &str) {
        self.stream = None;
        self.state = SessionState::Error;
        self.progress.note(reason);
    }
}
