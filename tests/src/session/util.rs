#![cfg(test)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;

use crossnet_common::error::ScanError;
use crossnet_common::network::host::{DiscoveryMethod, HostResult};
use crossnet_common::network::target::{Network, ScanRequest, ScanType};
use crossnet_core::events::ScanEvent;
use crossnet_core::service::{CurrentIp, EventStream, ScanService};

/// Scripted stand-in for the scanning service: accepts or refuses the start
/// request, counts start/stop calls, and replays a fixed event sequence on
/// subscribe.
pub struct ScriptedService {
    accept: bool,
    events: Mutex<Option<Vec<Result<ScanEvent, ScanError>>>>,
    pub started: AtomicUsize,
    pub stopped: AtomicUsize,
}

impl ScriptedService {
    pub fn replaying(events: Vec<Result<ScanEvent, ScanError>>) -> Self {
        Self {
            accept: true,
            events: Mutex::new(Some(events)),
            started: AtomicUsize::new(0),
            stopped: AtomicUsize::new(0),
        }
    }

    pub fn refusing() -> Self {
        Self {
            accept: false,
            events: Mutex::new(None),
            started: AtomicUsize::new(0),
            stopped: AtomicUsize::new(0),
        }
    }

    pub fn stop_count(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn start_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScanService for ScriptedService {
    async fn current_ip(&self) -> Result<CurrentIp, ScanError> {
        Ok(CurrentIp {
            ip: "192.168.1.10".to_string(),
            network: "192.168.1.0/24".to_string(),
        })
    }

    async fn start_scan(&self, _request: &ScanRequest) -> Result<(), ScanError> {
        if !self.accept {
            return Err(ScanError::Request(
                "scan request refused (409 Conflict): Scan already in progress".to_string(),
            ));
        }
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_scan(&self) -> Result<(), ScanError> {
        self.stopped.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(&self) -> Result<EventStream, ScanError> {
        let events = self
            .events
            .lock()
            .expect("events lock poisoned")
            .take()
            .ok_or_else(|| ScanError::StreamFault("no scripted events".to_string()))?;

        Ok(stream::iter(events).boxed())
    }
}

pub fn request_for(network: &str) -> ScanRequest {
    ScanRequest {
        network: network.parse::<Network>().expect("test network must parse"),
        scan_type: ScanType::Both,
        threads: 50,
        timeout: 2,
    }
}

pub fn progress(percent: i64, message: &str) -> Result<ScanEvent, ScanError> {
    Ok(ScanEvent::Progress {
        percent,
        message: message.to_string(),
    })
}

pub fn ping_result(ip: &str, hostname: Option<&str>) -> Result<ScanEvent, ScanError> {
    Ok(ScanEvent::Result(HostResult {
        ip: ip.to_string(),
        mac: None,
        hostname: hostname.map(str::to_string),
        vendor: None,
        alive: true,
        rtt_nanos: Some(2_400_000),
        method: DiscoveryMethod::Ping,
    }))
}

pub fn complete(message: &str) -> Result<ScanEvent, ScanError> {
    Ok(ScanEvent::Complete {
        message: message.to_string(),
    })
}

pub fn transport_fault(reason: &str) -> Result<ScanEvent, ScanError> {
    Err(ScanError::StreamFault(reason.to_string()))
}
