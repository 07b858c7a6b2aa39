#![cfg(test)]

use std::sync::Arc;

use crossnet_common::error::ScanError;
use crossnet_core::session::{ScanSession, SessionState, SessionUpdate};

use crate::session::util::{
    ScriptedService, complete, ping_result, progress, request_for, transport_fault,
};

/// Drives a streaming session until it reports a terminal state.
async fn drive(session: &mut ScanSession) -> SessionState {
    loop {
        if let SessionUpdate::Finished(state) = session.next_update().await {
            return state;
        }
    }
}

/// The reference scenario: progress, a result, an update for the same
/// address, then completion. The store must hold one reconciled entry.
#[tokio::test]
async fn session_reconciles_streamed_events() {
    let service = Arc::new(ScriptedService::replaying(vec![
        progress(10, "scanning"),
        ping_result("10.0.0.5", None),
        ping_result("10.0.0.5", Some("box")),
        complete("Scan completed"),
    ]));
    let mut session = ScanSession::new(service.clone());

    session.start(&request_for("10.0.0.0/24")).await.unwrap();
    assert_eq!(session.state(), SessionState::Streaming);
    assert_eq!(
        session.request().map(|r| r.network.as_str()),
        Some("10.0.0.0/24")
    );

    let state = drive(&mut session).await;
    assert_eq!(state, SessionState::Complete);

    assert_eq!(session.results().len(), 1);
    let host = session.results().iter().next().unwrap();
    assert_eq!(host.ip, "10.0.0.5");
    assert_eq!(host.hostname.as_deref(), Some("box"));

    assert_eq!(session.progress().percent(), 10);
    assert_eq!(session.progress().message(), "Scan completed");
}

#[tokio::test]
async fn second_start_is_rejected_without_touching_the_session() {
    let service = Arc::new(ScriptedService::replaying(vec![
        progress(50, "halfway"),
        complete(""),
    ]));
    let mut session = ScanSession::new(service.clone());

    session.start(&request_for("10.0.0.0/24")).await.unwrap();

    let second = session.start(&request_for("10.0.0.0/24")).await;
    assert!(matches!(second, Err(ScanError::SessionActive)));
    assert_eq!(session.state(), SessionState::Streaming);
    assert_eq!(service.start_count(), 1);

    // The in-flight stream is still intact and plays out normally.
    assert_eq!(drive(&mut session).await, SessionState::Complete);
    assert_eq!(session.progress().percent(), 50);
}

#[tokio::test]
async fn transport_fault_forces_the_session_into_error() {
    let service = Arc::new(ScriptedService::replaying(vec![
        progress(30, "scanning"),
        transport_fault("connection reset"),
    ]));
    let mut session = ScanSession::new(service);

    session.start(&request_for("10.0.0.0/24")).await.unwrap();
    assert_eq!(drive(&mut session).await, SessionState::Error);
    assert_eq!(session.progress().message(), "event stream fault: connection reset");
}

#[tokio::test]
async fn truncated_stream_counts_as_a_fault() {
    // The channel ends without a complete/error event.
    let service = Arc::new(ScriptedService::replaying(vec![progress(30, "scanning")]));
    let mut session = ScanSession::new(service);

    session.start(&request_for("10.0.0.0/24")).await.unwrap();
    assert_eq!(drive(&mut session).await, SessionState::Error);
}

#[tokio::test]
async fn server_reported_error_completes_the_session() {
    let service = Arc::new(ScriptedService::replaying(vec![
        progress(10, "scanning"),
        Ok(crossnet_core::events::ScanEvent::Error {
            message: "Ping scan failed: no route".to_string(),
        }),
    ]));
    let mut session = ScanSession::new(service);

    session.start(&request_for("10.0.0.0/24")).await.unwrap();
    assert_eq!(drive(&mut session).await, SessionState::Complete);
    assert_eq!(session.progress().message(), "Ping scan failed: no route");
}

#[tokio::test]
async fn refused_request_lands_in_error_and_reset_recovers() {
    let service = Arc::new(ScriptedService::refusing());
    let mut session = ScanSession::new(service);

    let err = session.start(&request_for("10.0.0.0/24")).await.unwrap_err();
    assert!(matches!(err, ScanError::Request(_)));
    assert_eq!(session.state(), SessionState::Error);
    assert!(session.results().is_empty());

    session.reset();
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.request().is_none());
}

#[tokio::test]
async fn stop_discards_queued_events_and_notifies_the_service() {
    // Events are queued on the stream but must never be processed once the
    // user stops the session.
    let service = Arc::new(ScriptedService::replaying(vec![
        ping_result("10.0.0.5", None),
        ping_result("10.0.0.6", None),
        complete(""),
    ]));
    let mut session = ScanSession::new(service.clone());

    session.start(&request_for("10.0.0.0/24")).await.unwrap();
    let notification = session.stop().expect("an active session hands back the task");

    assert_eq!(session.state(), SessionState::Stopped);
    assert!(matches!(
        session.next_update().await,
        SessionUpdate::Finished(SessionState::Stopped)
    ));
    assert!(session.results().is_empty());
    assert_eq!(session.progress().message(), "Scan stopped by user");

    notification.await.unwrap();
    assert_eq!(service.stop_count(), 1);
}

#[tokio::test]
async fn stop_outside_an_active_session_is_a_no_op() {
    let service = Arc::new(ScriptedService::replaying(vec![complete("")]));
    let mut session = ScanSession::new(service.clone());

    assert!(session.stop().is_none());
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(service.stop_count(), 0);

    session.start(&request_for("10.0.0.0/24")).await.unwrap();
    assert_eq!(drive(&mut session).await, SessionState::Complete);

    // Already complete; a late stop must not rewrite the outcome.
    assert!(session.stop().is_none());
    assert_eq!(session.state(), SessionState::Complete);
    assert_eq!(service.stop_count(), 0);
}
