use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::{info, warn};

use crossnet_common::config::Config;
use crossnet_common::network::host::HostResult;
use crossnet_common::network::target::{Network, ScanRequest};
use crossnet_core::export::{self, ExportFormat};
use crossnet_core::service::ScanService;
use crossnet_core::service::http::HttpScanService;
use crossnet_core::session::{ScanSession, SessionState, SessionUpdate};

use crate::commands::ScanArgs;
use crate::terminal::{colors, format, print, progress};
use crate::terminal::input::StopListener;

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(120);

pub async fn scan(args: ScanArgs, cfg: &Config) -> anyhow::Result<()> {
    print::header("starting scan session");

    let service = Arc::new(HttpScanService::new(&cfg.server)?);

    let network = match args.network {
        Some(network) => network,
        None => detect_network(service.as_ref()).await?,
    };

    let request = ScanRequest {
        network,
        scan_type: args.scan_type,
        threads: args.threads,
        timeout: args.timeout,
    };

    let mut session = ScanSession::new(service);
    session.start(&request).await?;
    info!(
        "scanning {} via {} ({} workers, {}s timeout)",
        request.network, request.scan_type, request.threads, request.timeout
    );

    let final_state = stream_session(&mut session, cfg).await;

    render_results(&session, final_state);
    write_exports(&session, args.csv.as_deref(), args.json.as_deref())?;

    if final_state == SessionState::Error {
        anyhow::bail!("scan failed: {}", session.progress().message());
    }
    Ok(())
}

/// Drives the session to a terminal state, rendering progress and live
/// results as they arrive and polling for a stop request in between.
async fn stream_session(session: &mut ScanSession, cfg: &Config) -> SessionState {
    let listener = (!cfg.disable_input).then(StopListener::spawn);
    if listener.is_some() {
        info!("press 'q' or Ctrl-C to stop the scan");
    }

    let bar = progress::scan_bar();
    bar.set_message("Waiting for scan events...");

    let started = Instant::now();
    let mut stop_notification = None;

    let final_state = loop {
        if listener.as_ref().is_some_and(StopListener::stop_requested) {
            stop_notification = session.stop();
        }

        // Bounded wait so the stop key stays responsive; a timeout just
        // loops back around, it never drops an event.
        let update = match tokio::time::timeout(STOP_POLL_INTERVAL, session.next_update()).await {
            Ok(update) => update,
            Err(_) => continue,
        };

        match update {
            SessionUpdate::Progress { percent, message } => {
                bar.set_position(percent as u64);
                bar.set_message(message);
            }
            SessionUpdate::Host(host) => {
                if host.alive {
                    bar.println(format::live_host_line(
                        &host,
                        session.results().alive_count(),
                    ));
                }
            }
            SessionUpdate::Finished(state) => break state,
        }
    };

    bar.finish_and_clear();
    drop(listener);

    // Give the detached stop notification a chance to reach the service
    // before the process exits; its outcome stays best-effort.
    if let Some(notification) = stop_notification {
        let _ = tokio::time::timeout(Duration::from_secs(2), notification).await;
    }

    info!(
        "session finished after {:.2}s",
        started.elapsed().as_secs_f64()
    );
    final_state
}

async fn detect_network(service: &HttpScanService) -> anyhow::Result<Network> {
    let detected = service
        .current_ip()
        .await
        .context("no network given and IP detection failed")?;

    let network = if detected.network.is_empty() {
        Network::surrounding_ip(&detected.ip)
    } else {
        detected.network.parse().ok()
    };

    let network = network.with_context(|| {
        format!("service returned no usable network (ip: '{}')", detected.ip)
    })?;

    info!("detected network {network} around {}", detected.ip);
    Ok(network)
}

fn render_results(session: &ScanSession, state: SessionState) {
    let alive = session.results().alive_subset();

    if alive.is_empty() {
        print::header("zero hosts detected");
        print::no_results();
        print_summary(session, state, 0);
        return;
    }

    print::header("discovered hosts");
    for (idx, host) in alive.iter().enumerate() {
        print_host_tree(host, idx);
        if idx + 1 != alive.len() {
            print::blank();
        }
    }
    print_summary(session, state, alive.len());
}

fn print_host_tree(host: &HostResult, idx: usize) {
    let hostname = host.hostname.as_deref().unwrap_or("No hostname");
    print::tree_head(idx, hostname);
    print::as_tree_one_level(format::host_to_details(host));
}

fn print_summary(session: &ScanSession, state: SessionState, alive_count: usize) {
    let counted: ColoredString = format!("{alive_count} active hosts").bold().green();
    let output: String = match state {
        SessionState::Complete => format!("Scan complete: {counted} identified"),
        SessionState::Stopped => format!("Scan stopped by user: {counted} identified so far"),
        _ => format!(
            "Scan aborted ({}): {counted} identified before the fault",
            session.progress().message()
        ),
    };

    print::fat_separator();
    print::centerln(&output.color(colors::TEXT_DEFAULT).to_string());
}

fn write_exports(
    session: &ScanSession,
    csv: Option<&Path>,
    json: Option<&Path>,
) -> anyhow::Result<()> {
    for (path, fmt) in [(csv, ExportFormat::Csv), (json, ExportFormat::Json)] {
        let Some(path) = path else { continue };

        match export::export(session.results(), fmt)? {
            Some(artifact) => {
                fs::write(path, &artifact.bytes)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!("wrote {}", path.display());
            }
            None => warn!("nothing to export, {} not written", path.display()),
        }
    }
    Ok(())
}
