//! # Result Export
//!
//! Serializes the alive projection of a result store into a downloadable
//! artifact. An empty projection is a user-facing no-op, never an error.

use crossnet_common::error::ScanError;
use crossnet_common::network::host::HostResult;

use crate::results::ResultStore;

const CSV_HEADER: [&str; 6] = [
    "IP Address",
    "MAC Address",
    "Hostname",
    "Status",
    "Response Time",
    "Method",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn suggested_filename(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "crossnet-results.csv",
            ExportFormat::Json => "crossnet-results.json",
        }
    }
}

/// A serialized export, ready to be written wherever the caller chooses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: &'static str,
    pub bytes: Vec<u8>,
}

/// Serializes the store's alive subset. Returns `Ok(None)` when there is
/// nothing to export.
pub fn export(store: &ResultStore, format: ExportFormat) -> Result<Option<Artifact>, ScanError> {
    let subset = store.alive_subset();
    if subset.is_empty() {
        return Ok(None);
    }

    let bytes = match format {
        ExportFormat::Csv => csv_rows(&subset).into_bytes(),
        ExportFormat::Json => {
            serde_json::to_vec_pretty(&subset).map_err(|e| ScanError::Export(e.to_string()))?
        }
    };

    Ok(Some(Artifact {
        filename: format.suggested_filename(),
        bytes,
    }))
}

/// Fixed six-column layout, every field quoted, missing optionals empty.
fn csv_rows(subset: &[&HostResult]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_HEADER.iter().map(|s| s.to_string()));

    for host in subset {
        push_row(
            &mut out,
            [
                host.ip.clone(),
                host.mac.clone().unwrap_or_default(),
                host.hostname.clone().unwrap_or_default(),
                host.method.status_label().to_string(),
                host.response_time().unwrap_or_default(),
                host.method.to_string(),
            ]
            .into_iter(),
        );
    }

    out
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let row: Vec<String> = fields
        .map(|f| format!("\"{}\"", f.replace('"', "\"\"")))
        .collect();
    out.push_str(&row.join(","));
    out.push('\n');
}
