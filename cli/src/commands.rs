pub mod ip;
pub mod scan;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use crossnet_common::network::target::{Network, ScanType};

#[derive(Parser)]
#[command(name = "crossnet")]
#[command(version)]
#[command(about = "Terminal control panel for the CrossNet scanning service.")]
pub struct CommandLine {
    /// Base URL of the scanning service
    #[arg(long, global = true, default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Do not listen for 'q' / Ctrl-C while a scan is running
    #[arg(long, global = true)]
    pub no_input: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the service which address and network this machine is on
    #[command(alias = "i")]
    Ip,
    /// Run a scan and stream results as they arrive
    #[command(alias = "s")]
    Scan(ScanArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Network to scan in CIDR notation; detected via the service when omitted
    pub network: Option<Network>,

    /// Scan technique: ping, arp, or both
    #[arg(short = 's', long, default_value_t = ScanType::Both)]
    pub scan_type: ScanType,

    /// Concurrent workers the engine should use
    #[arg(short = 'T', long, default_value_t = 50)]
    pub threads: u32,

    /// Ping timeout in seconds
    #[arg(short = 't', long, default_value_t = 2)]
    pub timeout: u64,

    /// Write the alive results as CSV
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "crossnet-results.csv"
    )]
    pub csv: Option<PathBuf>,

    /// Write the alive results as JSON
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "crossnet-results.json"
    )]
    pub json: Option<PathBuf>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
