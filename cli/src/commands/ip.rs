use colored::*;

use crossnet_common::config::Config;
use crossnet_common::network::target::Network;
use crossnet_core::service::ScanService;
use crossnet_core::service::http::HttpScanService;

use crate::terminal::{colors, print};

pub async fn current_ip(cfg: &Config) -> anyhow::Result<()> {
    print::header("current address");

    let service = HttpScanService::new(&cfg.server)?;
    let detected = service.current_ip().await?;

    print::set_key_width(&["IPv4", "Network"]);
    print::aligned_line("IPv4", detected.ip.color(colors::IPV4_ADDR));

    // Older service builds leave the network blank; fall back to the /24
    // around the detected address, the same default the panel pre-fills.
    let network = if detected.network.is_empty() {
        Network::surrounding_ip(&detected.ip).map(|n| n.to_string())
    } else {
        Some(detected.network)
    };

    match network {
        Some(network) => print::aligned_line("Network", network.color(colors::ACCENT)),
        None => print::aligned_line("Network", "unknown".dimmed()),
    }

    Ok(())
}
