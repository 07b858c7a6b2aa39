use colored::*;

use crossnet_common::network::host::{DiscoveryMethod, HostResult};

use crate::terminal::colors;

type Detail = (String, ColoredString);

pub fn status_to_detail(method: DiscoveryMethod) -> Detail {
    let color = match method {
        DiscoveryMethod::Ping => colors::STATUS_UP,
        DiscoveryMethod::Arp => colors::STATUS_ACTIVE,
    };
    (
        String::from("Status"),
        method.status_label().color(color).bold(),
    )
}

/// Builds the detail rows rendered under a host's tree head. Optional fields
/// the service never reported are simply absent.
pub fn host_to_details(host: &HostResult) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![(
        String::from("IPv4"),
        host.ip.color(colors::IPV4_ADDR),
    )];

    if let Some(mac) = &host.mac {
        details.push((String::from("MAC"), mac.to_uppercase().color(colors::ACCENT)));
    }
    if let Some(vendor) = &host.vendor {
        details.push((String::from("Vendor"), vendor.normal()));
    }

    details.push(status_to_detail(host.method));

    if let Some(rtt) = host.response_time() {
        details.push((String::from("RTT"), rtt.yellow()));
    }
    details.push((String::from("Method"), host.method.to_string().normal()));

    details
}

/// One-line announcement printed above the bar when a live host arrives.
pub fn live_host_line(host: &HostResult, alive_count: usize) -> String {
    let name = host
        .hostname
        .as_deref()
        .map(|h| format!(" ({h})"))
        .unwrap_or_default();
    let rtt = host
        .response_time()
        .map(|r| format!(" in {r}"))
        .unwrap_or_default();

    format!(
        "{} {}{}{} {} {}",
        "[+]".green().bold(),
        host.ip.color(colors::IPV4_ADDR),
        name.dimmed(),
        rtt,
        "·".color(colors::SEPARATOR),
        format!("{alive_count} alive").bold()
    )
}
