//! # Result Store
//!
//! In-memory, insertion-ordered collection of discovered hosts, keyed by
//! address. A repeated address replaces its entry in place so the rendered
//! table never jumps; a new address appends. Linear lookup is fine at scan
//! scales (tens to low thousands of hosts).

use crossnet_common::network::host::HostResult;

#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    hosts: Vec<HostResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces by address, preserving first-seen order.
    pub fn upsert(&mut self, host: HostResult) {
        match self.hosts.iter_mut().find(|h| h.ip == host.ip) {
            Some(slot) => *slot = host,
            None => self.hosts.push(host),
        }
    }

    pub fn clear(&mut self) {
        self.hosts.clear();
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostResult> {
        self.hosts.iter()
    }

    /// The only projection ever rendered or exported: alive entries, in
    /// insertion order.
    pub fn alive_subset(&self) -> Vec<&HostResult> {
        self.hosts.iter().filter(|h| h.alive).collect()
    }

    pub fn alive_count(&self) -> usize {
        self.hosts.iter().filter(|h| h.alive).count()
    }
}
