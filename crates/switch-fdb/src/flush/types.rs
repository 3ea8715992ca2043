//! Flush scopes and statistics.

use crate::uc::UcFdbEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use switch_types::{LogicalPort, VlanId};

/// Predicate selecting unicast entries to flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushScope {
    /// Every entry in the bridge.
    All,
    /// Entries whose egress port matches, across all VLANs.
    Port(LogicalPort),
    /// Entries in the VLAN, across all ports.
    Vlan(VlanId),
    /// Entries matching both the VLAN and the port.
    PortVlan(VlanId, LogicalPort),
}

impl FlushScope {
    /// Returns true if the entry falls inside this scope.
    pub fn matches(&self, entry: &UcFdbEntry) -> bool {
        match self {
            FlushScope::All => true,
            FlushScope::Port(port) => entry.port == *port,
            FlushScope::Vlan(vlan) => entry.key.vlan == *vlan,
            FlushScope::PortVlan(vlan, port) => {
                entry.key.vlan == *vlan && entry.port == *port
            }
        }
    }
}

impl fmt::Display for FlushScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlushScope::All => write!(f, "all"),
            FlushScope::Port(port) => write!(f, "{}", port),
            FlushScope::Vlan(vlan) => write!(f, "vlan{}", vlan),
            FlushScope::PortVlan(vlan, port) => write!(f, "vlan{}/{}", vlan, port),
        }
    }
}

/// Predicate selecting multicast groups to flush.
///
/// Multicast flush has no port scope; groups are removed whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McFlushScope {
    /// Every group in the bridge.
    All,
    /// Groups in the VLAN.
    Vlan(VlanId),
}

impl fmt::Display for McFlushScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            McFlushScope::All => write!(f, "all"),
            McFlushScope::Vlan(vlan) => write!(f, "vlan{}", vlan),
        }
    }
}

/// Per-bridge flush counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlushStats {
    pub full_flushes: u64,
    pub port_flushes: u64,
    pub vlan_flushes: u64,
    pub port_vlan_flushes: u64,
    pub mc_flushes: u64,
    pub entries_flushed: u64,
}

impl FlushStats {
    /// Records one unicast flush invocation and its removal count.
    pub fn record_uc(&mut self, scope: &FlushScope, removed: usize) {
        match scope {
            FlushScope::All => self.full_flushes += 1,
            FlushScope::Port(_) => self.port_flushes += 1,
            FlushScope::Vlan(_) => self.vlan_flushes += 1,
            FlushScope::PortVlan(_, _) => self.port_vlan_flushes += 1,
        }
        self.entries_flushed += removed as u64;
    }

    /// Records one multicast flush invocation and its removal count.
    pub fn record_mc(&mut self, removed: usize) {
        self.mc_flushes += 1;
        self.entries_flushed += removed as u64;
    }
}
