//! Learning policy types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use switch_types::{BridgeId, LogicalPort, MacAddress, VlanId};

/// Policy for automatic MAC learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearnMode {
    /// New MACs are never learned; events are dropped.
    Disabled,
    /// New MACs are learned unconditionally, subject to limits and capacity.
    Automatic,
    /// New MACs are learned only when the authorization oracle approves.
    Controlled,
}

impl fmt::Display for LearnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearnMode::Disabled => write!(f, "disabled"),
            LearnMode::Automatic => write!(f, "automatic"),
            LearnMode::Controlled => write!(f, "controlled"),
        }
    }
}

/// A hardware learning notification from the data plane.
///
/// Delivered asynchronously at arbitrary rate; the control plane applies
/// learn-mode and limit checks before admission and never retries a dropped
/// event (the MAC is re-learned on its next packet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnEvent {
    pub bridge: BridgeId,
    pub vlan: VlanId,
    pub mac: MacAddress,
    /// Ingress port the MAC was seen on; becomes the entry's egress port.
    pub port: LogicalPort,
    /// Data-plane activity timestamp for the observation.
    pub seen_at: DateTime<Utc>,
}

/// Disposition of one learning event.
///
/// Dropped events are not errors; the feed has no caller to fail toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnOutcome {
    /// Entry created, refreshed, or moved to a new port.
    Admitted,
    /// Effective learn mode is Disabled.
    DroppedDisabled,
    /// Controlled mode and the oracle rejected (or none is registered).
    DroppedDenied,
    /// A port- or VLAN-scoped learn limit is exhausted.
    DroppedLimit,
    /// The bridge table is full.
    DroppedCapacity,
    /// The source MAC is not a valid unicast forwarding key.
    DroppedInvalid,
    /// The key is already present as a static entry, which learning never
    /// overrides.
    DroppedStatic,
}

impl LearnOutcome {
    /// Returns true if the event resulted in a stored or refreshed entry.
    pub fn is_admitted(&self) -> bool {
        *self == LearnOutcome::Admitted
    }
}
