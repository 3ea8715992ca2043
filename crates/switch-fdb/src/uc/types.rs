//! Unicast FDB entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use switch_types::{LogicalPort, MacAddress, VlanId};

/// Per-bridge ceiling on stored entries (static + dynamic) and the upper
/// bound for learn-limit values.
pub const FDB_MAX_ENTRIES: usize = 16_384;

/// Upper bound on the entry list of one bulk set call.
pub const FDB_MAX_BATCH: usize = 256;

/// Whether an entry was configured or learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Configured explicitly; exempt from aging and learn limits.
    Static,
    /// Learned from traffic; subject to aging and learn limits.
    Dynamic,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Static => write!(f, "static"),
            EntryType::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Forwarding-table key within one bridge.
///
/// Ordered by (VLAN, MAC); this is the iteration order of get-first /
/// get-next and the cursor type for resuming iteration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FdbKey {
    pub vlan: VlanId,
    pub mac: MacAddress,
}

impl FdbKey {
    /// Creates a key from its VLAN and MAC components.
    pub fn new(vlan: VlanId, mac: MacAddress) -> Self {
        Self { vlan, mac }
    }
}

impl fmt::Display for FdbKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vlan, self.mac)
    }
}

/// Caller-supplied description of a unicast entry for bulk add calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UcEntrySpec {
    pub vlan: VlanId,
    pub mac: MacAddress,
    pub port: LogicalPort,
    pub entry_type: EntryType,
}

impl UcEntrySpec {
    /// Returns the forwarding-table key of this spec.
    pub fn key(&self) -> FdbKey {
        FdbKey::new(self.vlan, self.mac)
    }
}

/// A stored unicast forwarding entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UcFdbEntry {
    pub key: FdbKey,
    /// Egress port frames to this MAC are forwarded out of.
    pub port: LogicalPort,
    pub entry_type: EntryType,
    /// Last time this entry was learned or refreshed by the activity probe.
    /// Not meaningful for static entries.
    pub last_seen: DateTime<Utc>,
}

impl UcFdbEntry {
    /// Creates an entry, stamping `last_seen` with the given time.
    pub fn new(
        key: FdbKey,
        port: LogicalPort,
        entry_type: EntryType,
        last_seen: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            port,
            entry_type,
            last_seen,
        }
    }

    /// Returns true if this entry is subject to aging and learn limits.
    pub fn is_dynamic(&self) -> bool {
        self.entry_type == EntryType::Dynamic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mac(last: u8) -> MacAddress {
        MacAddress::new([0x00, 0x11, 0x22, 0x33, 0x44, last])
    }

    #[test]
    fn test_key_order_is_vlan_major_mac_minor() {
        let v10 = VlanId::new(10).unwrap();
        let v20 = VlanId::new(20).unwrap();

        let a = FdbKey::new(v10, mac(0x02));
        let b = FdbKey::new(v10, mac(0x03));
        let c = FdbKey::new(v20, mac(0x01));

        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_key_display() {
        let key = FdbKey::new(VlanId::new(10).unwrap(), mac(0x01));
        assert_eq!(key.to_string(), "10/00:11:22:33:44:01");
    }

    #[test]
    fn test_spec_key() {
        let spec = UcEntrySpec {
            vlan: VlanId::new(10).unwrap(),
            mac: mac(0x01),
            port: LogicalPort::new(3),
            entry_type: EntryType::Static,
        };
        assert_eq!(spec.key(), FdbKey::new(spec.vlan, spec.mac));
    }
}
