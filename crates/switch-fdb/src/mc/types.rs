//! Multicast group types.

use crate::uc::FdbKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use switch_types::LogicalPort;

/// Per-bridge ceiling on multicast groups.
pub const MC_MAX_GROUPS: usize = 4_096;

/// A multicast forwarding group: (VLAN, group MAC) mapped to member ports.
///
/// The member set is never empty in the store; removing the last member
/// deletes the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McFdbEntry {
    pub key: FdbKey,
    pub ports: BTreeSet<LogicalPort>,
}

impl McFdbEntry {
    /// Creates a group with the given members.
    pub fn new(key: FdbKey, ports: impl IntoIterator<Item = LogicalPort>) -> Self {
        Self {
            key,
            ports: ports.into_iter().collect(),
        }
    }

    /// Returns the member ports in ascending order.
    pub fn members(&self) -> Vec<LogicalPort> {
        self.ports.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use switch_types::{MacAddress, VlanId};

    #[test]
    fn test_members_dedup_and_sort() {
        let key = FdbKey::new(
            VlanId::new(10).unwrap(),
            MacAddress::new([0x01, 0x00, 0x5e, 0x00, 0x00, 0x01]),
        );
        let entry = McFdbEntry::new(
            key,
            [
                LogicalPort::new(5),
                LogicalPort::new(2),
                LogicalPort::new(5),
            ],
        );
        assert_eq!(entry.members(), vec![LogicalPort::new(2), LogicalPort::new(5)]);
    }
}
