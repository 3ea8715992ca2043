//! Multicast group storage.

use super::types::McFdbEntry;
use crate::uc::FdbKey;
use std::collections::{BTreeMap, BTreeSet};
use switch_types::{LogicalPort, VlanId};

/// One bridge's multicast groups, keyed by (VLAN, group MAC).
#[derive(Debug, Default)]
pub struct McGroupTable {
    groups: BTreeMap<FdbKey, BTreeSet<LogicalPort>>,
}

impl McGroupTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no groups exist.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns true if the group exists.
    pub fn contains(&self, key: &FdbKey) -> bool {
        self.groups.contains_key(key)
    }

    /// Returns the group's member ports in ascending order, if present.
    pub fn get(&self, key: &FdbKey) -> Option<Vec<LogicalPort>> {
        self.groups.get(key).map(|set| set.iter().copied().collect())
    }

    /// Unions the given ports into the group, creating it if absent.
    ///
    /// Returns the number of ports newly added to the member set.
    pub fn add_members(&mut self, key: FdbKey, ports: &[LogicalPort]) -> usize {
        let set = self.groups.entry(key).or_default();
        let before = set.len();
        set.extend(ports.iter().copied());
        set.len() - before
    }

    /// Subtracts the given ports from the group's member set.
    ///
    /// A group whose member set becomes empty is deleted. Returns true if
    /// the group was deleted by this call.
    pub fn remove_members(&mut self, key: &FdbKey, ports: &[LogicalPort]) -> bool {
        let Some(set) = self.groups.get_mut(key) else {
            return false;
        };
        for port in ports {
            set.remove(port);
        }
        if set.is_empty() {
            self.groups.remove(key);
            true
        } else {
            false
        }
    }

    /// Removes every group, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let n = self.groups.len();
        self.groups.clear();
        n
    }

    /// Removes every group in the given VLAN, returning how many were removed.
    pub fn remove_vlan(&mut self, vlan: VlanId) -> usize {
        let victims: Vec<FdbKey> = self
            .groups
            .keys()
            .filter(|k| k.vlan == vlan)
            .copied()
            .collect();
        for key in &victims {
            self.groups.remove(key);
        }
        victims.len()
    }

    /// Snapshots all groups in key order.
    pub fn entries(&self) -> Vec<McFdbEntry> {
        self.groups
            .iter()
            .map(|(key, ports)| McFdbEntry {
                key: *key,
                ports: ports.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use switch_types::MacAddress;

    fn group_key(vlan: u16, last: u8) -> FdbKey {
        FdbKey::new(
            VlanId::new(vlan).unwrap(),
            MacAddress::new([0x01, 0x00, 0x5e, 0x00, 0x00, last]),
        )
    }

    #[test]
    fn test_add_unions_members() {
        let mut table = McGroupTable::new();
        let key = group_key(10, 0x01);

        assert_eq!(table.add_members(key, &[LogicalPort::new(1), LogicalPort::new(2)]), 2);
        // Re-adding port 2 is a no-op union
        assert_eq!(table.add_members(key, &[LogicalPort::new(2), LogicalPort::new(3)]), 1);

        assert_eq!(
            table.get(&key).unwrap(),
            vec![LogicalPort::new(1), LogicalPort::new(2), LogicalPort::new(3)]
        );
    }

    #[test]
    fn test_remove_to_empty_deletes_group() {
        let mut table = McGroupTable::new();
        let key = group_key(10, 0x01);
        table.add_members(key, &[LogicalPort::new(1), LogicalPort::new(2)]);

        assert!(!table.remove_members(&key, &[LogicalPort::new(1)]));
        assert!(table.contains(&key));

        assert!(table.remove_members(&key, &[LogicalPort::new(2)]));
        assert!(!table.contains(&key));
        assert!(table.get(&key).is_none());
    }

    #[test]
    fn test_remove_from_missing_group_is_noop() {
        let mut table = McGroupTable::new();
        assert!(!table.remove_members(&group_key(10, 0x01), &[LogicalPort::new(1)]));
    }

    #[test]
    fn test_remove_vlan_scoped() {
        let mut table = McGroupTable::new();
        table.add_members(group_key(10, 0x01), &[LogicalPort::new(1)]);
        table.add_members(group_key(10, 0x02), &[LogicalPort::new(1)]);
        table.add_members(group_key(20, 0x01), &[LogicalPort::new(1)]);

        assert_eq!(table.remove_vlan(VlanId::new(10).unwrap()), 2);
        assert_eq!(table.len(), 1);
        assert!(table.contains(&group_key(20, 0x01)));
    }

    #[test]
    fn test_clear() {
        let mut table = McGroupTable::new();
        table.add_members(group_key(10, 0x01), &[LogicalPort::new(1)]);
        table.add_members(group_key(20, 0x01), &[LogicalPort::new(1)]);

        assert_eq!(table.clear(), 2);
        assert!(table.is_empty());
    }
}
