//! Ordered unicast entry storage.

use super::types::{FdbKey, UcFdbEntry};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Ordered storage for one bridge's unicast entries.
///
/// A `BTreeMap` keyed by [`FdbKey`] gives the (VLAN, MAC) iteration order
/// directly, O(1) count via `len`, and cursor-resumable paging without a
/// secondary index. Capacity and dynamic-count accounting live in the
/// owning bridge state, not here.
#[derive(Debug, Default)]
pub struct UcFdbTable {
    entries: BTreeMap<FdbKey, UcFdbEntry>,
}

impl UcFdbTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries (static + dynamic).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for an exact key, if present.
    pub fn get(&self, key: &FdbKey) -> Option<&UcFdbEntry> {
        self.entries.get(key)
    }

    /// Returns the entry for an exact key mutably, if present.
    pub fn get_mut(&mut self, key: &FdbKey) -> Option<&mut UcFdbEntry> {
        self.entries.get_mut(key)
    }

    /// Inserts or replaces an entry, returning the previous one.
    pub fn insert(&mut self, entry: UcFdbEntry) -> Option<UcFdbEntry> {
        self.entries.insert(entry.key, entry)
    }

    /// Removes an entry by key, returning it if present.
    pub fn remove(&mut self, key: &FdbKey) -> Option<UcFdbEntry> {
        self.entries.remove(key)
    }

    /// Returns up to `max` entries starting from the lowest key.
    pub fn first_page(&self, max: usize) -> Vec<UcFdbEntry> {
        self.entries.values().take(max).cloned().collect()
    }

    /// Returns up to `max` entries strictly after the cursor key.
    ///
    /// The cursor entry itself is excluded, so iteration resumes correctly
    /// even when the cursor entry was deleted between calls.
    pub fn page_after(&self, after: &FdbKey, max: usize) -> Vec<UcFdbEntry> {
        self.entries
            .range((Bound::Excluded(*after), Bound::Unbounded))
            .take(max)
            .map(|(_, e)| e.clone())
            .collect()
    }

    /// Iterates all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = &UcFdbEntry> {
        self.entries.values()
    }

    /// Iterates all entries mutably in key order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut UcFdbEntry> {
        self.entries.values_mut()
    }
}
