//! Process-wide registry of bridge FDB instances and the public API surface.

use super::fdb::BridgeFdb;
use super::types::{BridgeConfig, FdbStats};
use crate::aging::ActivityProbe;
use crate::audit::{AuditCategory, AuditRecord};
use crate::audit_log;
use crate::flush::{FlushScope, FlushStats, McFlushScope};
use crate::learn::{LearnAuthorizer, LearnEvent, LearnMode, LearnOutcome, LearnScope};
use crate::limit::LimitCmd;
use crate::status::{FdbError, FdbResult, FdbResultExt, FdbStatus};
use crate::uc::{FdbKey, UcEntrySpec, UcFdbEntry, FDB_MAX_BATCH};
use crate::vendor::VendorExt;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use switch_types::{BridgeId, LogicalPort, MacAddress, VlanId};

/// One registered bridge: its state behind a per-bridge lock.
#[derive(Debug)]
struct BridgeHandle {
    state: RwLock<BridgeFdb>,
}

impl BridgeHandle {
    fn read(&self) -> FdbResult<RwLockReadGuard<'_, BridgeFdb>> {
        self.state
            .read()
            .map_err(|_| FdbError::internal("bridge lock poisoned"))
    }

    fn write(&self) -> FdbResult<RwLockWriteGuard<'_, BridgeFdb>> {
        self.state
            .write()
            .map_err(|_| FdbError::internal("bridge lock poisoned"))
    }
}

/// Registry of per-bridge FDB instances with explicit lifecycle.
///
/// Cloning is cheap and shares the underlying tables. Each bridge carries
/// its own lock, so operations on different bridges never contend; all
/// mutations on one bridge are serialized, and reads observe a consistent
/// snapshot.
///
/// Every API operation threads an optional caller-owned [`VendorExt`]
/// buffer; the registry passes it through unexamined and never retains it.
#[derive(Clone, Default)]
pub struct FdbRegistry {
    bridges: Arc<DashMap<BridgeId, Arc<BridgeHandle>>>,
    authorizer: Arc<RwLock<Option<Arc<dyn LearnAuthorizer>>>>,
}

impl FdbRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, bridge: BridgeId) -> FdbResult<Arc<BridgeHandle>> {
        self.bridges
            .get(&bridge)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| FdbError::param(format!("unknown bridge {}", bridge)))
    }

    fn check_batch(len: usize) -> FdbResult<()> {
        if len == 0 {
            return Err(FdbError::param("empty entry list"));
        }
        if len > FDB_MAX_BATCH {
            return Err(FdbError::param(format!(
                "entry list of {} exceeds batch maximum {}",
                len, FDB_MAX_BATCH
            )));
        }
        Ok(())
    }

    fn check_page(max: usize) -> FdbResult<()> {
        if max == 0 || max > FDB_MAX_BATCH {
            return Err(FdbError::param(format!(
                "page size {} outside 1..={}",
                max, FDB_MAX_BATCH
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Bridge lifecycle
    // ------------------------------------------------------------------

    /// Creates a bridge FDB instance.
    ///
    /// Creating an id that already exists is a `ParamError`.
    pub fn create_bridge(
        &self,
        bridge: BridgeId,
        config: BridgeConfig,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<()> {
        use dashmap::mapref::entry::Entry;
        match self.bridges.entry(bridge) {
            Entry::Occupied(_) => Err(FdbError::param(format!("bridge {} already exists", bridge))),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(BridgeHandle {
                    state: RwLock::new(BridgeFdb::new(bridge, config)),
                }));
                audit_log!(AuditRecord::new(
                    AuditCategory::BridgeLifecycle,
                    "FdbRegistry",
                    "create_bridge"
                )
                .with_object_id(bridge.to_string())
                .with_object_type("bridge"));
                Ok(())
            }
        }
    }

    /// Destroys a bridge FDB instance, dropping all of its state.
    ///
    /// Destroying an unknown id is `NotFound`.
    pub fn destroy_bridge(
        &self,
        bridge: BridgeId,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<()> {
        if self.bridges.remove(&bridge).is_none() {
            return Err(FdbError::not_found(bridge.to_string()));
        }
        audit_log!(AuditRecord::new(
            AuditCategory::BridgeLifecycle,
            "FdbRegistry",
            "destroy_bridge"
        )
        .with_object_id(bridge.to_string())
        .with_object_type("bridge"));
        Ok(())
    }

    /// Returns true if the bridge exists.
    pub fn contains_bridge(&self, bridge: BridgeId) -> bool {
        self.bridges.contains_key(&bridge)
    }

    /// Returns the live bridge ids in ascending order.
    pub fn bridge_ids(&self) -> Vec<BridgeId> {
        let mut ids: Vec<BridgeId> = self.bridges.iter().map(|e| *e.key()).collect();
        ids.sort();
        ids
    }

    // ------------------------------------------------------------------
    // Age time
    // ------------------------------------------------------------------

    /// Sets the bridge's age time in seconds (0 disables aging).
    pub fn set_age_time(
        &self,
        bridge: BridgeId,
        age_time: u32,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<()> {
        self.handle(bridge)?.write()?.set_age_time(age_time);
        Ok(())
    }

    /// Returns the bridge's age time in seconds.
    pub fn age_time(&self, bridge: BridgeId, _vs_ext: Option<&mut VendorExt>) -> FdbResult<u32> {
        Ok(self.handle(bridge)?.read()?.age_time())
    }

    // ------------------------------------------------------------------
    // Unicast entries
    // ------------------------------------------------------------------

    /// Adds or replaces unicast entries in bulk.
    ///
    /// Elements apply independently; the returned statuses parallel the
    /// input list, and one element's failure neither aborts nor rolls back
    /// its siblings.
    pub fn add_uc_entries(
        &self,
        bridge: BridgeId,
        entries: &[UcEntrySpec],
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<Vec<FdbStatus>> {
        Self::check_batch(entries.len())?;
        let handle = self.handle(bridge)?;
        let mut state = handle.write()?;
        Ok(entries
            .iter()
            .map(|spec| state.add_uc_entry(spec).to_status())
            .collect())
    }

    /// Deletes unicast entries by key in bulk; entry type is don't-care.
    ///
    /// Deleting absent keys succeeds (no-op), so every returned status is
    /// `Success` today; the per-element shape matches the add path.
    pub fn delete_uc_entries(
        &self,
        bridge: BridgeId,
        keys: &[FdbKey],
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<Vec<FdbStatus>> {
        Self::check_batch(keys.len())?;
        let handle = self.handle(bridge)?;
        let mut state = handle.write()?;
        Ok(keys
            .iter()
            .map(|key| {
                state.delete_uc_entry(key);
                FdbStatus::Success
            })
            .collect())
    }

    /// Looks up one unicast entry by exact key.
    pub fn get_uc_entry(
        &self,
        bridge: BridgeId,
        key: &FdbKey,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<UcFdbEntry> {
        self.handle(bridge)?.read()?.get_uc_entry(key)
    }

    /// Returns up to `max` entries from the start of (VLAN, MAC) order.
    pub fn get_uc_first(
        &self,
        bridge: BridgeId,
        max: usize,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<Vec<UcFdbEntry>> {
        Self::check_page(max)?;
        Ok(self.handle(bridge)?.read()?.get_uc_first(max))
    }

    /// Returns up to `max` entries strictly after the cursor key.
    ///
    /// Iteration is stable absent mutation; concurrent mutation may skip or
    /// repeat entries but never yields one outside the live table.
    pub fn get_uc_next(
        &self,
        bridge: BridgeId,
        after: &FdbKey,
        max: usize,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<Vec<UcFdbEntry>> {
        Self::check_page(max)?;
        Ok(self.handle(bridge)?.read()?.get_uc_next(after, max))
    }

    /// Returns the bridge's total entry count (static + dynamic).
    pub fn count_uc_entries(
        &self,
        bridge: BridgeId,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<usize> {
        Ok(self.handle(bridge)?.read()?.count_uc())
    }

    // ------------------------------------------------------------------
    // Hardware learning
    // ------------------------------------------------------------------

    /// Registers (or clears) the controlled-learning authorization oracle.
    pub fn set_learn_authorizer(&self, authorizer: Option<Arc<dyn LearnAuthorizer>>) {
        if let Ok(mut slot) = self.authorizer.write() {
            *slot = authorizer;
        }
    }

    /// Applies one hardware learning notification.
    ///
    /// Returns the admission outcome; dropped events are not errors and are
    /// never retried by the core.
    pub fn learn_event(&self, event: &LearnEvent) -> FdbResult<LearnOutcome> {
        let handle = self.handle(event.bridge)?;
        let authorizer = self
            .authorizer
            .read()
            .map_err(|_| FdbError::internal("authorizer lock poisoned"))?
            .clone();
        let mut state = handle.write()?;
        Ok(state.learn(event, authorizer.as_deref()))
    }

    /// Sets the learn mode at the given scope.
    pub fn set_learn_mode(
        &self,
        bridge: BridgeId,
        scope: LearnScope,
        mode: LearnMode,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<()> {
        self.handle(bridge)?.write()?.set_learn_mode(scope, mode);
        Ok(())
    }

    /// Returns the learn mode configured at the given scope.
    pub fn learn_mode(
        &self,
        bridge: BridgeId,
        scope: LearnScope,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<LearnMode> {
        Ok(self.handle(bridge)?.read()?.learn_mode(scope))
    }

    /// Resolves the effective learn mode for (vlan, port).
    pub fn effective_learn_mode(
        &self,
        bridge: BridgeId,
        vlan: VlanId,
        port: LogicalPort,
    ) -> FdbResult<LearnMode> {
        Ok(self.handle(bridge)?.read()?.effective_learn_mode(vlan, port))
    }

    // ------------------------------------------------------------------
    // Learn limits
    // ------------------------------------------------------------------

    /// Configures the dynamic-MAC cap for a port.
    pub fn set_port_limit(
        &self,
        bridge: BridgeId,
        port: LogicalPort,
        cmd: LimitCmd,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<()> {
        self.handle(bridge)?.write()?.set_port_limit(port, cmd)
    }

    /// Configures the dynamic-MAC cap for a VLAN.
    pub fn set_vlan_limit(
        &self,
        bridge: BridgeId,
        vlan: VlanId,
        cmd: LimitCmd,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<()> {
        self.handle(bridge)?.write()?.set_vlan_limit(vlan, cmd)
    }

    /// Returns the configured port cap, or None if unbounded.
    pub fn port_limit(
        &self,
        bridge: BridgeId,
        port: LogicalPort,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<Option<u32>> {
        Ok(self.handle(bridge)?.read()?.port_limit(port))
    }

    /// Returns the configured VLAN cap, or None if unbounded.
    pub fn vlan_limit(
        &self,
        bridge: BridgeId,
        vlan: VlanId,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<Option<u32>> {
        Ok(self.handle(bridge)?.read()?.vlan_limit(vlan))
    }

    // ------------------------------------------------------------------
    // Multicast groups
    // ------------------------------------------------------------------

    /// Unions member ports into a multicast group, creating it if absent.
    pub fn add_mc_members(
        &self,
        bridge: BridgeId,
        vlan: VlanId,
        mac: MacAddress,
        ports: &[LogicalPort],
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<()> {
        self.handle(bridge)?.write()?.add_mc_members(vlan, mac, ports)
    }

    /// Subtracts member ports from a multicast group, deleting it when the
    /// member set becomes empty.
    pub fn remove_mc_members(
        &self,
        bridge: BridgeId,
        vlan: VlanId,
        mac: MacAddress,
        ports: &[LogicalPort],
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<()> {
        self.handle(bridge)?.write()?.remove_mc_members(vlan, mac, ports)
    }

    /// Returns a multicast group's member ports in ascending order.
    pub fn get_mc_entry(
        &self,
        bridge: BridgeId,
        vlan: VlanId,
        mac: MacAddress,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<Vec<LogicalPort>> {
        self.handle(bridge)?.read()?.get_mc_entry(vlan, mac)
    }

    // ------------------------------------------------------------------
    // Flush
    // ------------------------------------------------------------------

    /// Removes every unicast entry in scope, static and dynamic alike.
    ///
    /// Runs under the bridge's write lock: readers see the full pre-flush or
    /// full post-flush table, never a partial removal. Returns the number of
    /// removed entries.
    pub fn flush_uc(
        &self,
        bridge: BridgeId,
        scope: FlushScope,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<usize> {
        Ok(self.handle(bridge)?.write()?.flush_uc(&scope))
    }

    /// Removes every multicast group in scope. Returns the number of removed
    /// groups.
    pub fn flush_mc(
        &self,
        bridge: BridgeId,
        scope: McFlushScope,
        _vs_ext: Option<&mut VendorExt>,
    ) -> FdbResult<usize> {
        Ok(self.handle(bridge)?.write()?.flush_mc(&scope))
    }

    // ------------------------------------------------------------------
    // Aging
    // ------------------------------------------------------------------

    /// Runs one aging pass over a bridge. Returns the number of expired
    /// entries.
    pub fn sweep_bridge(
        &self,
        bridge: BridgeId,
        probe: &dyn ActivityProbe,
        now: DateTime<Utc>,
    ) -> FdbResult<usize> {
        Ok(self.handle(bridge)?.write()?.sweep(probe, now))
    }

    /// Runs one aging pass over every registered bridge. Returns the total
    /// number of expired entries.
    pub fn sweep_all(&self, probe: &dyn ActivityProbe, now: DateTime<Utc>) -> usize {
        let mut total = 0;
        for bridge in self.bridge_ids() {
            if let Ok(expired) = self.sweep_bridge(bridge, probe, now) {
                total += expired;
            }
        }
        total
    }

    // ------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------

    /// Returns a snapshot of the bridge's forwarding-table statistics.
    pub fn stats(&self, bridge: BridgeId) -> FdbResult<FdbStats> {
        Ok(self.handle(bridge)?.read()?.stats().clone())
    }

    /// Returns a snapshot of the bridge's flush statistics.
    pub fn flush_stats(&self, bridge: BridgeId) -> FdbResult<FlushStats> {
        Ok(self.handle(bridge)?.read()?.flush_stats().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uc::EntryType;
    use pretty_assertions::assert_eq;

    fn mac(last: u8) -> MacAddress {
        MacAddress::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, last])
    }

    fn spec(vlan: u16, last: u8, port: u64) -> UcEntrySpec {
        UcEntrySpec {
            vlan: VlanId::new(vlan).unwrap(),
            mac: mac(last),
            port: LogicalPort::new(port),
            entry_type: EntryType::Static,
        }
    }

    #[test]
    fn test_bridge_lifecycle() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);

        registry.create_bridge(b1, BridgeConfig::default(), None).unwrap();
        assert!(registry.contains_bridge(b1));

        let err = registry
            .create_bridge(b1, BridgeConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, FdbError::ParamError { .. }));

        registry.destroy_bridge(b1, None).unwrap();
        assert!(!registry.contains_bridge(b1));

        let err = registry.destroy_bridge(b1, None).unwrap_err();
        assert!(matches!(err, FdbError::NotFound { .. }));
    }

    #[test]
    fn test_unknown_bridge_is_param_error() {
        let registry = FdbRegistry::new();
        let err = registry
            .count_uc_entries(BridgeId::new(9), None)
            .unwrap_err();
        assert!(matches!(err, FdbError::ParamError { .. }));
    }

    #[test]
    fn test_batch_envelope_validation() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);
        registry.create_bridge(b1, BridgeConfig::default(), None).unwrap();

        assert!(registry.add_uc_entries(b1, &[], None).is_err());

        let oversized: Vec<UcEntrySpec> = (0..=FDB_MAX_BATCH)
            .map(|i| spec(10, (i % 250) as u8, 1))
            .collect();
        assert!(registry.add_uc_entries(b1, &oversized, None).is_err());
    }

    #[test]
    fn test_per_element_statuses() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);
        registry
            .create_bridge(
                b1,
                BridgeConfig {
                    age_time: 300,
                    max_entries: 2,
                },
                None,
            )
            .unwrap();

        // Third entry hits capacity; first two still applied
        let statuses = registry
            .add_uc_entries(b1, &[spec(10, 1, 1), spec(10, 2, 1), spec(10, 3, 1)], None)
            .unwrap();
        assert_eq!(
            statuses,
            vec![
                FdbStatus::Success,
                FdbStatus::Success,
                FdbStatus::CapacityExceeded,
            ]
        );
        assert_eq!(registry.count_uc_entries(b1, None).unwrap(), 2);
    }

    #[test]
    fn test_delete_batch_is_always_success() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);
        registry.create_bridge(b1, BridgeConfig::default(), None).unwrap();
        registry.add_uc_entries(b1, &[spec(10, 1, 1)], None).unwrap();

        let keys = [
            FdbKey::new(VlanId::new(10).unwrap(), mac(1)),
            FdbKey::new(VlanId::new(10).unwrap(), mac(99)),
        ];
        let statuses = registry.delete_uc_entries(b1, &keys, None).unwrap();
        assert_eq!(statuses, vec![FdbStatus::Success, FdbStatus::Success]);
        assert_eq!(registry.count_uc_entries(b1, None).unwrap(), 0);
    }

    #[test]
    fn test_bridges_are_independent() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);
        let b2 = BridgeId::new(2);
        registry.create_bridge(b1, BridgeConfig::default(), None).unwrap();
        registry.create_bridge(b2, BridgeConfig::default(), None).unwrap();

        registry.add_uc_entries(b1, &[spec(10, 1, 1)], None).unwrap();
        registry.add_uc_entries(b2, &[spec(10, 1, 1), spec(10, 2, 1)], None).unwrap();

        registry.flush_uc(b1, FlushScope::All, None).unwrap();
        assert_eq!(registry.count_uc_entries(b1, None).unwrap(), 0);
        assert_eq!(registry.count_uc_entries(b2, None).unwrap(), 2);
    }

    #[test]
    fn test_vendor_ext_is_passed_through_untouched() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);
        let mut ext = VendorExt::from_bytes(vec![0xde, 0xad]);

        registry
            .create_bridge(b1, BridgeConfig::default(), Some(&mut ext))
            .unwrap();
        registry
            .add_uc_entries(b1, &[spec(10, 1, 1)], Some(&mut ext))
            .unwrap();

        assert_eq!(ext.as_slice(), &[0xde, 0xad]);
    }

    #[test]
    fn test_page_size_validation() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);
        registry.create_bridge(b1, BridgeConfig::default(), None).unwrap();

        assert!(registry.get_uc_first(b1, 0, None).is_err());
        assert!(registry.get_uc_first(b1, FDB_MAX_BATCH + 1, None).is_err());
        assert!(registry.get_uc_first(b1, 1, None).unwrap().is_empty());
    }

    #[test]
    fn test_age_time_roundtrip() {
        let registry = FdbRegistry::new();
        let b1 = BridgeId::new(1);
        registry.create_bridge(b1, BridgeConfig::default(), None).unwrap();

        assert_eq!(registry.age_time(b1, None).unwrap(), 300);
        registry.set_age_time(b1, 60, None).unwrap();
        assert_eq!(registry.age_time(b1, None).unwrap(), 60);
    }
}
