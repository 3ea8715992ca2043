//! Per-bridge forwarding-database state machine.

use super::types::{BridgeConfig, FdbStats};
use crate::aging::ActivityProbe;
use crate::audit::{AuditCategory, AuditRecord};
use crate::audit_log;
use crate::flush::{FlushScope, FlushStats, McFlushScope};
use crate::learn::{LearnAuthorizer, LearnEvent, LearnMode, LearnModeController, LearnOutcome, LearnScope};
use crate::limit::{LimitCmd, LimitEnforcer};
use crate::mc::{McGroupTable, MC_MAX_GROUPS};
use crate::status::{FdbError, FdbResult};
use crate::uc::{EntryType, FdbKey, UcEntrySpec, UcFdbEntry, UcFdbTable};
use chrono::{DateTime, Utc};
use switch_types::{BridgeId, LogicalPort, MacAddress, VlanId};

/// All forwarding state of one bridge.
///
/// The sole owner of the unicast and multicast tables; learn limits, learn
/// modes, the age timer and statistics live alongside them so that every
/// mutation keeps the dynamic-count accounting consistent in one place.
/// The registry serializes access, so methods here take `&mut self` freely.
#[derive(Debug)]
pub struct BridgeFdb {
    id: BridgeId,
    config: BridgeConfig,
    uc: UcFdbTable,
    mc: McGroupTable,
    limits: LimitEnforcer,
    learn_modes: LearnModeController,
    stats: FdbStats,
    flush_stats: FlushStats,
}

impl BridgeFdb {
    /// Creates an empty bridge FDB.
    pub fn new(id: BridgeId, config: BridgeConfig) -> Self {
        Self {
            id,
            config,
            uc: UcFdbTable::new(),
            mc: McGroupTable::new(),
            limits: LimitEnforcer::new(),
            learn_modes: LearnModeController::new(),
            stats: FdbStats::default(),
            flush_stats: FlushStats::default(),
        }
    }

    /// Returns the bridge this table belongs to.
    pub fn id(&self) -> BridgeId {
        self.id
    }

    /// Returns the age time in seconds (0 = aging disabled).
    pub fn age_time(&self) -> u32 {
        self.config.age_time
    }

    /// Sets the age time in seconds.
    ///
    /// Entries already stale under the new window are not expired until the
    /// next sweep.
    pub fn set_age_time(&mut self, age_time: u32) {
        self.config.age_time = age_time;
        audit_log!(AuditRecord::new(
            AuditCategory::ConfigurationChange,
            "BridgeFdb",
            "set_age_time"
        )
        .with_object_id(self.id.to_string())
        .with_object_type("bridge")
        .with_details(serde_json::json!({ "age_time": age_time })));
    }

    // ------------------------------------------------------------------
    // Unicast entries
    // ------------------------------------------------------------------

    /// Adds or replaces a unicast entry (idempotent upsert).
    ///
    /// A colliding key replaces port and type in place; dynamic-count
    /// accounting follows the entry across type and port transitions. New
    /// dynamic entries pass the limit check, new keys the capacity check.
    pub fn add_uc_entry(&mut self, spec: &UcEntrySpec) -> FdbResult<()> {
        if !spec.mac.is_unicast() || spec.mac.is_zero() {
            return Err(FdbError::param(format!(
                "{} is not a unicast forwarding key",
                spec.mac
            )));
        }
        let key = spec.key();

        if let Some(existing) = self.uc.get(&key).cloned() {
            // Release the old entry's accounting before admitting the new
            // shape, restoring it if the replacement is rejected.
            if existing.is_dynamic() {
                self.limits.record_remove(existing.port, key.vlan);
            }
            if spec.entry_type == EntryType::Dynamic {
                if let Err(e) = self.limits.check_admit(spec.port, key.vlan) {
                    if existing.is_dynamic() {
                        self.limits.record_admit(existing.port, key.vlan);
                    }
                    return Err(e);
                }
                self.limits.record_admit(spec.port, key.vlan);
            }
            self.uc
                .insert(UcFdbEntry::new(key, spec.port, spec.entry_type, Utc::now()));
            self.stats.entries_replaced += 1;

            audit_log!(AuditRecord::new(
                AuditCategory::EntryModify,
                "BridgeFdb",
                "add_uc_entry"
            )
            .with_object_id(key.to_string())
            .with_object_type("uc_entry")
            .with_details(serde_json::json!({
                "bridge": self.id.to_string(),
                "port": spec.port.to_string(),
                "entry_type": spec.entry_type.to_string(),
                "replaced_port": existing.port.to_string(),
            })));
            return Ok(());
        }

        if self.uc.len() >= self.config.max_entries {
            return Err(FdbError::capacity(
                self.id.to_string(),
                self.config.max_entries,
            ));
        }
        if spec.entry_type == EntryType::Dynamic {
            self.limits.check_admit(spec.port, key.vlan)?;
            self.limits.record_admit(spec.port, key.vlan);
        }
        self.uc
            .insert(UcFdbEntry::new(key, spec.port, spec.entry_type, Utc::now()));
        self.stats.entries_added += 1;

        audit_log!(AuditRecord::new(
            AuditCategory::EntryCreate,
            "BridgeFdb",
            "add_uc_entry"
        )
        .with_object_id(key.to_string())
        .with_object_type("uc_entry")
        .with_details(serde_json::json!({
            "bridge": self.id.to_string(),
            "port": spec.port.to_string(),
            "entry_type": spec.entry_type.to_string(),
        })));
        Ok(())
    }

    /// Deletes a unicast entry by key; entry type is don't-care.
    ///
    /// Deleting an absent key is a successful no-op.
    pub fn delete_uc_entry(&mut self, key: &FdbKey) {
        let Some(removed) = self.uc.remove(key) else {
            return;
        };
        if removed.is_dynamic() {
            self.limits.record_remove(removed.port, key.vlan);
        }
        self.stats.entries_removed += 1;

        audit_log!(AuditRecord::new(
            AuditCategory::EntryDelete,
            "BridgeFdb",
            "delete_uc_entry"
        )
        .with_object_id(key.to_string())
        .with_object_type("uc_entry")
        .with_details(serde_json::json!({
            "bridge": self.id.to_string(),
            "port": removed.port.to_string(),
        })));
    }

    /// Looks up a unicast entry by exact key.
    pub fn get_uc_entry(&self, key: &FdbKey) -> FdbResult<UcFdbEntry> {
        self.uc
            .get(key)
            .cloned()
            .ok_or_else(|| FdbError::not_found(key.to_string()))
    }

    /// Returns up to `max` entries from the start of (VLAN, MAC) order.
    pub fn get_uc_first(&self, max: usize) -> Vec<UcFdbEntry> {
        self.uc.first_page(max)
    }

    /// Returns up to `max` entries strictly after the cursor key.
    pub fn get_uc_next(&self, after: &FdbKey, max: usize) -> Vec<UcFdbEntry> {
        self.uc.page_after(after, max)
    }

    /// Returns the total entry count (static + dynamic), O(1).
    pub fn count_uc(&self) -> usize {
        self.uc.len()
    }

    // ------------------------------------------------------------------
    // Hardware learning
    // ------------------------------------------------------------------

    /// Applies one hardware learning event.
    ///
    /// Resolution order: learn mode, static-entry conflict, learn limit,
    /// capacity. Dropped events are outcomes, not errors; the MAC is simply
    /// re-learned on its next packet.
    pub fn learn(
        &mut self,
        event: &LearnEvent,
        authorizer: Option<&dyn LearnAuthorizer>,
    ) -> LearnOutcome {
        if !event.mac.is_unicast() || event.mac.is_zero() {
            self.stats.learn_drops_invalid += 1;
            return LearnOutcome::DroppedInvalid;
        }

        match self.learn_modes.effective(event.vlan, event.port) {
            LearnMode::Disabled => {
                self.stats.learn_drops_disabled += 1;
                return LearnOutcome::DroppedDisabled;
            }
            LearnMode::Controlled => {
                let approved = authorizer.is_some_and(|a| a.authorize(event));
                if !approved {
                    self.stats.learn_drops_denied += 1;
                    audit_log!(AuditRecord::new(
                        AuditCategory::LearnAdmission,
                        "BridgeFdb",
                        "learn"
                    )
                    .with_outcome(crate::audit::AuditOutcome::Denied)
                    .with_object_id(FdbKey::new(event.vlan, event.mac).to_string())
                    .with_object_type("uc_entry")
                    .with_details(serde_json::json!({
                        "bridge": self.id.to_string(),
                        "port": event.port.to_string(),
                        "reason": "controlled_denied",
                    })));
                    return LearnOutcome::DroppedDenied;
                }
            }
            LearnMode::Automatic => {}
        }

        let key = FdbKey::new(event.vlan, event.mac);

        if let Some(existing) = self.uc.get(&key).cloned() {
            if existing.entry_type == EntryType::Static {
                self.stats.learn_drops_static += 1;
                return LearnOutcome::DroppedStatic;
            }
            if existing.port == event.port {
                // Refresh in place
                if let Some(entry) = self.uc.get_mut(&key) {
                    entry.last_seen = event.seen_at;
                }
                self.stats.learns_admitted += 1;
                return LearnOutcome::Admitted;
            }
            // Station move: re-admit against the new port's limit
            self.limits.record_remove(existing.port, key.vlan);
            if self.limits.check_admit(event.port, key.vlan).is_err() {
                self.limits.record_admit(existing.port, key.vlan);
                self.stats.learn_drops_limit += 1;
                return LearnOutcome::DroppedLimit;
            }
            self.limits.record_admit(event.port, key.vlan);
            self.uc.insert(UcFdbEntry::new(
                key,
                event.port,
                EntryType::Dynamic,
                event.seen_at,
            ));
            self.stats.learns_admitted += 1;
            return LearnOutcome::Admitted;
        }

        if self.limits.check_admit(event.port, key.vlan).is_err() {
            self.stats.learn_drops_limit += 1;
            return LearnOutcome::DroppedLimit;
        }
        if self.uc.len() >= self.config.max_entries {
            self.stats.learn_drops_capacity += 1;
            return LearnOutcome::DroppedCapacity;
        }
        self.limits.record_admit(event.port, key.vlan);
        self.uc.insert(UcFdbEntry::new(
            key,
            event.port,
            EntryType::Dynamic,
            event.seen_at,
        ));
        self.stats.learns_admitted += 1;
        LearnOutcome::Admitted
    }

    // ------------------------------------------------------------------
    // Aging
    // ------------------------------------------------------------------

    /// Runs one aging pass over the bridge's dynamic entries.
    ///
    /// Entries the probe reports active are refreshed to `now`; entries
    /// whose `last_seen` is at least `age_time` seconds old are expired
    /// through the same path as an explicit delete. Returns the number of
    /// expired entries. A zero age time disables the pass.
    pub fn sweep(&mut self, probe: &dyn ActivityProbe, now: DateTime<Utc>) -> usize {
        let age_time = self.config.age_time;
        if age_time == 0 {
            return 0;
        }

        let id = self.id;
        let mut expired: Vec<FdbKey> = Vec::new();
        for entry in self.uc.iter_mut() {
            if !entry.is_dynamic() {
                continue;
            }
            if probe.is_active(id, &entry.key) {
                entry.last_seen = now;
            } else if (now - entry.last_seen).num_seconds() >= i64::from(age_time) {
                expired.push(entry.key);
            }
        }

        for key in &expired {
            if let Some(removed) = self.uc.remove(key) {
                self.limits.record_remove(removed.port, key.vlan);
                self.stats.entries_aged += 1;
            }
        }

        if !expired.is_empty() {
            audit_log!(AuditRecord::new(AuditCategory::Aging, "BridgeFdb", "sweep")
                .with_object_id(self.id.to_string())
                .with_object_type("bridge")
                .with_details(serde_json::json!({
                    "expired": expired.len(),
                    "age_time": age_time,
                })));
        }
        expired.len()
    }

    // ------------------------------------------------------------------
    // Flush
    // ------------------------------------------------------------------

    /// Removes every unicast entry in scope, static and dynamic alike.
    ///
    /// Returns the number of removed entries.
    pub fn flush_uc(&mut self, scope: &FlushScope) -> usize {
        let victims: Vec<FdbKey> = self
            .uc
            .iter()
            .filter(|e| scope.matches(e))
            .map(|e| e.key)
            .collect();

        for key in &victims {
            if let Some(removed) = self.uc.remove(key) {
                if removed.is_dynamic() {
                    self.limits.record_remove(removed.port, key.vlan);
                }
            }
        }
        self.flush_stats.record_uc(scope, victims.len());

        audit_log!(AuditRecord::new(
            AuditCategory::Flush,
            "BridgeFdb",
            "flush_uc"
        )
        .with_object_id(scope.to_string())
        .with_object_type("flush_scope")
        .with_details(serde_json::json!({
            "bridge": self.id.to_string(),
            "removed": victims.len(),
        })));
        victims.len()
    }

    /// Removes every multicast group in scope.
    ///
    /// Returns the number of removed groups.
    pub fn flush_mc(&mut self, scope: &McFlushScope) -> usize {
        let removed = match scope {
            McFlushScope::All => self.mc.clear(),
            McFlushScope::Vlan(vlan) => self.mc.remove_vlan(*vlan),
        };
        self.flush_stats.record_mc(removed);

        audit_log!(AuditRecord::new(
            AuditCategory::Flush,
            "BridgeFdb",
            "flush_mc"
        )
        .with_object_id(scope.to_string())
        .with_object_type("flush_scope")
        .with_details(serde_json::json!({
            "bridge": self.id.to_string(),
            "removed": removed,
        })));
        removed
    }

    // ------------------------------------------------------------------
    // Multicast groups
    // ------------------------------------------------------------------

    /// Unions member ports into a multicast group, creating it if absent.
    pub fn add_mc_members(
        &mut self,
        vlan: VlanId,
        mac: MacAddress,
        ports: &[LogicalPort],
    ) -> FdbResult<()> {
        if !mac.is_multicast() {
            return Err(FdbError::param(format!("{} is not a group address", mac)));
        }
        if ports.is_empty() {
            return Err(FdbError::param("a group cannot be created with no members"));
        }
        let key = FdbKey::new(vlan, mac);
        if !self.mc.contains(&key) && self.mc.len() >= MC_MAX_GROUPS {
            return Err(FdbError::capacity(self.id.to_string(), MC_MAX_GROUPS));
        }
        let added = self.mc.add_members(key, ports);

        audit_log!(AuditRecord::new(
            AuditCategory::EntryModify,
            "BridgeFdb",
            "add_mc_members"
        )
        .with_object_id(key.to_string())
        .with_object_type("mc_group")
        .with_details(serde_json::json!({
            "bridge": self.id.to_string(),
            "ports_added": added,
        })));
        Ok(())
    }

    /// Subtracts member ports from a multicast group.
    ///
    /// A group emptied by the removal is deleted; an absent group or an
    /// empty port list is a successful no-op.
    pub fn remove_mc_members(
        &mut self,
        vlan: VlanId,
        mac: MacAddress,
        ports: &[LogicalPort],
    ) -> FdbResult<()> {
        if !mac.is_multicast() {
            return Err(FdbError::param(format!("{} is not a group address", mac)));
        }
        let key = FdbKey::new(vlan, mac);
        let deleted = self.mc.remove_members(&key, ports);

        audit_log!(AuditRecord::new(
            if deleted {
                AuditCategory::EntryDelete
            } else {
                AuditCategory::EntryModify
            },
            "BridgeFdb",
            "remove_mc_members"
        )
        .with_object_id(key.to_string())
        .with_object_type("mc_group")
        .with_details(serde_json::json!({
            "bridge": self.id.to_string(),
            "group_deleted": deleted,
        })));
        Ok(())
    }

    /// Returns a multicast group's member ports in ascending order.
    pub fn get_mc_entry(&self, vlan: VlanId, mac: MacAddress) -> FdbResult<Vec<LogicalPort>> {
        let key = FdbKey::new(vlan, mac);
        self.mc
            .get(&key)
            .ok_or_else(|| FdbError::not_found(key.to_string()))
    }

    // ------------------------------------------------------------------
    // Limits and learn modes
    // ------------------------------------------------------------------

    /// Configures the dynamic-MAC cap for a port.
    pub fn set_port_limit(&mut self, port: LogicalPort, cmd: LimitCmd) -> FdbResult<()> {
        self.limits.set_port_limit(port, cmd)?;
        audit_log!(AuditRecord::new(
            AuditCategory::ConfigurationChange,
            "BridgeFdb",
            "set_port_limit"
        )
        .with_object_id(port.to_string())
        .with_object_type("learn_limit")
        .with_details(serde_json::json!({
            "bridge": self.id.to_string(),
            "limit": self.limits.port_limit(port),
        })));
        Ok(())
    }

    /// Configures the dynamic-MAC cap for a VLAN.
    pub fn set_vlan_limit(&mut self, vlan: VlanId, cmd: LimitCmd) -> FdbResult<()> {
        self.limits.set_vlan_limit(vlan, cmd)?;
        audit_log!(AuditRecord::new(
            AuditCategory::ConfigurationChange,
            "BridgeFdb",
            "set_vlan_limit"
        )
        .with_object_id(format!("vlan{}", vlan))
        .with_object_type("learn_limit")
        .with_details(serde_json::json!({
            "bridge": self.id.to_string(),
            "limit": self.limits.vlan_limit(vlan),
        })));
        Ok(())
    }

    /// Returns the configured port cap, or None if unbounded.
    pub fn port_limit(&self, port: LogicalPort) -> Option<u32> {
        self.limits.port_limit(port)
    }

    /// Returns the configured VLAN cap, or None if unbounded.
    pub fn vlan_limit(&self, vlan: VlanId) -> Option<u32> {
        self.limits.vlan_limit(vlan)
    }

    /// Sets the learn mode at the given scope.
    pub fn set_learn_mode(&mut self, scope: LearnScope, mode: LearnMode) {
        self.learn_modes.set_mode(scope, mode);
        audit_log!(AuditRecord::new(
            AuditCategory::ConfigurationChange,
            "BridgeFdb",
            "set_learn_mode"
        )
        .with_object_id(self.id.to_string())
        .with_object_type("learn_mode")
        .with_details(serde_json::json!({ "mode": mode.to_string() })));
    }

    /// Returns the learn mode configured at the given scope.
    pub fn learn_mode(&self, scope: LearnScope) -> LearnMode {
        self.learn_modes.mode(scope)
    }

    /// Resolves the effective learn mode for (vlan, port).
    pub fn effective_learn_mode(&self, vlan: VlanId, port: LogicalPort) -> LearnMode {
        self.learn_modes.effective(vlan, port)
    }

    // ------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------

    /// Returns the bridge's forwarding-table statistics.
    pub fn stats(&self) -> &FdbStats {
        &self.stats
    }

    /// Returns the bridge's flush statistics.
    pub fn flush_stats(&self) -> &FlushStats {
        &self.flush_stats
    }
}
