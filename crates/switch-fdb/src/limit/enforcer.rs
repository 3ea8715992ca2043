//! Per-port and per-VLAN dynamic learn limits.

use crate::status::{FdbError, FdbResult};
use crate::uc::FDB_MAX_ENTRIES;
use std::collections::HashMap;
use switch_types::{LogicalPort, VlanId};

/// Limit configuration command.
///
/// `Set` installs a cap; `Unset` removes it, leaving the scope bounded only
/// by the bridge's table capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitCmd {
    Set(u32),
    Unset,
}

/// Live dynamic-entry counts and configured caps for one bridge.
///
/// Counts are maintained incrementally by every admit/remove path in the
/// bridge state machine; this type never walks the table.
#[derive(Debug, Default)]
pub struct LimitEnforcer {
    port_limits: HashMap<LogicalPort, u32>,
    vlan_limits: HashMap<VlanId, u32>,
    port_counts: HashMap<LogicalPort, u32>,
    vlan_counts: HashMap<VlanId, u32>,
}

impl LimitEnforcer {
    /// Creates an enforcer with no limits configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the dynamic-MAC cap for a port.
    pub fn set_port_limit(&mut self, port: LogicalPort, cmd: LimitCmd) -> FdbResult<()> {
        match cmd {
            LimitCmd::Set(limit) => {
                if limit as usize > FDB_MAX_ENTRIES {
                    return Err(FdbError::param(format!(
                        "port limit {} exceeds table capacity {}",
                        limit, FDB_MAX_ENTRIES
                    )));
                }
                self.port_limits.insert(port, limit);
            }
            LimitCmd::Unset => {
                self.port_limits.remove(&port);
            }
        }
        Ok(())
    }

    /// Configures the dynamic-MAC cap for a VLAN.
    pub fn set_vlan_limit(&mut self, vlan: VlanId, cmd: LimitCmd) -> FdbResult<()> {
        match cmd {
            LimitCmd::Set(limit) => {
                if limit as usize > FDB_MAX_ENTRIES {
                    return Err(FdbError::param(format!(
                        "vlan limit {} exceeds table capacity {}",
                        limit, FDB_MAX_ENTRIES
                    )));
                }
                self.vlan_limits.insert(vlan, limit);
            }
            LimitCmd::Unset => {
                self.vlan_limits.remove(&vlan);
            }
        }
        Ok(())
    }

    /// Returns the configured port cap, or None if unbounded.
    pub fn port_limit(&self, port: LogicalPort) -> Option<u32> {
        self.port_limits.get(&port).copied()
    }

    /// Returns the configured VLAN cap, or None if unbounded.
    pub fn vlan_limit(&self, vlan: VlanId) -> Option<u32> {
        self.vlan_limits.get(&vlan).copied()
    }

    /// Returns the live dynamic count for a port.
    pub fn port_count(&self, port: LogicalPort) -> u32 {
        self.port_counts.get(&port).copied().unwrap_or(0)
    }

    /// Returns the live dynamic count for a VLAN.
    pub fn vlan_count(&self, vlan: VlanId) -> u32 {
        self.vlan_counts.get(&vlan).copied().unwrap_or(0)
    }

    /// Checks whether one more dynamic entry fits on (port, vlan).
    ///
    /// Rejects with `LimitExceeded` naming the exhausted scope. Does not
    /// record anything; pair with [`record_admit`](Self::record_admit) once
    /// the entry is actually stored.
    pub fn check_admit(&self, port: LogicalPort, vlan: VlanId) -> FdbResult<()> {
        if let Some(limit) = self.port_limit(port) {
            if self.port_count(port) >= limit {
                return Err(FdbError::limit(port.to_string(), limit));
            }
        }
        if let Some(limit) = self.vlan_limit(vlan) {
            if self.vlan_count(vlan) >= limit {
                return Err(FdbError::limit(format!("vlan{}", vlan), limit));
            }
        }
        Ok(())
    }

    /// Records a stored dynamic entry on (port, vlan).
    pub fn record_admit(&mut self, port: LogicalPort, vlan: VlanId) {
        *self.port_counts.entry(port).or_insert(0) += 1;
        *self.vlan_counts.entry(vlan).or_insert(0) += 1;
    }

    /// Records the removal of a dynamic entry from (port, vlan).
    pub fn record_remove(&mut self, port: LogicalPort, vlan: VlanId) {
        if let Some(count) = self.port_counts.get_mut(&port) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.port_counts.remove(&port);
            }
        }
        if let Some(count) = self.vlan_counts.get_mut(&vlan) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.vlan_counts.remove(&vlan);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn port(n: u64) -> LogicalPort {
        LogicalPort::new(n)
    }

    fn vlan(n: u16) -> VlanId {
        VlanId::new(n).unwrap()
    }

    #[test]
    fn test_unset_limits_are_unbounded() {
        let mut enforcer = LimitEnforcer::new();
        for _ in 0..1000 {
            enforcer.check_admit(port(1), vlan(10)).unwrap();
            enforcer.record_admit(port(1), vlan(10));
        }
        assert_eq!(enforcer.port_count(port(1)), 1000);
    }

    #[test]
    fn test_port_limit_rejects_at_cap() {
        let mut enforcer = LimitEnforcer::new();
        enforcer.set_port_limit(port(3), LimitCmd::Set(1)).unwrap();

        enforcer.check_admit(port(3), vlan(10)).unwrap();
        enforcer.record_admit(port(3), vlan(10));

        let err = enforcer.check_admit(port(3), vlan(10)).unwrap_err();
        assert!(matches!(err, FdbError::LimitExceeded { ref scope, limit: 1 } if scope == "port3"));

        // A different port is unaffected
        enforcer.check_admit(port(4), vlan(10)).unwrap();
    }

    #[test]
    fn test_vlan_limit_rejects_at_cap() {
        let mut enforcer = LimitEnforcer::new();
        enforcer.set_vlan_limit(vlan(10), LimitCmd::Set(2)).unwrap();

        for p in [1, 2] {
            enforcer.check_admit(port(p), vlan(10)).unwrap();
            enforcer.record_admit(port(p), vlan(10));
        }

        let err = enforcer.check_admit(port(3), vlan(10)).unwrap_err();
        assert!(matches!(err, FdbError::LimitExceeded { ref scope, limit: 2 } if scope == "vlan10"));
    }

    #[test]
    fn test_lowering_limit_does_not_evict() {
        let mut enforcer = LimitEnforcer::new();
        for _ in 0..5 {
            enforcer.record_admit(port(1), vlan(10));
        }

        enforcer.set_port_limit(port(1), LimitCmd::Set(2)).unwrap();

        // Existing count stays; only new admissions are blocked
        assert_eq!(enforcer.port_count(port(1)), 5);
        assert!(enforcer.check_admit(port(1), vlan(10)).is_err());

        // After enough removals the scope opens up again
        for _ in 0..4 {
            enforcer.record_remove(port(1), vlan(10));
        }
        assert!(enforcer.check_admit(port(1), vlan(10)).is_ok());
    }

    #[test]
    fn test_unset_reopens_scope() {
        let mut enforcer = LimitEnforcer::new();
        enforcer.set_port_limit(port(1), LimitCmd::Set(0)).unwrap();
        assert!(enforcer.check_admit(port(1), vlan(10)).is_err());

        enforcer.set_port_limit(port(1), LimitCmd::Unset).unwrap();
        assert!(enforcer.check_admit(port(1), vlan(10)).is_ok());
        assert_eq!(enforcer.port_limit(port(1)), None);
    }

    #[test]
    fn test_limit_above_capacity_is_param_error() {
        let mut enforcer = LimitEnforcer::new();
        let err = enforcer
            .set_port_limit(port(1), LimitCmd::Set(FDB_MAX_ENTRIES as u32 + 1))
            .unwrap_err();
        assert!(matches!(err, FdbError::ParamError { .. }));
    }

    #[test]
    fn test_remove_below_zero_saturates() {
        let mut enforcer = LimitEnforcer::new();
        enforcer.record_remove(port(1), vlan(10));
        assert_eq!(enforcer.port_count(port(1)), 0);
        assert_eq!(enforcer.vlan_count(vlan(10)), 0);
    }
}
