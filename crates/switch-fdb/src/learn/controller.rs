//! Learn-mode resolution and the authorization boundary.

use super::types::{LearnEvent, LearnMode};
use std::collections::HashMap;
use switch_types::{LogicalPort, VlanId};

/// Scope a learn-mode setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnScope {
    /// Bridge-wide default.
    Bridge,
    /// Override for one VLAN.
    Vlan(VlanId),
    /// Override for one port.
    Port(LogicalPort),
}

/// Out-of-band authorization oracle for `Controlled` learn mode.
///
/// Owned by an external security component; consulted synchronously for
/// each event whose effective mode is `Controlled`.
pub trait LearnAuthorizer: Send + Sync {
    /// Returns true if the MAC may be learned.
    fn authorize(&self, event: &LearnEvent) -> bool;
}

/// Learn-mode settings for one bridge.
///
/// Resolution order is port, then VLAN, then the bridge default; the first
/// configured scope wins.
#[derive(Debug)]
pub struct LearnModeController {
    default_mode: LearnMode,
    vlan_modes: HashMap<VlanId, LearnMode>,
    port_modes: HashMap<LogicalPort, LearnMode>,
}

impl Default for LearnModeController {
    fn default() -> Self {
        Self {
            default_mode: LearnMode::Automatic,
            vlan_modes: HashMap::new(),
            port_modes: HashMap::new(),
        }
    }
}

impl LearnModeController {
    /// Creates a controller with `Automatic` as the bridge default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the learn mode at the given scope.
    pub fn set_mode(&mut self, scope: LearnScope, mode: LearnMode) {
        match scope {
            LearnScope::Bridge => self.default_mode = mode,
            LearnScope::Vlan(vlan) => {
                self.vlan_modes.insert(vlan, mode);
            }
            LearnScope::Port(port) => {
                self.port_modes.insert(port, mode);
            }
        }
    }

    /// Returns the mode configured at the given scope, falling back to the
    /// bridge default for VLAN and port scopes with no override.
    pub fn mode(&self, scope: LearnScope) -> LearnMode {
        match scope {
            LearnScope::Bridge => self.default_mode,
            LearnScope::Vlan(vlan) => {
                self.vlan_modes.get(&vlan).copied().unwrap_or(self.default_mode)
            }
            LearnScope::Port(port) => {
                self.port_modes.get(&port).copied().unwrap_or(self.default_mode)
            }
        }
    }

    /// Resolves the effective mode for a learning event on (vlan, port):
    /// port override, then VLAN override, then the bridge default.
    pub fn effective(&self, vlan: VlanId, port: LogicalPort) -> LearnMode {
        if let Some(mode) = self.port_modes.get(&port) {
            return *mode;
        }
        if let Some(mode) = self.vlan_modes.get(&vlan) {
            return *mode;
        }
        self.default_mode
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
    fn test_default_is_automatic() {
        let ctl = LearnModeController::new();
        assert_eq!(ctl.effective(vlan(10), port(1)), LearnMode::Automatic);
    }

    #[test]
    fn test_bridge_default_applies_everywhere() {
        let mut ctl = LearnModeController::new();
        ctl.set_mode(LearnScope::Bridge, LearnMode::Disabled);

        assert_eq!(ctl.effective(vlan(10), port(1)), LearnMode::Disabled);
        assert_eq!(ctl.effective(vlan(20), port(9)), LearnMode::Disabled);
    }

    #[test]
    fn test_vlan_overrides_bridge() {
        let mut ctl = LearnModeController::new();
        ctl.set_mode(LearnScope::Bridge, LearnMode::Disabled);
        ctl.set_mode(LearnScope::Vlan(vlan(10)), LearnMode::Automatic);

        assert_eq!(ctl.effective(vlan(10), port(1)), LearnMode::Automatic);
        assert_eq!(ctl.effective(vlan(20), port(1)), LearnMode::Disabled);
    }

    #[test]
    fn test_port_overrides_vlan_and_bridge() {
        let mut ctl = LearnModeController::new();
        ctl.set_mode(LearnScope::Bridge, LearnMode::Automatic);
        ctl.set_mode(LearnScope::Vlan(vlan(10)), LearnMode::Disabled);
        ctl.set_mode(LearnScope::Port(port(3)), LearnMode::Controlled);

        assert_eq!(ctl.effective(vlan(10), port(3)), LearnMode::Controlled);
        assert_eq!(ctl.effective(vlan(10), port(4)), LearnMode::Disabled);
    }

    #[test]
    fn test_scope_get_falls_back_to_default() {
        let mut ctl = LearnModeController::new();
        ctl.set_mode(LearnScope::Bridge, LearnMode::Controlled);

        assert_eq!(ctl.mode(LearnScope::Bridge), LearnMode::Controlled);
        assert_eq!(ctl.mode(LearnScope::Vlan(vlan(10))), LearnMode::Controlled);
        assert_eq!(ctl.mode(LearnScope::Port(port(1))), LearnMode::Controlled);
    }
}
