//! Bridge configuration and statistics.

use crate::uc::FDB_MAX_ENTRIES;
use serde::{Deserialize, Serialize};

/// Per-bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Seconds of inactivity after which a dynamic entry expires.
    /// 0 disables aging for the bridge.
    pub age_time: u32,
    /// Ceiling on stored unicast entries (static + dynamic).
    pub max_entries: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            age_time: 300,
            max_entries: FDB_MAX_ENTRIES,
        }
    }
}

/// Per-bridge forwarding-table statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FdbStats {
    pub entries_added: u64,
    pub entries_replaced: u64,
    pub entries_removed: u64,
    pub entries_aged: u64,
    pub learns_admitted: u64,
    pub learn_drops_disabled: u64,
    pub learn_drops_denied: u64,
    pub learn_drops_limit: u64,
    pub learn_drops_capacity: u64,
    pub learn_drops_invalid: u64,
    pub learn_drops_static: u64,
}
