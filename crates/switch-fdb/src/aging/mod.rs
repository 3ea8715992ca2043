//! Dynamic entry aging.
//!
//! A periodic sweep expires dynamic entries that saw no traffic within a
//! bridge's age-time window. The data-plane driver owns the activity signal
//! and exposes it through [`ActivityProbe`]; the engine only schedules
//! sweeps and funnels expiries through the normal delete path.

mod engine;

pub use engine::AgingEngine;

use crate::uc::FdbKey;
use switch_types::BridgeId;

/// Per-entry traffic-activity indicator, owned by the data-plane driver.
///
/// Queried once per dynamic entry per sweep; returning true means the entry
/// saw traffic since the previous sweep and resets its age clock.
pub trait ActivityProbe: Send + Sync {
    /// Returns true if the entry saw traffic since the last sweep.
    fn is_active(&self, bridge: BridgeId, key: &FdbKey) -> bool;
}
