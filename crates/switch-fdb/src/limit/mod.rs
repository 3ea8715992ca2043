//! Dynamic-learning limit enforcement.
//!
//! Tracks live counts of dynamic entries per port and per VLAN within one
//! bridge and rejects admissions that would push a count past its configured
//! cap. Static entries bypass enforcement entirely; limits are configuration
//! and never evict already-learned entries.

mod enforcer;

pub use enforcer::{LimitCmd, LimitEnforcer};
