//! Per-bridge FDB instances and the process-wide registry.
//!
//! One [`BridgeFdb`] exists per bridge, created and destroyed explicitly
//! through the [`FdbRegistry`]. The bridge state machine owns every
//! forwarding entry; registry callers reach it only through the API surface,
//! which serializes mutations per bridge and never contends across bridges.

mod fdb;
mod registry;
mod types;

pub use fdb::BridgeFdb;
pub use registry::FdbRegistry;
pub use types::{BridgeConfig, FdbStats};
