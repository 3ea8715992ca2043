//! Control-plane forwarding database (FDB) for a multi-bridge switch ASIC.
//!
//! This crate is the vendor-neutral MAC-table subsystem of a switch control
//! plane: unicast and multicast forwarding entries keyed by (bridge, VLAN,
//! MAC), with hardware learning, aging, learn limits, learn-mode policy and
//! bulk flush. Packet forwarding itself stays in silicon; this is the state
//! machine the silicon's learning events and the management plane both
//! mutate.
//!
//! # Architecture
//!
//! ```text
//! [mgmt callers] ──┐                       ┌──> UcFdbTable (BTreeMap)
//! [learn events] ──┼──> FdbRegistry ───────┼──> McGroupTable
//! [AgingEngine]  ──┘    (per-bridge lock)  ├──> LimitEnforcer
//!                                          └──> LearnModeController
//! ```
//!
//! One [`BridgeFdb`] exists per bridge, created and destroyed explicitly
//! through the [`FdbRegistry`]; bridges never contend with each other.
//! Mutations on one bridge are serialized, reads see consistent snapshots,
//! and iteration follows a stable (VLAN, MAC) order resumable by cursor.
//!
//! # Key Components
//!
//! - [`FdbRegistry`]: bridge lifecycle and the public API surface
//! - [`BridgeFdb`]: one bridge's entry stores, limits, modes and stats
//! - [`AgingEngine`]: periodic expiry of idle dynamic entries
//! - [`LearnAuthorizer`] / [`ActivityProbe`]: external collaborator traits
//!   for controlled learning and data-plane activity

pub mod aging;
pub mod audit;
pub mod bridge;
pub mod flush;
pub mod learn;
pub mod limit;
pub mod mc;
pub mod status;
pub mod uc;
pub mod vendor;

pub use aging::{ActivityProbe, AgingEngine};
pub use bridge::{BridgeConfig, BridgeFdb, FdbRegistry, FdbStats};
pub use flush::{FlushScope, FlushStats, McFlushScope};
pub use learn::{
    LearnAuthorizer, LearnEvent, LearnMode, LearnModeController, LearnOutcome, LearnScope,
};
pub use limit::{LimitCmd, LimitEnforcer};
pub use mc::{McFdbEntry, McGroupTable, MC_MAX_GROUPS};
pub use status::{FdbError, FdbResult, FdbResultExt, FdbStatus};
pub use uc::{
    EntryType, FdbKey, UcEntrySpec, UcFdbEntry, UcFdbTable, FDB_MAX_BATCH, FDB_MAX_ENTRIES,
};
pub use vendor::VendorExt;

// Re-export the identifier domain so embedders need only this crate.
pub use switch_types::{BridgeId, LogicalPort, MacAddress, ParseError, VlanId};
