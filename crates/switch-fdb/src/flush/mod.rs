//! Bulk invalidation of forwarding entries.
//!
//! Flush removes entries by predicate (bridge-wide, by port, by VLAN, or
//! both) without caller-provided keys, static and dynamic alike. Each flush
//! runs under the bridge's write lock so readers observe either the full
//! pre-flush or full post-flush table, never a partial removal.

mod types;

pub use types::{FlushScope, FlushStats, McFlushScope};
