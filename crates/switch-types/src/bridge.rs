//! Bridge (switch partition) identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a switch partition (virtual switch instance).
///
/// Every forwarding table, limit, learn-mode policy and age timer is scoped
/// to exactly one bridge; bridges are fully independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BridgeId(u32);

impl BridgeId {
    /// Creates a bridge ID from its raw value.
    pub const fn new(raw: u32) -> Self {
        BridgeId(raw)
    }

    /// Returns the raw value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for BridgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bridge{}", self.0)
    }
}

impl From<u32> for BridgeId {
    fn from(raw: u32) -> Self {
        BridgeId(raw)
    }
}

impl From<BridgeId> for u32 {
    fn from(id: BridgeId) -> u32 {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        assert_eq!(BridgeId::new(1).to_string(), "bridge1");
    }

    #[test]
    fn test_roundtrip() {
        let id = BridgeId::from(7u32);
        assert_eq!(u32::from(id), 7);
    }
}
