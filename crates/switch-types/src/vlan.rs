//! VLAN filtering identifier with validation.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// IEEE 802.1Q filtering identifier (0-4094).
///
/// VID 0 is the priority-tag FID and is a legal filtering value at the
/// forwarding-table layer. VID 4095 is reserved and never valid.
///
/// # Examples
///
/// ```
/// use switch_types::VlanId;
///
/// let vlan = VlanId::new(100).unwrap();
/// assert_eq!(vlan.as_u16(), 100);
///
/// assert!(VlanId::new(0).is_ok());
/// assert!(VlanId::new(4095).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    /// Minimum valid filtering identifier.
    pub const MIN: u16 = 0;

    /// Maximum valid filtering identifier.
    pub const MAX: u16 = 4094;

    /// Default VLAN (VLAN 1).
    pub const DEFAULT: VlanId = VlanId(1);

    /// Creates a new VLAN ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the VLAN ID is above 4094.
    pub const fn new(id: u16) -> Result<Self, ParseError> {
        if id <= Self::MAX {
            Ok(VlanId(id))
        } else {
            Err(ParseError::InvalidVlanId(id))
        }
    }

    /// Returns the VLAN ID as a u16.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is the default VLAN (VLAN 1).
    pub const fn is_default(&self) -> bool {
        self.0 == 1
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VlanId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Handle "Vlan100" format
        let id_str = if s.to_lowercase().starts_with("vlan") {
            &s[4..]
        } else {
            s
        };

        let id: u16 = id_str.parse().map_err(|_| ParseError::InvalidVlanId(u16::MAX))?;

        VlanId::new(id)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = ParseError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        VlanId::new(id)
    }
}

impl From<VlanId> for u16 {
    fn from(vlan: VlanId) -> u16 {
        vlan.0
    }
}
