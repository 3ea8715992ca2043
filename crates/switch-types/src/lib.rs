//! Identifier types for the switch control plane.
//!
//! This crate provides the key space shared by every forwarding-table
//! component:
//!
//! - [`BridgeId`]: switch partition (virtual switch instance) identifier
//! - [`VlanId`]: IEEE 802.1Q filtering identifier
//! - [`LogicalPort`]: opaque handle to a physical or aggregated port
//! - [`MacAddress`]: 48-bit Ethernet hardware addresses
//!
//! A MAC address is never unique on its own; forwarding state is always
//! keyed by (bridge, VLAN, MAC).

mod bridge;
mod mac;
mod port;
mod vlan;

pub use bridge::BridgeId;
pub use mac::MacAddress;
pub use port::LogicalPort;
pub use vlan::VlanId;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid VLAN ID: {0} (must be 0-4094)")]
    InvalidVlanId(u16),

    #[error("invalid logical port: {0}")]
    InvalidLogicalPort(String),

    #[error("invalid bridge ID: {0}")]
    InvalidBridgeId(String),
}
