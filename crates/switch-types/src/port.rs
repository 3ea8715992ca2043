//! Logical port handle.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque handle to a physical or aggregated (LAG) port within a bridge.
///
/// The control plane never interprets the handle's bits; it is assigned by
/// the platform layer and used only as a forwarding-table attribute and a
/// flush/limit scope key.
///
/// # Examples
///
/// ```
/// use switch_types::LogicalPort;
///
/// let port = LogicalPort::new(3);
/// assert_eq!(port.to_string(), "port3");
/// assert_eq!("port3".parse::<LogicalPort>().unwrap(), port);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalPort(u64);

impl LogicalPort {
    /// Creates a logical port handle from its raw platform value.
    pub const fn new(raw: u64) -> Self {
        LogicalPort(raw)
    }

    /// Returns the raw platform value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LogicalPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port{}", self.0)
    }
}

impl FromStr for LogicalPort {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("port").unwrap_or(s);
        raw.parse::<u64>()
            .map(LogicalPort)
            .map_err(|_| ParseError::InvalidLogicalPort(s.to_string()))
    }
}

impl From<u64> for LogicalPort {
    fn from(raw: u64) -> Self {
        LogicalPort(raw)
    }
}

impl From<LogicalPort> for u64 {
    fn from(port: LogicalPort) -> u64 {
        port.0
    }
}
