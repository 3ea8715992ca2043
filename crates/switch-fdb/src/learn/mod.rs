//! Learning policy control.
//!
//! A tri-state learn mode is settable per bridge, per VLAN and per port;
//! the port setting overrides the VLAN setting, which overrides the bridge
//! default. Hardware learning events are admitted, authorized, or dropped
//! according to the resolved mode.

mod controller;
mod types;

pub use controller::{LearnAuthorizer, LearnModeController, LearnScope};
pub use types::{LearnEvent, LearnMode, LearnOutcome};
