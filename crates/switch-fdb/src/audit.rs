//! Structured audit logging for forwarding-table mutations.
//!
//! Every control-plane mutation (entry add/delete, flush, aging expiry,
//! limit rejection, bridge lifecycle) emits an [`AuditRecord`] through the
//! [`audit_log!`] macro. Records serialize to JSON under the `audit` tracing
//! target so log pipelines can filter and ingest them independently of
//! operational logging.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audit event categories for forwarding-table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditCategory {
    /// Bridge instance creation and teardown
    BridgeLifecycle,
    /// Entry creation (static add or dynamic learn)
    EntryCreate,
    /// Entry replacement (same key, new port or type)
    EntryModify,
    /// Entry deletion (explicit, flush, or aging)
    EntryDelete,
    /// Learn-mode, limit, or age-time configuration changes
    ConfigurationChange,
    /// Learning admission decisions
    LearnAdmission,
    /// Bulk flush operations
    Flush,
    /// Aging sweep expiries
    Aging,
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditCategory::BridgeLifecycle => write!(f, "BRIDGE_LIFECYCLE"),
            AuditCategory::EntryCreate => write!(f, "ENTRY_CREATE"),
            AuditCategory::EntryModify => write!(f, "ENTRY_MODIFY"),
            AuditCategory::EntryDelete => write!(f, "ENTRY_DELETE"),
            AuditCategory::ConfigurationChange => write!(f, "CONFIGURATION_CHANGE"),
            AuditCategory::LearnAdmission => write!(f, "LEARN_ADMISSION"),
            AuditCategory::Flush => write!(f, "FLUSH"),
            AuditCategory::Aging => write!(f, "AGING"),
        }
    }
}

/// Outcome of an audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    /// Action completed successfully
    Success,
    /// Action failed
    Failure,
    /// Action was denied by policy (learn mode, limit, capacity)
    Denied,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Success => write!(f, "success"),
            AuditOutcome::Failure => write!(f, "failure"),
            AuditOutcome::Denied => write!(f, "denied"),
        }
    }
}

/// Structured audit record.
///
/// Immutable once built; the builder methods consume and return the record
/// so incomplete records never reach the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// UTC timestamp
    pub timestamp: DateTime<Utc>,

    /// Event category
    pub category: AuditCategory,

    /// Source component generating the event
    pub source: String,

    /// Action performed
    pub action: String,

    /// Outcome of the action
    pub outcome: AuditOutcome,

    /// Identifier of the affected object (entry key, bridge id, scope)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    /// Object classification ("uc_entry", "mc_group", "bridge", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    /// Additional context as key-value pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// Error message if the outcome is a failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditRecord {
    /// Creates a new audit record with the current timestamp.
    ///
    /// The outcome defaults to `Success`; override with
    /// [`with_outcome`](Self::with_outcome) or [`with_error`](Self::with_error).
    pub fn new(
        category: AuditCategory,
        source: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            category,
            source: source.into(),
            action: action.into(),
            outcome: AuditOutcome::Success,
            object_id: None,
            object_type: None,
            details: None,
            error: None,
        }
    }

    /// Sets the outcome of the action.
    pub fn with_outcome(mut self, outcome: AuditOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Sets the identifier of the affected object.
    pub fn with_object_id(mut self, id: impl Into<String>) -> Self {
        self.object_id = Some(id.into());
        self
    }

    /// Sets the object type classification.
    pub fn with_object_type(mut self, obj_type: impl Into<String>) -> Self {
        self.object_type = Some(obj_type.into());
        self
    }

    /// Adds structured context details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Sets the error message and marks the outcome as `Failure`.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.outcome = AuditOutcome::Failure;
        self
    }

    /// Serializes the record to JSON for log ingestion.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"error":"serialization_failed","message":"{}"}}"#, e))
    }
}

/// Emits an audit record at a level matching its outcome.
///
/// Success records log at info, denied at warn, failures at error, all under
/// the `audit` target.
#[macro_export]
macro_rules! audit_log {
    ($record:expr) => {
        let record = $record;
        match record.outcome {
            $crate::audit::AuditOutcome::Success => {
                tracing::info!(
                    target: "audit",
                    category = %record.category,
                    source = %record.source,
                    action = %record.action,
                    outcome = %record.outcome,
                    audit_json = %record.to_json(),
                    "AUDIT: {} - {} - {}",
                    record.category,
                    record.action,
                    record.outcome
                );
            }
            $crate::audit::AuditOutcome::Denied => {
                tracing::warn!(
                    target: "audit",
                    category = %record.category,
                    source = %record.source,
                    action = %record.action,
                    outcome = %record.outcome,
                    audit_json = %record.to_json(),
                    "AUDIT: {} - {} - {}",
                    record.category,
                    record.action,
                    record.outcome
                );
            }
            $crate::audit::AuditOutcome::Failure => {
                tracing::error!(
                    target: "audit",
                    category = %record.category,
                    source = %record.source,
                    action = %record.action,
                    outcome = %record.outcome,
                    audit_json = %record.to_json(),
                    "AUDIT: {} - {} - {}",
                    record.category,
                    record.action,
                    record.outcome
                );
            }
        }
    };
}

/// Debug-level logging with a structured source field.
#[macro_export]
macro_rules! debug_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::debug!(
            source = $source,
            $($arg)*
        )
    };
}

/// Info-level logging with a structured source field.
#[macro_export]
macro_rules! info_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::info!(
            source = $source,
            $($arg)*
        )
    };
}

/// Warning-level logging with a structured source field.
#[macro_export]
macro_rules! warn_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::warn!(
            source = $source,
            $($arg)*
        )
    };
}

/// Error-level logging with a structured source field.
#[macro_export]
macro_rules! error_log {
    ($source:expr, $($arg:tt)*) => {
        tracing::error!(
            source = $source,
            $($arg)*
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = AuditRecord::new(AuditCategory::EntryCreate, "UcFdbTable", "add_entry")
            .with_object_id("10/aa:bb:cc:dd:ee:01")
            .with_object_type("uc_entry")
            .with_details(serde_json::json!({ "port": "port3" }));

        assert_eq!(record.outcome, AuditOutcome::Success);
        assert_eq!(record.object_type.as_deref(), Some("uc_entry"));
    }

    #[test]
    fn test_with_error_marks_failure() {
        let record = AuditRecord::new(AuditCategory::Flush, "FlushCoordinator", "flush_port")
            .with_error("bridge not found");

        assert_eq!(record.outcome, AuditOutcome::Failure);
        assert!(record.error.is_some());
    }

    #[test]
    fn test_json_roundtrip() {
        let record = AuditRecord::new(AuditCategory::Aging, "AgingEngine", "expire")
            .with_object_id("10/aa:bb:cc:dd:ee:01");
        let json = record.to_json();

        let parsed: AuditRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.category, AuditCategory::Aging);
        assert_eq!(parsed.object_id.as_deref(), Some("10/aa:bb:cc:dd:ee:01"));
    }
}
