//! Status codes and error types for FDB operations.
//!
//! Every API operation resolves to one of six wire-style statuses. The
//! richer [`FdbError`] carries per-variant context and maps back onto
//! [`FdbStatus`] for callers that only consume status codes (bulk
//! per-element results in particular).

use std::fmt;
use thiserror::Error;

/// Wire-style status codes for FDB API operations.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FdbStatus {
    Success = 0,
    ParamError = -1,
    Error = -2,
    NotFound = -3,
    CapacityExceeded = -4,
    LimitExceeded = -5,
}

impl FdbStatus {
    /// Creates a status from a raw i32 value.
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => FdbStatus::Success,
            -1 => FdbStatus::ParamError,
            -3 => FdbStatus::NotFound,
            -4 => FdbStatus::CapacityExceeded,
            -5 => FdbStatus::LimitExceeded,
            _ => FdbStatus::Error,
        }
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == FdbStatus::Success
    }

    /// Returns true if the status indicates an error.
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }
}

impl fmt::Display for FdbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FdbStatus::Success => "FDB_STATUS_SUCCESS",
            FdbStatus::ParamError => "FDB_STATUS_PARAM_ERROR",
            FdbStatus::Error => "FDB_STATUS_ERROR",
            FdbStatus::NotFound => "FDB_STATUS_NOT_FOUND",
            FdbStatus::CapacityExceeded => "FDB_STATUS_CAPACITY_EXCEEDED",
            FdbStatus::LimitExceeded => "FDB_STATUS_LIMIT_EXCEEDED",
        };
        write!(f, "{}", s)
    }
}

/// Error type for FDB operations.
#[derive(Debug, Clone, Error)]
pub enum FdbError {
    /// Malformed or out-of-range input (bridge/VLAN/port id, oversized batch).
    #[error("invalid parameter: {message}")]
    ParamError { message: String },

    /// Exact-match lookup found nothing.
    #[error("not found: {item}")]
    NotFound { item: String },

    /// The bridge table is at its configured capacity.
    #[error("capacity exceeded on {bridge}: {capacity} entries")]
    CapacityExceeded { bridge: String, capacity: usize },

    /// A port- or VLAN-scoped dynamic learning cap is exhausted.
    #[error("learn limit exceeded on {scope}: limit {limit}")]
    LimitExceeded { scope: String, limit: u32 },

    /// Underlying resource failure (reserved for real ASIC bindings).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl FdbError {
    /// Creates a parameter error with a message.
    pub fn param(message: impl Into<String>) -> Self {
        FdbError::ParamError {
            message: message.into(),
        }
    }

    /// Creates a not found error with an item description.
    pub fn not_found(item: impl Into<String>) -> Self {
        FdbError::NotFound { item: item.into() }
    }

    /// Creates a capacity exceeded error.
    pub fn capacity(bridge: impl Into<String>, capacity: usize) -> Self {
        FdbError::CapacityExceeded {
            bridge: bridge.into(),
            capacity,
        }
    }

    /// Creates a limit exceeded error naming the exhausted scope.
    pub fn limit(scope: impl Into<String>, limit: u32) -> Self {
        FdbError::LimitExceeded {
            scope: scope.into(),
            limit,
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        FdbError::Internal {
            message: message.into(),
        }
    }

    /// Maps this error to its wire status code.
    pub fn status(&self) -> FdbStatus {
        match self {
            FdbError::ParamError { .. } => FdbStatus::ParamError,
            FdbError::NotFound { .. } => FdbStatus::NotFound,
            FdbError::CapacityExceeded { .. } => FdbStatus::CapacityExceeded,
            FdbError::LimitExceeded { .. } => FdbStatus::LimitExceeded,
            FdbError::Internal { .. } => FdbStatus::Error,
        }
    }
}

/// Result type for FDB operations.
pub type FdbResult<T> = Result<T, FdbError>;

/// Extension trait for collapsing results into wire statuses.
pub trait FdbResultExt {
    /// Converts this result to a status code.
    fn to_status(&self) -> FdbStatus;
}

impl<T> FdbResultExt for FdbResult<T> {
    fn to_status(&self) -> FdbStatus {
        match self {
            Ok(_) => FdbStatus::Success,
            Err(e) => e.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_from_raw() {
        assert_eq!(FdbStatus::from_raw(0), FdbStatus::Success);
        assert_eq!(FdbStatus::from_raw(-3), FdbStatus::NotFound);
        assert_eq!(FdbStatus::from_raw(-5), FdbStatus::LimitExceeded);
        assert_eq!(FdbStatus::from_raw(-999), FdbStatus::Error);
    }

    #[test]
    fn test_status_classification() {
        assert!(FdbStatus::Success.is_success());
        assert!(!FdbStatus::Success.is_error());
        assert!(FdbStatus::CapacityExceeded.is_error());
    }

    #[test]
    fn test_error_to_status() {
        assert_eq!(FdbError::param("x").status(), FdbStatus::ParamError);
        assert_eq!(FdbError::not_found("x").status(), FdbStatus::NotFound);
        assert_eq!(FdbError::capacity("bridge1", 16).status(), FdbStatus::CapacityExceeded);
        assert_eq!(FdbError::limit("port3", 1).status(), FdbStatus::LimitExceeded);
        assert_eq!(FdbError::internal("x").status(), FdbStatus::Error);
    }

    #[test]
    fn test_result_ext() {
        let ok: FdbResult<()> = Ok(());
        assert_eq!(ok.to_status(), FdbStatus::Success);

        let err: FdbResult<()> = Err(FdbError::limit("vlan10", 4));
        assert_eq!(err.to_status(), FdbStatus::LimitExceeded);
    }

    #[test]
    fn test_error_display_names_scope() {
        let err = FdbError::limit("port3", 1);
        assert_eq!(err.to_string(), "learn limit exceeded on port3: limit 1");
    }
}
