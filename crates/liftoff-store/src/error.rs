//! Error types for store operations.
//!
//! # Design
//!
//! - Keep error messages constant; carry context in structured fields.
//! - Preserve driver errors as sources without re-logging at call sites.

use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Establishing or probing the database connection failed.
    #[error("database connection failed")]
    Connection {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying driver error.
        source: mongodb::error::Error,
    },
    /// A request field contained an invalid value.
    #[error("invalid field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

impl StoreError {
    pub(crate) const fn connection(operation: &'static str, source: mongodb::error::Error) -> Self {
        Self::Connection { operation, source }
    }

    pub(crate) const fn invalid_field(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidField { field, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn store_error_display_and_source() {
        let connection = StoreError::connection(
            "connect.probe",
            mongodb::error::Error::custom("unreachable"),
        );
        assert_eq!(connection.to_string(), "database connection failed");
        assert!(connection.source().is_some());

        let invalid = StoreError::invalid_field("targetDate", "required");
        assert_eq!(invalid.to_string(), "invalid field");
        assert!(invalid.source().is_none());
    }
}
