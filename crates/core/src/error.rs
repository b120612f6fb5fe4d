//! Errors returned by record managers.

/// Result type for manager operations.
pub type Result<T> = std::result::Result<T, QmsError>;

/// A rejected manager operation. State is unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QmsError {
    /// A required field was empty.
    #[error("{operation}: {field} is required")]
    MissingField {
        /// Operation that was rejected
        operation: &'static str,
        /// Field that was missing
        field: &'static str,
    },

    /// A field was present but not acceptable.
    #[error("{operation}: {field} {reason}")]
    InvalidField {
        /// Operation that was rejected
        operation: &'static str,
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },

    /// A referenced record does not exist.
    #[error("{operation}: {entity} with ID {id} not found")]
    NotFound {
        /// Operation that was rejected
        operation: &'static str,
        /// Kind of record
        entity: &'static str,
        /// Requested identifier
        id: String,
    },

    /// The record is not in the state the operation requires.
    #[error("{operation}: {entity} {id} is {actual}, expected {expected}")]
    InvalidState {
        /// Operation that was rejected
        operation: &'static str,
        /// Kind of record
        entity: &'static str,
        /// Record identifier
        id: String,
        /// Current state
        actual: String,
        /// Required state
        expected: String,
    },
}

impl QmsError {
    /// Shorthand for [`QmsError::MissingField`].
    pub fn missing(operation: &'static str, field: &'static str) -> Self {
        Self::MissingField { operation, field }
    }

    /// Shorthand for [`QmsError::NotFound`].
    pub fn not_found(operation: &'static str, entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            operation,
            entity,
            id: id.to_string(),
        }
    }
}
