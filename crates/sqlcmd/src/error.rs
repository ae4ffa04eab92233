//! Error types for sqlcmd

use thiserror::Error;

/// Result type alias for sqlcmd operations
pub type CmdResult<T> = Result<T, CmdError>;

/// Error types for command building and execution
#[derive(Debug, Error)]
pub enum CmdError {
    /// A command was executed without the state it requires (no record, no condition).
    ///
    /// Raised before any SQL reaches the connection.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error reported by the database while executing a statement
    #[error("Database error: {0}")]
    Database(String),

    /// The connection cannot perform the requested operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// The connection returned a result of the wrong shape for the command
    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Record serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CmdError {
    /// Create a precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    pub fn no_data_to_insert() -> Self {
        Self::precondition("no data to insert")
    }

    pub fn nothing_to_update() -> Self {
        Self::precondition("nothing to update")
    }

    pub fn update_without_condition() -> Self {
        Self::precondition("can't update without condition")
    }

    pub fn delete_without_condition() -> Self {
        Self::precondition("can't delete without condition")
    }

    /// Create a database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Create an unsupported-operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a precondition error
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// Check if this is an unsupported-operation error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

impl From<serde_json::Error> for CmdError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_messages() {
        assert_eq!(
            CmdError::nothing_to_update().to_string(),
            "Precondition failed: nothing to update"
        );
        assert_eq!(
            CmdError::update_without_condition().to_string(),
            "Precondition failed: can't update without condition"
        );
        assert_eq!(
            CmdError::delete_without_condition().to_string(),
            "Precondition failed: can't delete without condition"
        );
        assert!(CmdError::no_data_to_insert().is_precondition());
    }

    #[test]
    fn unsupported_is_not_precondition() {
        let err = CmdError::unsupported("this client can't begin a transaction");
        assert!(err.is_unsupported());
        assert!(!err.is_precondition());
    }
}
