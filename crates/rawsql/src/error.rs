//! Error types for rawsql

use thiserror::Error;

/// Result type alias for rawsql operations
pub type RawResult<T> = Result<T, RawError>;

/// Error types for compiling raw statements
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawError {
    /// Positional resolution consumed a different number of placeholders
    /// than bindings were supplied.
    #[error("Expected {expected} bindings, saw {actual}")]
    BindingCountMismatch { expected: usize, actual: usize },

    /// The resolved binding list still contains an undefined entry.
    #[error("Undefined binding(s) detected when compiling RAW query: {sql}")]
    UndefinedBinding { sql: String },

    /// Cancel-on-timeout was requested but the client cannot cancel queries.
    #[error("Query cancelling not supported for this dialect")]
    CancelUnsupported,
}

impl RawError {
    /// Create a binding count mismatch error
    pub fn binding_count_mismatch(expected: usize, actual: usize) -> Self {
        Self::BindingCountMismatch { expected, actual }
    }

    /// Create an undefined binding error for the resolved SQL
    pub fn undefined_binding(sql: impl Into<String>) -> Self {
        Self::UndefinedBinding { sql: sql.into() }
    }

    /// Check if this is a binding count mismatch
    pub fn is_binding_count_mismatch(&self) -> bool {
        matches!(self, Self::BindingCountMismatch { .. })
    }

    /// Check if this is an undefined binding error
    pub fn is_undefined_binding(&self) -> bool {
        matches!(self, Self::UndefinedBinding { .. })
    }

    /// Check if this is a cancel-unsupported error
    pub fn is_cancel_unsupported(&self) -> bool {
        matches!(self, Self::CancelUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_counts() {
        let err = RawError::binding_count_mismatch(2, 3);
        assert_eq!(err.to_string(), "Expected 2 bindings, saw 3");
        assert!(err.is_binding_count_mismatch());
    }

    #[test]
    fn undefined_message_carries_sql() {
        let err = RawError::undefined_binding("where x = :missing");
        assert!(err.to_string().ends_with("where x = :missing"));
        assert!(err.is_undefined_binding());
        assert!(!err.is_cancel_unsupported());
    }
}
