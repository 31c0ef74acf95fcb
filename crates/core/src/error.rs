//! Error types for the value and type model
//!
//! Construction of model objects validates eagerly; every failure is a
//! [`ModelError`]. We use `thiserror` for `Display` and `Error` impls.

use crate::identifier::Identifier;
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised while building identifiers, names, types, values and paths
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Identifier text or parts are malformed
    #[error("invalid identifier {input:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Declared type names must be upper camel case
    #[error("invalid declared type name {0:?}")]
    InvalidDeclaredName(String),

    /// Namespace without parts
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    /// A symbol map was built with the same key twice
    #[error("duplicate key: {0}")]
    DuplicateKey(Identifier),

    /// `T??` is not a well-formed type
    #[error("nullable type cannot wrap nullable type {0}")]
    NestedNullable(String),

    /// Restriction cannot be evaluated against the atomic type's values
    #[error("restriction {restriction} cannot be applied to {type_name}")]
    InapplicableRestriction {
        /// Atomic type name
        type_name: String,
        /// Restriction external form
        restriction: String,
    },

    /// Regex restriction pattern did not compile
    #[error("invalid regex {pattern:?}: {reason}")]
    InvalidRegex {
        /// Pattern text
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Range bounds are inconsistent
    #[error("invalid range restriction: {0}")]
    InvalidRange(String),

    /// Object path text could not be parsed
    #[error("invalid path {input:?} at position {position}: {reason}")]
    InvalidPath {
        /// Path text
        input: String,
        /// Byte position of the failure
        position: usize,
        /// What went wrong
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_duplicate_key() {
        let err = ModelError::DuplicateKey(Identifier::parse("field-one").unwrap());
        assert_eq!(err.to_string(), "duplicate key: field-one");
    }

    #[test]
    fn test_error_display_invalid_identifier() {
        let err = ModelError::InvalidIdentifier {
            input: "Bad".to_string(),
            reason: "part must start with a lowercase letter".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"Bad\""));
        assert!(msg.contains("lowercase"));
    }

    #[test]
    fn test_error_display_inapplicable_restriction() {
        let err = ModelError::InapplicableRestriction {
            type_name: "tessera:core@v1/Int32".to_string(),
            restriction: "\"^a$\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "restriction \"^a$\" cannot be applied to tessera:core@v1/Int32"
        );
    }
}
