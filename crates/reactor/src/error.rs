//! Reactor error types
//!
//! Every failure aborts the traversal that raised it. Each error carries the
//! [`ObjectPath`] of the event being processed; `Display` renders
//! `<path>: <message>`, or just the message at the root. The message text
//! returned by [`ReactorError::message`] is stable and matched on by callers.

use tessera_core::{Identifier, ModelError, ObjectPath, TypeReference};
use thiserror::Error;

/// Result type alias for reactor operations
pub type Result<T> = std::result::Result<T, ReactorError>;

/// Errors raised while processing an event stream
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReactorError {
    /// Kind-level mismatch; no further coercion applies
    #[error("{}{}", located(.path), type_cast_message(.expected, .actual))]
    TypeCast {
        /// Location of the value
        path: ObjectPath,
        /// Type the value was cast to
        expected: TypeReference,
        /// Type the value had
        actual: TypeReference,
    },

    /// Right kind, invalid content
    #[error("{}{message}", located(.path))]
    ValueCast {
        /// Location of the value
        path: ObjectPath,
        /// Description of the problem
        message: String,
    },

    /// Required fields absent from a struct
    #[error("{}{}", located(.path), missing_fields_message(.fields))]
    MissingFields {
        /// Location of the struct
        path: ObjectPath,
        /// Every missing field
        fields: Vec<Identifier>,
    },

    /// Field not declared by the struct's type
    #[error("{}unrecognized field: {field}", located(.path))]
    UnrecognizedField {
        /// Location of the struct
        path: ObjectPath,
        /// The undeclared field
        field: Identifier,
    },

    /// Event sequence breaks the document grammar
    #[error("{}{message}", located(.path))]
    Structural {
        /// Location of the offending event
        path: ObjectPath,
        /// Description of the problem
        message: String,
    },

    /// Pointer allocation/reference inconsistency
    #[error("{}{message}", located(.path))]
    Reference {
        /// Location of the offending event
        path: ObjectPath,
        /// Description of the problem
        message: String,
    },

    /// Terminal sink could not take the event
    #[error("{}{message}", located(.path))]
    Sink {
        /// Location of the offending event
        path: ObjectPath,
        /// Description of the problem
        message: String,
    },

    /// Model object could not be built from the stream
    #[error(transparent)]
    Model(#[from] ModelError),
}

fn located(path: &ObjectPath) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{}: ", path)
    }
}

fn type_cast_message(expected: &TypeReference, actual: &TypeReference) -> String {
    format!("Expected value of type {} but found {}", expected, actual)
}

fn missing_fields_message(fields: &[Identifier]) -> String {
    let names: Vec<String> = fields.iter().map(Identifier::external_form).collect();
    format!("missing field(s): {}", names.join(", "))
}

impl ReactorError {
    /// Kind mismatch
    pub fn type_cast(path: ObjectPath, expected: TypeReference, actual: TypeReference) -> Self {
        ReactorError::TypeCast {
            path,
            expected,
            actual,
        }
    }

    /// Invalid content
    pub fn value_cast(path: ObjectPath, message: impl Into<String>) -> Self {
        ReactorError::ValueCast {
            path,
            message: message.into(),
        }
    }

    /// Missing required fields
    pub fn missing_fields(path: ObjectPath, fields: Vec<Identifier>) -> Self {
        ReactorError::MissingFields { path, fields }
    }

    /// Undeclared field
    pub fn unrecognized_field(path: ObjectPath, field: Identifier) -> Self {
        ReactorError::UnrecognizedField { path, field }
    }

    /// Grammar violation
    pub fn structural(path: ObjectPath, message: impl Into<String>) -> Self {
        ReactorError::Structural {
            path,
            message: message.into(),
        }
    }

    /// Pointer inconsistency
    pub fn reference(path: ObjectPath, message: impl Into<String>) -> Self {
        ReactorError::Reference {
            path,
            message: message.into(),
        }
    }

    /// Sink failure
    pub fn sink(path: ObjectPath, message: impl Into<String>) -> Self {
        ReactorError::Sink {
            path,
            message: message.into(),
        }
    }

    /// Location the error was raised at; `None` for model errors
    pub fn path(&self) -> Option<&ObjectPath> {
        match self {
            ReactorError::TypeCast { path, .. }
            | ReactorError::ValueCast { path, .. }
            | ReactorError::MissingFields { path, .. }
            | ReactorError::UnrecognizedField { path, .. }
            | ReactorError::Structural { path, .. }
            | ReactorError::Reference { path, .. }
            | ReactorError::Sink { path, .. } => Some(path),
            ReactorError::Model(_) => None,
        }
    }

    /// The message without its location prefix
    pub fn message(&self) -> String {
        match self {
            ReactorError::TypeCast {
                expected, actual, ..
            } => type_cast_message(expected, actual),
            ReactorError::ValueCast { message, .. }
            | ReactorError::Structural { message, .. }
            | ReactorError::Reference { message, .. }
            | ReactorError::Sink { message, .. } => message.clone(),
            ReactorError::MissingFields { fields, .. } => missing_fields_message(fields),
            ReactorError::UnrecognizedField { field, .. } => format!("unrecognized field: {}", field),
            ReactorError::Model(e) => e.to_string(),
        }
    }
}
