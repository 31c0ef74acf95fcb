//! Codec error types

use crate::tag::Tag;
use tessera_core::ModelError;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised while encoding or decoding
#[derive(Debug, Error)]
pub enum CodecError {
    /// Underlying reader or writer failed, including truncated input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Byte is not in the tag table
    #[error("unknown tag: 0x{0:02x}")]
    UnknownTag(u8),

    /// Known tag in a position that does not allow it
    #[error("expected {expected} but found {found}")]
    UnexpectedTag {
        /// What the reader was looking for
        expected: &'static str,
        /// Tag actually present
        found: Tag,
    },

    /// Flag byte other than 0 or 1
    #[error("invalid flag byte: 0x{0:02x}")]
    InvalidFlag(u8),

    /// String payload is not UTF-8
    #[error("invalid UTF-8 in {what}: {source}")]
    InvalidUtf8 {
        /// Item being decoded
        what: &'static str,
        /// Decoder error
        source: std::string::FromUtf8Error,
    },

    /// Input exceeds a configured decode limit
    #[error("{what} exceeds limit: {actual} > {max}")]
    LimitExceeded {
        /// Which limit
        what: &'static str,
        /// Observed size or depth
        actual: usize,
        /// Configured maximum
        max: usize,
    },

    /// Bytes remain after a complete item
    #[error("{0} trailing byte(s) after encoded item")]
    TrailingBytes(usize),

    /// Value has no wire form
    #[error("cannot encode {0}")]
    Unencodable(String),

    /// Timestamp text did not parse
    #[error("invalid timestamp {text:?}: {reason}")]
    InvalidTimestamp {
        /// Decoded text
        text: String,
        /// Parser message
        reason: String,
    },

    /// Decoded names or types failed validation
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CodecError {
    /// Tag mismatch
    pub fn unexpected(expected: &'static str, found: Tag) -> Self {
        CodecError::UnexpectedTag { expected, found }
    }

    /// Whether the input ended before the item was complete
    pub fn is_truncated(&self) -> bool {
        matches!(self, CodecError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(CodecError::UnknownTag(0x18).to_string(), "unknown tag: 0x18");
        assert_eq!(
            CodecError::unexpected("value", Tag::End).to_string(),
            "expected value but found end (0x1a)"
        );
        assert_eq!(
            CodecError::LimitExceeded {
                what: "nesting depth",
                actual: 129,
                max: 128
            }
            .to_string(),
            "nesting depth exceeds limit: 129 > 128"
        );
    }

    #[test]
    fn test_truncation_detected() {
        let eof = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        assert!(CodecError::from(eof).is_truncated());
        assert!(!CodecError::TrailingBytes(1).is_truncated());
    }
}
