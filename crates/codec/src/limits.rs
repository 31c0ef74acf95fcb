//! Decode limits
//!
//! Input handed to the reader may be untrusted. These bounds are checked
//! before any allocation sized by the input and before each descent into a
//! nested item. Violations return [`CodecError::LimitExceeded`].
//!
//! Stored under `[codec]` in `tessera.toml`; every key is optional.

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};

/// Size and depth bounds for decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecLimits {
    /// Maximum container and type nesting (default: 128)
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Maximum string, name and timestamp length in bytes (default: 16MB)
    #[serde(default = "default_max_bytes")]
    pub max_string_bytes: usize,

    /// Maximum buffer length (default: 16MB)
    #[serde(default = "default_max_bytes")]
    pub max_buffer_bytes: usize,

    /// Maximum identifier or namespace parts (default: 255)
    #[serde(default = "default_max_identifier_parts")]
    pub max_identifier_parts: usize,
}

fn default_max_nesting_depth() -> usize {
    128
}

fn default_max_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_max_identifier_parts() -> usize {
    u8::MAX as usize
}

impl Default for CodecLimits {
    fn default() -> Self {
        CodecLimits {
            max_nesting_depth: default_max_nesting_depth(),
            max_string_bytes: default_max_bytes(),
            max_buffer_bytes: default_max_bytes(),
            max_identifier_parts: default_max_identifier_parts(),
        }
    }
}

impl CodecLimits {
    /// Small limits for tests that exercise enforcement
    pub fn with_small_limits() -> Self {
        CodecLimits {
            max_nesting_depth: 4,
            max_string_bytes: 16,
            max_buffer_bytes: 16,
            max_identifier_parts: 3,
        }
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        check("nesting depth", depth, self.max_nesting_depth)
    }

    pub(crate) fn check_string(&self, len: usize) -> Result<()> {
        check("string length", len, self.max_string_bytes)
    }

    pub(crate) fn check_buffer(&self, len: usize) -> Result<()> {
        check("buffer length", len, self.max_buffer_bytes)
    }

    pub(crate) fn check_parts(&self, count: usize) -> Result<()> {
        check("identifier parts", count, self.max_identifier_parts)
    }
}

fn check(what: &'static str, actual: usize, max: usize) -> Result<()> {
    if actual > max {
        return Err(CodecError::LimitExceeded { what, actual, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let limits = CodecLimits::default();
        assert_eq!(limits.max_nesting_depth, 128);
        assert_eq!(limits.max_string_bytes, 16 * 1024 * 1024);
        assert_eq!(limits.max_buffer_bytes, 16 * 1024 * 1024);
        assert_eq!(limits.max_identifier_parts, 255);
    }

    #[test]
    fn test_check_is_inclusive() {
        let limits = CodecLimits::with_small_limits();
        assert!(limits.check_string(16).is_ok());
        let err = limits.check_string(17).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitExceeded {
                what: "string length",
                actual: 17,
                max: 16
            }
        ));
        assert!(limits.check_depth(4).is_ok());
        assert!(limits.check_depth(5).is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let limits: CodecLimits = serde_json::from_str(r#"{"max_nesting_depth":8}"#).unwrap();
        assert_eq!(limits.max_nesting_depth, 8);
        assert_eq!(limits.max_buffer_bytes, 16 * 1024 * 1024);
    }
}
