//! Wire tag registry
//!
//! Every encoded item starts with one tag byte. `0x18` is unassigned and
//! decodes as an unknown tag.
//!
//! | Range | Items |
//! |-------|-------|
//! | 0x00 | Nil |
//! | 0x01-0x04 | Names |
//! | 0x05-0x07 | Type references |
//! | 0x08-0x09 | Restrictions |
//! | 0x0a-0x13 | Scalars |
//! | 0x14-0x1a | Enums, containers and their delimiters |

use crate::error::CodecError;
use std::fmt;

/// Tag byte preceding each encoded item
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Absent value, absent restriction, or `Value::Null`
    Nil = 0x00,

    // ========================================================================
    // Names (0x01-0x04)
    // ========================================================================
    /// Multi-part identifier
    Identifier = 0x01,
    /// Namespace parts and version
    Namespace = 0x02,
    /// Unqualified type name
    DeclaredTypeName = 0x03,
    /// Namespace plus declared name
    QualifiedTypeName = 0x04,

    // ========================================================================
    // Type references (0x05-0x07)
    // ========================================================================
    /// Named type with optional restriction
    AtomicType = 0x05,
    /// List of an element type
    ListType = 0x06,
    /// Nullable wrapper
    NullableType = 0x07,

    // ========================================================================
    // Restrictions (0x08-0x09)
    // ========================================================================
    /// Regex pattern
    Regex = 0x08,
    /// Numeric or timestamp range
    Range = 0x09,

    // ========================================================================
    // Scalars (0x0a-0x13)
    // ========================================================================
    /// `u8` 0 or 1
    Boolean = 0x0a,
    /// Length-prefixed UTF-8
    String = 0x0b,
    /// 4 bytes LE
    Int32 = 0x0c,
    /// 8 bytes LE
    Int64 = 0x0d,
    /// 4 bytes LE
    Uint32 = 0x0e,
    /// 8 bytes LE
    Uint64 = 0x0f,
    /// IEEE 754 single, LE
    Float32 = 0x10,
    /// IEEE 754 double, LE
    Float64 = 0x11,
    /// Length-prefixed RFC 3339 text
    Timestamp = 0x12,
    /// Length-prefixed bytes
    Buffer = 0x13,

    // ========================================================================
    // Enums and containers (0x14-0x1a)
    // ========================================================================
    /// Type name then enumerator identifier
    Enum = 0x14,
    /// Map pairs until `End`
    SymbolMap = 0x15,
    /// Precedes each map or struct entry
    MapPair = 0x16,
    /// Type name then map pairs until `End`
    Struct = 0x17,
    /// Elements until `End`
    List = 0x19,
    /// Closes a map, struct or list
    End = 0x1a,
}

impl Tag {
    /// Byte written on the wire
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Tag::Nil => "nil",
            Tag::Identifier => "identifier",
            Tag::Namespace => "namespace",
            Tag::DeclaredTypeName => "declared type name",
            Tag::QualifiedTypeName => "qualified type name",
            Tag::AtomicType => "atomic type",
            Tag::ListType => "list type",
            Tag::NullableType => "nullable type",
            Tag::Regex => "regex restriction",
            Tag::Range => "range restriction",
            Tag::Boolean => "boolean",
            Tag::String => "string",
            Tag::Int32 => "int32",
            Tag::Int64 => "int64",
            Tag::Uint32 => "uint32",
            Tag::Uint64 => "uint64",
            Tag::Float32 => "float32",
            Tag::Float64 => "float64",
            Tag::Timestamp => "timestamp",
            Tag::Buffer => "buffer",
            Tag::Enum => "enum",
            Tag::SymbolMap => "symbol map",
            Tag::MapPair => "map pair",
            Tag::Struct => "struct",
            Tag::List => "list",
            Tag::End => "end",
        }
    }

    /// Tags that start a value
    pub fn starts_value(self) -> bool {
        match self {
            Tag::Nil | Tag::Enum | Tag::SymbolMap | Tag::Struct | Tag::List => true,
            scalar => (Tag::Boolean.as_u8()..=Tag::Buffer.as_u8()).contains(&scalar.as_u8()),
        }
    }

    /// Tags that start a type reference
    pub fn starts_type_reference(self) -> bool {
        matches!(self, Tag::AtomicType | Tag::ListType | Tag::NullableType)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.name(), self.as_u8())
    }
}

impl TryFrom<u8> for Tag {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Tag::Nil),
            0x01 => Ok(Tag::Identifier),
            0x02 => Ok(Tag::Namespace),
            0x03 => Ok(Tag::DeclaredTypeName),
            0x04 => Ok(Tag::QualifiedTypeName),
            0x05 => Ok(Tag::AtomicType),
            0x06 => Ok(Tag::ListType),
            0x07 => Ok(Tag::NullableType),
            0x08 => Ok(Tag::Regex),
            0x09 => Ok(Tag::Range),
            0x0a => Ok(Tag::Boolean),
            0x0b => Ok(Tag::String),
            0x0c => Ok(Tag::Int32),
            0x0d => Ok(Tag::Int64),
            0x0e => Ok(Tag::Uint32),
            0x0f => Ok(Tag::Uint64),
            0x10 => Ok(Tag::Float32),
            0x11 => Ok(Tag::Float64),
            0x12 => Ok(Tag::Timestamp),
            0x13 => Ok(Tag::Buffer),
            0x14 => Ok(Tag::Enum),
            0x15 => Ok(Tag::SymbolMap),
            0x16 => Ok(Tag::MapPair),
            0x17 => Ok(Tag::Struct),
            0x19 => Ok(Tag::List),
            0x1a => Ok(Tag::End),
            _ => Err(CodecError::UnknownTag(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_assigned_byte_round_trips() {
        for byte in 0x00u8..=0x1a {
            match Tag::try_from(byte) {
                Ok(tag) => assert_eq!(tag.as_u8(), byte),
                Err(e) => {
                    assert_eq!(byte, 0x18);
                    assert!(matches!(e, CodecError::UnknownTag(0x18)));
                }
            }
        }
    }

    #[test]
    fn test_out_of_table_bytes_are_unknown() {
        assert!(matches!(
            Tag::try_from(0x1b),
            Err(CodecError::UnknownTag(0x1b))
        ));
        assert!(Tag::try_from(0xff).is_err());
    }

    #[test]
    fn test_value_and_type_starts() {
        assert!(Tag::Nil.starts_value());
        assert!(Tag::Timestamp.starts_value());
        assert!(Tag::List.starts_value());
        assert!(!Tag::MapPair.starts_value());
        assert!(!Tag::End.starts_value());
        assert!(!Tag::Identifier.starts_value());
        assert!(Tag::NullableType.starts_type_reference());
        assert!(!Tag::Regex.starts_type_reference());
    }

    #[test]
    fn test_display() {
        assert_eq!(Tag::End.to_string(), "end (0x1a)");
    }
}
