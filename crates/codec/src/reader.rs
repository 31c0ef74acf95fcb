//! Binary reader
//!
//! Mirrors [`BinWriter`](crate::BinWriter). The reader holds at most one
//! tag byte of lookahead, which is how list elements are told apart from
//! the closing `End` without an element count.

use crate::error::{CodecError, Result};
use crate::limits::CodecLimits;
use crate::tag::Tag;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;
use tessera_core::{
    AtomicType, DeclaredTypeName, EnumValue, Identifier, ListType, Namespace, QualifiedTypeName,
    RangeRestriction, RegexRestriction, Restriction, Struct, SymbolMap, Timestamp, TypeName,
    TypeReference, Value,
};

/// Reads tagged items from a byte source
#[derive(Debug)]
pub struct BinReader<R> {
    inner: R,
    peeked: Option<Tag>,
    limits: CodecLimits,
    depth: usize,
}

impl<R: Read> BinReader<R> {
    /// Reader with default limits
    pub fn new(inner: R) -> Self {
        Self::with_limits(inner, CodecLimits::default())
    }

    /// Reader with custom limits
    pub fn with_limits(inner: R, limits: CodecLimits) -> Self {
        BinReader {
            inner,
            peeked: None,
            limits,
            depth: 0,
        }
    }

    /// Limits in force
    pub fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// Fail with [`CodecError::TrailingBytes`] unless the source is exhausted
    pub fn finish(mut self) -> Result<()> {
        let mut rest = Vec::new();
        self.inner.read_to_end(&mut rest)?;
        let trailing = rest.len() + usize::from(self.peeked.is_some());
        if trailing > 0 {
            return Err(CodecError::TrailingBytes(trailing));
        }
        Ok(())
    }

    // ========================================================================
    // Tags and primitives
    // ========================================================================

    /// Next tag without consuming it
    pub fn peek_tag(&mut self) -> Result<Tag> {
        match self.peeked {
            Some(tag) => Ok(tag),
            None => {
                let tag = Tag::try_from(self.inner.read_u8()?)?;
                self.peeked = Some(tag);
                Ok(tag)
            }
        }
    }

    /// Consume the next tag
    pub fn read_tag(&mut self) -> Result<Tag> {
        match self.peeked.take() {
            Some(tag) => Ok(tag),
            None => Tag::try_from(self.inner.read_u8()?),
        }
    }

    fn expect_tag(&mut self, expected: Tag) -> Result<()> {
        let found = self.read_tag()?;
        if found != expected {
            return Err(CodecError::unexpected(expected.name(), found));
        }
        Ok(())
    }

    fn read_flag(&mut self) -> Result<bool> {
        match self.inner.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidFlag(other)),
        }
    }

    fn read_len(&mut self) -> Result<usize> {
        Ok(self.inner.read_u32::<LittleEndian>()? as usize)
    }

    fn read_string(&mut self, what: &'static str) -> Result<String> {
        let len = self.read_len()?;
        self.limits.check_string(len)?;
        let mut bytes = vec![0u8; len];
        self.inner.read_exact(&mut bytes)?;
        String::from_utf8(bytes).map_err(|source| CodecError::InvalidUtf8 { what, source })
    }

    fn read_buffer(&mut self) -> Result<Vec<u8>> {
        let len = self.read_len()?;
        self.limits.check_buffer(len)?;
        let mut bytes = vec![0u8; len];
        self.inner.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    fn read_count(&mut self) -> Result<usize> {
        let count = self.inner.read_u8()? as usize;
        self.limits.check_parts(count)?;
        Ok(count)
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.limits.check_depth(self.depth + 1)?;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Identifier
    pub fn read_identifier(&mut self) -> Result<Identifier> {
        self.expect_tag(Tag::Identifier)?;
        let count = self.read_count()?;
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.read_string("identifier")?);
        }
        Ok(Identifier::from_parts(parts)?)
    }

    /// Namespace
    pub fn read_namespace(&mut self) -> Result<Namespace> {
        self.expect_tag(Tag::Namespace)?;
        let count = self.read_count()?;
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.read_identifier()?);
        }
        let version = self.read_identifier()?;
        Ok(Namespace::new(parts, version)?)
    }

    /// Unqualified type name
    pub fn read_declared_name(&mut self) -> Result<DeclaredTypeName> {
        self.expect_tag(Tag::DeclaredTypeName)?;
        self.declared_name_body()
    }

    fn declared_name_body(&mut self) -> Result<DeclaredTypeName> {
        let text = self.read_string("type name")?;
        Ok(DeclaredTypeName::new(text)?)
    }

    /// Qualified type name
    pub fn read_qualified_name(&mut self) -> Result<QualifiedTypeName> {
        self.expect_tag(Tag::QualifiedTypeName)?;
        self.qualified_name_body()
    }

    fn qualified_name_body(&mut self) -> Result<QualifiedTypeName> {
        let namespace = self.read_namespace()?;
        let name = self.read_declared_name()?;
        Ok(QualifiedTypeName::new(namespace, name))
    }

    /// Declared or qualified name
    pub fn read_type_name(&mut self) -> Result<TypeName> {
        match self.read_tag()? {
            Tag::DeclaredTypeName => Ok(self.declared_name_body()?.into()),
            Tag::QualifiedTypeName => Ok(self.qualified_name_body()?.into()),
            other => Err(CodecError::unexpected("type name", other)),
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Regex or range restriction
    pub fn read_restriction(&mut self) -> Result<Restriction> {
        match self.read_tag()? {
            Tag::Regex => {
                let pattern = self.read_string("regex")?;
                Ok(RegexRestriction::new(pattern)?.into())
            }
            Tag::Range => {
                let min_closed = self.read_flag()?;
                let min = self.read_optional_value()?;
                let max = self.read_optional_value()?;
                let max_closed = self.read_flag()?;
                Ok(RangeRestriction::new(min, min_closed, max, max_closed)?.into())
            }
            other => Err(CodecError::unexpected("restriction", other)),
        }
    }

    /// Atomic, list or nullable type
    pub fn read_type_reference(&mut self) -> Result<TypeReference> {
        let tag = self.read_tag()?;
        self.nested(|r| r.type_reference_body(tag))
    }

    fn type_reference_body(&mut self, tag: Tag) -> Result<TypeReference> {
        match tag {
            Tag::AtomicType => {
                let name = self.read_type_name()?;
                let atomic = if self.peek_tag()? == Tag::Nil {
                    self.read_tag()?;
                    AtomicType::new(name)
                } else {
                    let restriction = self.read_restriction()?;
                    AtomicType::restricted(name, restriction)?
                };
                Ok(atomic.into())
            }
            Tag::ListType => {
                let element = self.read_type_reference()?;
                let allows_empty = self.read_flag()?;
                Ok(ListType::new(element, allows_empty).into())
            }
            Tag::NullableType => {
                let inner = self.read_type_reference()?;
                Ok(TypeReference::nullable(inner)?)
            }
            other => Err(CodecError::unexpected("type reference", other)),
        }
    }

    // ========================================================================
    // Values
    // ========================================================================

    fn read_optional_value(&mut self) -> Result<Option<Value>> {
        if self.peek_tag()? == Tag::Nil {
            self.read_tag()?;
            return Ok(None);
        }
        self.read_value().map(Some)
    }

    /// Any value; `Nil` decodes as `Value::Null`
    pub fn read_value(&mut self) -> Result<Value> {
        let tag = self.read_tag()?;
        match tag {
            Tag::Nil => Ok(Value::Null),
            Tag::Boolean => Ok(Value::Boolean(self.read_flag()?)),
            Tag::String => Ok(Value::String(self.read_string("string")?)),
            Tag::Int32 => Ok(Value::Int32(self.inner.read_i32::<LittleEndian>()?)),
            Tag::Int64 => Ok(Value::Int64(self.inner.read_i64::<LittleEndian>()?)),
            Tag::Uint32 => Ok(Value::Uint32(self.inner.read_u32::<LittleEndian>()?)),
            Tag::Uint64 => Ok(Value::Uint64(self.inner.read_u64::<LittleEndian>()?)),
            Tag::Float32 => Ok(Value::Float32(self.inner.read_f32::<LittleEndian>()?)),
            Tag::Float64 => Ok(Value::Float64(self.inner.read_f64::<LittleEndian>()?)),
            Tag::Timestamp => {
                let text = self.read_string("timestamp")?;
                let ts = Timestamp::parse_rfc3339(&text).map_err(|e| {
                    CodecError::InvalidTimestamp {
                        text: text.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Value::Timestamp(ts))
            }
            Tag::Buffer => Ok(Value::Buffer(self.read_buffer()?)),
            Tag::Enum => {
                let type_name = self.read_type_name()?;
                let value = self.read_identifier()?;
                Ok(Value::Enum(EnumValue::new(type_name, value)))
            }
            Tag::SymbolMap => self.nested(|r| r.map_entries().map(Value::SymbolMap)),
            Tag::Struct => self.nested(|r| {
                let type_name = r.read_type_name()?;
                let fields = r.map_entries()?;
                Ok(Value::Struct(Struct::new(type_name, fields)))
            }),
            Tag::List => self.nested(|r| {
                let mut items = Vec::new();
                while r.peek_tag()? != Tag::End {
                    items.push(r.read_value()?);
                }
                r.read_tag()?;
                Ok(Value::List(items))
            }),
            other => Err(CodecError::unexpected("value", other)),
        }
    }

    fn map_entries(&mut self) -> Result<SymbolMap> {
        let mut map = SymbolMap::new();
        loop {
            match self.read_tag()? {
                Tag::MapPair => {
                    let key = self.read_identifier()?;
                    let value = self.read_value()?;
                    map.try_insert(key, value)?;
                }
                Tag::End => return Ok(map),
                other => return Err(CodecError::unexpected("map pair or end", other)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(bytes: &[u8]) -> BinReader<&[u8]> {
        BinReader::new(bytes)
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut r = reader(&[0x0a, 1]);
        assert_eq!(r.peek_tag().unwrap(), Tag::Boolean);
        assert_eq!(r.peek_tag().unwrap(), Tag::Boolean);
        assert_eq!(r.read_value().unwrap(), Value::Boolean(true));
        r.finish().unwrap();
    }

    #[test]
    fn test_nil_is_null() {
        assert_eq!(reader(&[0x00]).read_value().unwrap(), Value::Null);
    }

    #[test]
    fn test_unassigned_tag() {
        let err = reader(&[0x18]).read_value().unwrap_err();
        assert!(matches!(err, CodecError::UnknownTag(0x18)));
    }

    #[test]
    fn test_end_where_value_expected() {
        let err = reader(&[0x1a]).read_value().unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnexpectedTag {
                expected: "value",
                found: Tag::End
            }
        ));
    }

    #[test]
    fn test_truncated_input() {
        let err = reader(&[0x0c, 1, 0]).read_value().unwrap_err();
        assert!(err.is_truncated());
        let err = reader(&[0x19, 0x00]).read_value().unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_bad_flag() {
        let err = reader(&[0x0a, 2]).read_value().unwrap_err();
        assert!(matches!(err, CodecError::InvalidFlag(2)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = reader(&[0x0b, 1, 0, 0, 0, 0xff]).read_value().unwrap_err();
        assert!(matches!(err, CodecError::InvalidUtf8 { what: "string", .. }));
    }

    #[test]
    fn test_string_limit_checked_before_allocation() {
        let mut r = BinReader::with_limits(
            &[0x0b, 0xff, 0xff, 0xff, 0x7f][..],
            CodecLimits::with_small_limits(),
        );
        let err = r.read_value().unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitExceeded {
                what: "string length",
                ..
            }
        ));
    }

    #[test]
    fn test_nesting_limit() {
        // five nested lists, limit four
        let bytes = [0x19, 0x19, 0x19, 0x19, 0x19, 0x1a, 0x1a, 0x1a, 0x1a, 0x1a];
        let mut r = BinReader::with_limits(&bytes[..], CodecLimits::with_small_limits());
        let err = r.read_value().unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitExceeded {
                what: "nesting depth",
                actual: 5,
                max: 4
            }
        ));

        let mut r = BinReader::with_limits(&bytes[1..9], CodecLimits::with_small_limits());
        assert!(r.read_value().is_ok());
    }

    #[test]
    fn test_duplicate_map_key_rejected() {
        let pair = [0x16, 0x01, 1, 1, 0, 0, 0, b'a', 0x00];
        let mut bytes = vec![0x15];
        bytes.extend_from_slice(&pair);
        bytes.extend_from_slice(&pair);
        bytes.push(0x1a);
        let err = reader(&bytes).read_value().unwrap_err();
        assert!(matches!(err, CodecError::Model(_)));
    }

    #[test]
    fn test_map_requires_pair_marker() {
        let err = reader(&[0x15, 0x0a, 1, 0x1a]).read_value().unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnexpectedTag {
                expected: "map pair or end",
                found: Tag::Boolean
            }
        ));
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        // uppercase part
        let err = reader(&[0x01, 1, 1, 0, 0, 0, b'A'])
            .read_identifier()
            .unwrap_err();
        assert!(matches!(err, CodecError::Model(_)));
        let err = reader(&[0x01, 0]).read_identifier().unwrap_err();
        assert!(matches!(err, CodecError::Model(_)));
    }

    #[test]
    fn test_nested_nullable_rejected() {
        let bytes = [0x07, 0x07, 0x05, 0x03, 1, 0, 0, 0, b'S', 0x00];
        let err = reader(&bytes).read_type_reference().unwrap_err();
        assert!(matches!(err, CodecError::Model(_)));
    }

    #[test]
    fn test_finish_counts_trailing_bytes() {
        let mut r = reader(&[0x00, 0x00, 0x00]);
        r.read_value().unwrap();
        assert!(matches!(r.finish(), Err(CodecError::TrailingBytes(2))));

        let mut r = reader(&[0x00, 0x00]);
        r.read_value().unwrap();
        r.peek_tag().unwrap();
        assert!(matches!(r.finish(), Err(CodecError::TrailingBytes(1))));
    }

    #[test]
    fn test_bad_timestamp() {
        let mut bytes = vec![0x12, 3, 0, 0, 0];
        bytes.extend_from_slice(b"now");
        let err = reader(&bytes).read_value().unwrap_err();
        assert!(matches!(err, CodecError::InvalidTimestamp { .. }));
    }
}
