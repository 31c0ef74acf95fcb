//! Binary writer
//!
//! ```text
//! Identifier      = 0x01 count:u8 (len:u32 utf8)*
//! Namespace       = 0x02 count:u8 Identifier* Identifier(version)
//! DeclaredName    = 0x03 len:u32 utf8
//! QualifiedName   = 0x04 Namespace DeclaredName
//! AtomicType      = 0x05 (DeclaredName | QualifiedName) (Restriction | Nil)
//! ListType        = 0x06 TypeReference allows_empty:u8
//! NullableType    = 0x07 TypeReference
//! Regex           = 0x08 len:u32 utf8
//! Range           = 0x09 min_closed:u8 (Value | Nil) (Value | Nil) max_closed:u8
//! Enum            = 0x14 TypeName Identifier
//! SymbolMap       = 0x15 (0x16 Identifier Value)* 0x1a
//! Struct          = 0x17 TypeName (0x16 Identifier Value)* 0x1a
//! List            = 0x19 Value* 0x1a
//! ```
//!
//! Scalars are the tag followed by their little-endian payload. Containers
//! carry no element count, so the `begin_*`/`write_map_pair_key`/`write_end`
//! methods can stream a value whose size is not known up front.

use crate::error::{CodecError, Result};
use crate::tag::Tag;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;
use tessera_core::{
    DeclaredTypeName, Identifier, Namespace, QualifiedTypeName, Restriction, TypeName,
    TypeReference, Value,
};

/// Writes tagged items to a byte sink
#[derive(Debug)]
pub struct BinWriter<W> {
    inner: W,
}

impl<W: Write> BinWriter<W> {
    /// Wrap a byte sink
    pub fn new(inner: W) -> Self {
        BinWriter { inner }
    }

    /// The wrapped sink
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the sink
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Flush the wrapped sink
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    /// Write a bare tag byte
    pub fn write_tag(&mut self, tag: Tag) -> Result<()> {
        self.inner.write_u8(tag.as_u8())?;
        Ok(())
    }

    /// `Nil`
    pub fn write_nil(&mut self) -> Result<()> {
        self.write_tag(Tag::Nil)
    }

    /// Close the innermost map, struct or list
    pub fn write_end(&mut self) -> Result<()> {
        self.write_tag(Tag::End)
    }

    fn write_flag(&mut self, flag: bool) -> Result<()> {
        self.inner.write_u8(u8::from(flag))?;
        Ok(())
    }

    fn write_len_prefixed(&mut self, what: &str, bytes: &[u8]) -> Result<()> {
        let len = u32::try_from(bytes.len()).map_err(|_| {
            CodecError::Unencodable(format!("{} of {} bytes", what, bytes.len()))
        })?;
        self.inner.write_u32::<LittleEndian>(len)?;
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn write_count(&mut self, what: &str, count: usize) -> Result<()> {
        let count = u8::try_from(count)
            .map_err(|_| CodecError::Unencodable(format!("{} with {} parts", what, count)))?;
        self.inner.write_u8(count)?;
        Ok(())
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Identifier with its part count
    pub fn write_identifier(&mut self, id: &Identifier) -> Result<()> {
        self.write_tag(Tag::Identifier)?;
        self.write_count("identifier", id.part_count())?;
        for part in id.parts() {
            self.write_len_prefixed("identifier part", part.as_bytes())?;
        }
        Ok(())
    }

    /// Namespace parts followed by the version identifier
    pub fn write_namespace(&mut self, ns: &Namespace) -> Result<()> {
        self.write_tag(Tag::Namespace)?;
        self.write_count("namespace", ns.parts().len())?;
        for part in ns.parts() {
            self.write_identifier(part)?;
        }
        self.write_identifier(ns.version())
    }

    /// Unqualified type name
    pub fn write_declared_name(&mut self, name: &DeclaredTypeName) -> Result<()> {
        self.write_tag(Tag::DeclaredTypeName)?;
        self.write_len_prefixed("type name", name.as_str().as_bytes())
    }

    /// Namespace then declared name
    pub fn write_qualified_name(&mut self, name: &QualifiedTypeName) -> Result<()> {
        self.write_tag(Tag::QualifiedTypeName)?;
        self.write_namespace(name.namespace())?;
        self.write_declared_name(name.name())
    }

    /// Declared or qualified name, distinguished by tag
    pub fn write_type_name(&mut self, name: &TypeName) -> Result<()> {
        match name {
            TypeName::Declared(d) => self.write_declared_name(d),
            TypeName::Qualified(q) => self.write_qualified_name(q),
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Regex or range restriction
    pub fn write_restriction(&mut self, restriction: &Restriction) -> Result<()> {
        match restriction {
            Restriction::Regex(r) => {
                self.write_tag(Tag::Regex)?;
                self.write_len_prefixed("regex", r.pattern().as_bytes())
            }
            Restriction::Range(r) => {
                self.write_tag(Tag::Range)?;
                self.write_flag(r.min_closed())?;
                self.write_optional_value(r.min())?;
                self.write_optional_value(r.max())?;
                self.write_flag(r.max_closed())
            }
        }
    }

    /// Atomic, list or nullable type
    pub fn write_type_reference(&mut self, type_ref: &TypeReference) -> Result<()> {
        match type_ref {
            TypeReference::Atomic(atomic) => {
                self.write_tag(Tag::AtomicType)?;
                self.write_type_name(atomic.name())?;
                match atomic.restriction() {
                    Some(r) => self.write_restriction(r),
                    None => self.write_nil(),
                }
            }
            TypeReference::List(list) => {
                self.write_tag(Tag::ListType)?;
                self.write_type_reference(list.element())?;
                self.write_flag(list.allows_empty())
            }
            TypeReference::Nullable(inner) => {
                self.write_tag(Tag::NullableType)?;
                self.write_type_reference(inner)
            }
        }
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Start a symbol map; follow with map pairs and [`write_end`](Self::write_end)
    pub fn begin_map(&mut self) -> Result<()> {
        self.write_tag(Tag::SymbolMap)
    }

    /// Start a struct; follow with map pairs and [`write_end`](Self::write_end)
    pub fn begin_struct(&mut self, type_name: &TypeName) -> Result<()> {
        self.write_tag(Tag::Struct)?;
        self.write_type_name(type_name)
    }

    /// Start a list; follow with values and [`write_end`](Self::write_end)
    pub fn begin_list(&mut self) -> Result<()> {
        self.write_tag(Tag::List)
    }

    /// Marker and key of a map or struct entry; the value comes next
    pub fn write_map_pair_key(&mut self, key: &Identifier) -> Result<()> {
        self.write_tag(Tag::MapPair)?;
        self.write_identifier(key)
    }

    fn write_optional_value(&mut self, value: Option<&Value>) -> Result<()> {
        match value {
            Some(v) => self.write_value(v),
            None => self.write_nil(),
        }
    }

    /// Any pointer-free value
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_nil(),
            Value::Boolean(b) => {
                self.write_tag(Tag::Boolean)?;
                self.write_flag(*b)
            }
            Value::String(s) => {
                self.write_tag(Tag::String)?;
                self.write_len_prefixed("string", s.as_bytes())
            }
            Value::Int32(n) => {
                self.write_tag(Tag::Int32)?;
                self.inner.write_i32::<LittleEndian>(*n)?;
                Ok(())
            }
            Value::Int64(n) => {
                self.write_tag(Tag::Int64)?;
                self.inner.write_i64::<LittleEndian>(*n)?;
                Ok(())
            }
            Value::Uint32(n) => {
                self.write_tag(Tag::Uint32)?;
                self.inner.write_u32::<LittleEndian>(*n)?;
                Ok(())
            }
            Value::Uint64(n) => {
                self.write_tag(Tag::Uint64)?;
                self.inner.write_u64::<LittleEndian>(*n)?;
                Ok(())
            }
            Value::Float32(x) => {
                self.write_tag(Tag::Float32)?;
                self.inner.write_f32::<LittleEndian>(*x)?;
                Ok(())
            }
            Value::Float64(x) => {
                self.write_tag(Tag::Float64)?;
                self.inner.write_f64::<LittleEndian>(*x)?;
                Ok(())
            }
            Value::Timestamp(ts) => {
                self.write_tag(Tag::Timestamp)?;
                self.write_len_prefixed("timestamp", ts.to_rfc3339().as_bytes())
            }
            Value::Buffer(bytes) => {
                self.write_tag(Tag::Buffer)?;
                self.write_len_prefixed("buffer", bytes)
            }
            Value::Enum(e) => {
                self.write_tag(Tag::Enum)?;
                self.write_type_name(&e.type_name)?;
                self.write_identifier(&e.value)
            }
            Value::SymbolMap(map) => {
                self.begin_map()?;
                for (key, value) in map {
                    self.write_map_pair_key(key)?;
                    self.write_value(value)?;
                }
                self.write_end()
            }
            Value::Struct(s) => {
                self.begin_struct(&s.type_name)?;
                for (key, value) in &s.fields {
                    self.write_map_pair_key(key)?;
                    self.write_value(value)?;
                }
                self.write_end()
            }
            Value::List(items) => {
                self.begin_list()?;
                for item in items {
                    self.write_value(item)?;
                }
                self.write_end()
            }
            Value::Pointer(id) => Err(CodecError::Unencodable(format!("pointer {}", id))),
        }
    }
}
