//! Value types
//!
//! This module defines:
//! - Value: tagged union of every representable value
//! - SymbolMap: sorted Identifier → Value map backing maps and struct fields
//! - EnumValue / Struct: named composite values
//!
//! ## Value Model
//!
//! - Scalars: `Boolean`, `Int32`, `Int64`, `Uint32`, `Uint64`, `Float32`,
//!   `Float64`, `String`, `Buffer`, `Timestamp`, `Null`
//! - Named: `Enum`, `Struct`
//! - Containers: `SymbolMap`, `List`
//! - Indirection: `Pointer`, an id into a [`Heap`](crate::Heap)
//!
//! Different kinds are never equal: `Int32(1) != Int64(1)`.

use crate::error::{ModelError, Result};
use crate::heap::PointerId;
use crate::identifier::Identifier;
use crate::primitives::{Primitive, TYPE_VALUE, TYPE_VALUE_LIST};
use crate::timestamp::Timestamp;
use crate::types::{TypeName, TypeReference};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::cmp::Ordering;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

// ============================================================================
// SymbolMap
// ============================================================================

/// Map from field identifier to value, always iterated in identifier order
///
/// # Examples
///
/// ```
/// use tessera_core::{Identifier, SymbolMap, Value};
///
/// let b = Identifier::parse("b").unwrap();
/// let a = Identifier::parse("a").unwrap();
/// let map = SymbolMap::from_pairs(vec![(b, Value::Int32(2)), (a, Value::Int32(1))]).unwrap();
/// let keys: Vec<String> = map.keys().map(|k| k.to_string()).collect();
/// assert_eq!(keys, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolMap {
    entries: BTreeMap<Identifier, Value>,
}

impl SymbolMap {
    /// Empty map
    pub fn new() -> Self {
        SymbolMap::default()
    }

    /// Build from pairs, rejecting duplicate keys
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Identifier, Value)>,
    {
        let mut map = SymbolMap::new();
        for (key, value) in pairs {
            map.try_insert(key, value)?;
        }
        Ok(map)
    }

    /// Insert a new key; fails if the key is already present
    pub fn try_insert(&mut self, key: Identifier, value: Value) -> Result<()> {
        match self.entries.entry(key) {
            btree_map::Entry::Occupied(e) => Err(ModelError::DuplicateKey(e.key().clone())),
            btree_map::Entry::Vacant(e) => {
                e.insert(value);
                Ok(())
            }
        }
    }

    /// Look up a field
    pub fn get(&self, key: &Identifier) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Whether the field is present
    pub fn contains_key(&self, key: &Identifier) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in identifier order
    pub fn iter(&self) -> btree_map::Iter<'_, Identifier, Value> {
        self.entries.iter()
    }

    /// Keys in identifier order
    pub fn keys(&self) -> btree_map::Keys<'_, Identifier, Value> {
        self.entries.keys()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for SymbolMap {
    type Item = (Identifier, Value);
    type IntoIter = btree_map::IntoIter<Identifier, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a SymbolMap {
    type Item = (&'a Identifier, &'a Value);
    type IntoIter = btree_map::Iter<'a, Identifier, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for SymbolMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}", k, v)?;
        }
        f.write_str("}")
    }
}

// ============================================================================
// Named values
// ============================================================================

/// Enumerated value: enum type plus the chosen value identifier
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    /// Enum type
    pub type_name: TypeName,
    /// Selected value
    pub value: Identifier,
}

impl EnumValue {
    /// Create an enum value
    pub fn new(type_name: impl Into<TypeName>, value: Identifier) -> Self {
        EnumValue {
            type_name: type_name.into(),
            value,
        }
    }
}

/// Typed struct: struct type plus its fields
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    /// Struct type
    pub type_name: TypeName,
    /// Field values
    pub fields: SymbolMap,
}

impl Struct {
    /// Create a struct
    pub fn new(type_name: impl Into<TypeName>, fields: SymbolMap) -> Self {
        Struct {
            type_name: type_name.into(),
            fields,
        }
    }
}

// ============================================================================
// Value
// ============================================================================

/// Every representable value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean
    Boolean(bool),
    /// Signed 32-bit integer
    Int32(i32),
    /// Signed 64-bit integer
    Int64(i64),
    /// Unsigned 32-bit integer
    Uint32(u32),
    /// Unsigned 64-bit integer
    Uint64(u64),
    /// IEEE-754 single precision
    Float32(f32),
    /// IEEE-754 double precision
    Float64(f64),
    /// UTF-8 string
    String(String),
    /// Raw bytes
    Buffer(Vec<u8>),
    /// Point in time
    Timestamp(Timestamp),
    /// Absent value
    Null,
    /// Enumerated value
    Enum(EnumValue),
    /// Untyped map
    SymbolMap(SymbolMap),
    /// Ordered list
    List(Vec<Value>),
    /// Typed struct
    Struct(Struct),
    /// Reference to a heap slot
    Pointer(PointerId),
}

impl Value {
    /// The primitive kind of this value; `None` for enums, structs, lists
    /// and pointers
    pub fn primitive(&self) -> Option<Primitive> {
        let prim = match self {
            Value::Boolean(_) => Primitive::Boolean,
            Value::Int32(_) => Primitive::Int32,
            Value::Int64(_) => Primitive::Int64,
            Value::Uint32(_) => Primitive::Uint32,
            Value::Uint64(_) => Primitive::Uint64,
            Value::Float32(_) => Primitive::Float32,
            Value::Float64(_) => Primitive::Float64,
            Value::String(_) => Primitive::String,
            Value::Buffer(_) => Primitive::Buffer,
            Value::Timestamp(_) => Primitive::Timestamp,
            Value::Null => Primitive::Null,
            Value::SymbolMap(_) => Primitive::SymbolMap,
            Value::Enum(_) | Value::List(_) | Value::Struct(_) | Value::Pointer(_) => {
                return None
            }
        };
        Some(prim)
    }

    /// The type reference describing this value
    ///
    /// Lists are `Value*` and pointers `Value`, since neither carries a
    /// declared type of its own.
    pub fn type_reference(&self) -> TypeReference {
        match self {
            Value::Enum(e) => TypeReference::atomic(e.type_name.clone()),
            Value::Struct(s) => TypeReference::atomic(s.type_name.clone()),
            Value::List(_) => TYPE_VALUE_LIST.clone(),
            Value::Pointer(_) => TYPE_VALUE.clone(),
            other => match other.primitive() {
                Some(p) => p.type_reference().clone(),
                None => TYPE_VALUE.clone(),
            },
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value is a scalar (not a container, struct or pointer)
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Value::SymbolMap(_) | Value::List(_) | Value::Struct(_) | Value::Pointer(_)
        )
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &SymbolMap if this is a SymbolMap value
    pub fn as_symbol_map(&self) -> Option<&SymbolMap> {
        match self {
            Value::SymbolMap(m) => Some(m),
            _ => None,
        }
    }

    /// Get as &Struct if this is a Struct value
    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is a List value
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Whether this value can bound a range restriction
    pub fn is_range_comparable(&self) -> bool {
        self.primitive().is_some_and(|p| {
            p.is_numeric() || matches!(p, Primitive::String | Primitive::Timestamp)
        })
    }

    /// Order two values of the same ordered kind; `None` across kinds
    pub fn compare_same_kind(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int32(a), Value::Int32(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Uint32(a), Value::Uint32(b)) => Some(a.cmp(b)),
            (Value::Uint64(a), Value::Uint64(b)) => Some(a.cmp(b)),
            (Value::Float32(a), Value::Float32(b)) => a.partial_cmp(b),
            (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

// Quoted external form, used in error messages and restriction text
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int32(i) => write!(f, "{}", i),
            Value::Int64(i) => write!(f, "{}", i),
            Value::Uint32(i) => write!(f, "{}", i),
            Value::Uint64(i) => write!(f, "{}", i),
            Value::Float32(x) => write!(f, "{}", x),
            Value::Float64(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Buffer(b) => write!(f, "buf[{}]", BASE64.encode(b)),
            Value::Timestamp(t) => write!(f, "\"{}\"", t),
            Value::Null => f.write_str("null"),
            Value::Enum(e) => write!(f, "{}.{}", e.type_name, e.value),
            Value::SymbolMap(m) => write!(f, "{}", m),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
            Value::Struct(s) => write!(f, "{}{}", s.type_name, s.fields),
            Value::Pointer(id) => write!(f, "&{}", id),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Uint32(i)
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        Value::Uint64(i)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float32(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float64(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Buffer(b)
    }
}

impl From<Timestamp> for Value {
    fn from(t: Timestamp) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<SymbolMap> for Value {
    fn from(m: SymbolMap) -> Self {
        Value::SymbolMap(m)
    }
}

impl From<EnumValue> for Value {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

impl From<Struct> for Value {
    fn from(s: Struct) -> Self {
        Value::Struct(s)
    }
}

impl From<PointerId> for Value {
    fn from(id: PointerId) -> Self {
        Value::Pointer(id)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeclaredTypeName, TypeName};

    fn id(s: &str) -> Identifier {
        Identifier::parse(s).unwrap()
    }

    #[test]
    fn test_symbol_map_iterates_sorted() {
        let mut map = SymbolMap::new();
        map.try_insert(id("b"), Value::Int32(2)).unwrap();
        map.try_insert(id("a"), Value::Int32(1)).unwrap();
        let keys: Vec<String> = map.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_symbol_map_rejects_duplicates() {
        let res = SymbolMap::from_pairs(vec![
            (id("f1"), Value::Int32(1)),
            (id("f1"), Value::Int32(2)),
        ]);
        assert_eq!(res, Err(ModelError::DuplicateKey(id("f1"))));
    }

    #[test]
    fn test_kinds_never_equal() {
        assert_ne!(Value::Int32(1), Value::Int64(1));
        assert_ne!(Value::Buffer(b"a".to_vec()), Value::from("a"));
    }

    #[test]
    fn test_type_reference_of_values() {
        assert_eq!(Value::Int32(1).type_reference().to_string(), "tessera:core@v1/Int32");
        assert_eq!(Value::List(vec![]).type_reference().to_string(), "tessera:core@v1/Value*");
        let s = Struct::new(DeclaredTypeName::new("S1").unwrap(), SymbolMap::new());
        assert_eq!(Value::from(s).type_reference().to_string(), "S1");
    }

    #[test]
    fn test_display_quotes_strings() {
        assert_eq!(Value::from("ac").to_string(), "\"ac\"");
        assert_eq!(Value::Int64(-3).to_string(), "-3");
        assert_eq!(Value::Buffer(vec![0, 1, 2]).to_string(), "buf[AAEC]");
        let e = EnumValue::new(TypeName::Declared(DeclaredTypeName::new("E1").unwrap()), id("red"));
        assert_eq!(Value::from(e).to_string(), "E1.red");
        let map = SymbolMap::from_pairs(vec![(id("f1"), Value::List(vec![Value::Null]))]).unwrap();
        assert_eq!(Value::from(map).to_string(), "{f1:[null]}");
    }

    #[test]
    fn test_compare_same_kind() {
        assert_eq!(
            Value::Uint32(1).compare_same_kind(&Value::Uint32(2)),
            Some(Ordering::Less)
        );
        assert_eq!(Value::Uint32(1).compare_same_kind(&Value::Int32(2)), None);
        assert_eq!(Value::Float64(f64::NAN).compare_same_kind(&Value::Float64(1.0)), None);
    }
}
