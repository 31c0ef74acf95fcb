//! Core types for Tessera
//!
//! This crate defines the value and type model shared by the reactor
//! pipeline and the binary codec:
//! - Identifier: multi-part lowercase names
//! - Namespace, TypeName, TypeReference: naming and type algebra
//! - Restriction: regex and range predicates on atomic types
//! - Value, SymbolMap, EnumValue, Struct: the value model
//! - Heap, PointerId: arena backing shared and cyclic values
//! - ObjectPath: locations of values within a document
//! - Primitive constants in the `tessera:core@v1` namespace

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod heap;
pub mod identifier;
pub mod path;
pub mod primitives;
pub mod restriction;
pub mod timestamp;
pub mod types;
pub mod value;

pub use error::{ModelError, Result};
pub use heap::{Heap, PointerId};
pub use identifier::{Identifier, IdentifierFormat};
pub use path::{ObjectPath, PathSegment};
pub use primitives::Primitive;
pub use restriction::{RangeRestriction, RegexRestriction, Restriction};
pub use timestamp::Timestamp;
pub use types::{
    AtomicType, DeclaredTypeName, ListType, Namespace, QualifiedTypeName, TypeName, TypeReference,
};
pub use value::{EnumValue, Struct, SymbolMap, Value};
