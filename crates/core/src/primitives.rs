//! Primitive type constants
//!
//! Primitive types live in the `tessera:core@v1` namespace. The constants are
//! process-wide and immutable, built lazily in dependency order: the core
//! namespace first, then each qualified name, then each type reference that
//! wraps a name.

use crate::types::{DeclaredTypeName, Namespace, QualifiedTypeName, TypeName, TypeReference};
use once_cell::sync::Lazy;
use std::fmt;

/// Namespace holding every primitive type: `tessera:core@v1`
pub static CORE_NAMESPACE: Lazy<Namespace> =
    Lazy::new(|| Namespace::from_static(&["tessera", "core"], "v1"));

macro_rules! primitive_constants {
    ($( $variant:ident => $qname:ident, $tref:ident, $text:literal; )*) => {
        $(
            #[doc = concat!("Qualified name of `", $text, "`")]
            pub static $qname: Lazy<QualifiedTypeName> = Lazy::new(|| {
                QualifiedTypeName::new(CORE_NAMESPACE.clone(), DeclaredTypeName::from_static($text))
            });

            #[doc = concat!("Unrestricted reference to `", $text, "`")]
            pub static $tref: Lazy<TypeReference> =
                Lazy::new(|| TypeReference::atomic($qname.clone()));
        )*

        /// Built-in value kinds
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Primitive {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl Primitive {
            /// Every primitive, in declaration order
            pub const ALL: &'static [Primitive] = &[$(Primitive::$variant),*];

            /// Local name, e.g. `Int32`
            pub fn declared_name(self) -> &'static str {
                match self {
                    $(Primitive::$variant => $text,)*
                }
            }

            /// Qualified name constant
            pub fn qualified_name(self) -> &'static QualifiedTypeName {
                match self {
                    $(Primitive::$variant => &$qname,)*
                }
            }

            /// Unrestricted type reference constant
            pub fn type_reference(self) -> &'static TypeReference {
                match self {
                    $(Primitive::$variant => &$tref,)*
                }
            }

            fn from_declared(name: &str) -> Option<Primitive> {
                match name {
                    $($text => Some(Primitive::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

primitive_constants! {
    Value => QNAME_VALUE, TYPE_VALUE, "Value";
    Null => QNAME_NULL, TYPE_NULL, "Null";
    Boolean => QNAME_BOOLEAN, TYPE_BOOLEAN, "Boolean";
    Int32 => QNAME_INT32, TYPE_INT32, "Int32";
    Int64 => QNAME_INT64, TYPE_INT64, "Int64";
    Uint32 => QNAME_UINT32, TYPE_UINT32, "Uint32";
    Uint64 => QNAME_UINT64, TYPE_UINT64, "Uint64";
    Float32 => QNAME_FLOAT32, TYPE_FLOAT32, "Float32";
    Float64 => QNAME_FLOAT64, TYPE_FLOAT64, "Float64";
    String => QNAME_STRING, TYPE_STRING, "String";
    Buffer => QNAME_BUFFER, TYPE_BUFFER, "Buffer";
    Timestamp => QNAME_TIMESTAMP, TYPE_TIMESTAMP, "Timestamp";
    SymbolMap => QNAME_SYMBOL_MAP, TYPE_SYMBOL_MAP, "SymbolMap";
}

/// `Value?`
pub static TYPE_NULLABLE_VALUE: Lazy<TypeReference> =
    Lazy::new(|| TypeReference::Nullable(Box::new(TYPE_VALUE.clone())));

/// `Value*`, the type of an untyped list
pub static TYPE_VALUE_LIST: Lazy<TypeReference> =
    Lazy::new(|| TypeReference::list(TYPE_VALUE.clone(), true));

impl Primitive {
    /// Map a type name onto a primitive; only names in the core namespace match
    pub fn from_type_name(name: &TypeName) -> Option<Primitive> {
        match name {
            TypeName::Qualified(q) if q.namespace() == &*CORE_NAMESPACE => {
                Primitive::from_declared(q.name().as_str())
            }
            _ => None,
        }
    }

    /// Integer kinds
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Primitive::Int32 | Primitive::Int64 | Primitive::Uint32 | Primitive::Uint64
        )
    }

    /// Integer and floating point kinds
    pub fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, Primitive::Float32 | Primitive::Float64)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}
