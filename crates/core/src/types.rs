//! Type names and type references
//!
//! This module defines the naming and type algebra:
//! - Namespace: identifier parts plus a version (`ns1:ns2@v1`)
//! - DeclaredTypeName: a local upper camel name (`S1`)
//! - QualifiedTypeName: namespace + declared name (`ns1@v1/S1`)
//! - TypeName: either of the above
//! - TypeReference: atomic (optionally restricted), list, or nullable
//!
//! ## External forms
//!
//! | Reference | Form |
//! |-----------|------|
//! | Atomic | `ns@v1/T` |
//! | Restricted atomic | `ns@v1/T~"^a+$"`, `ns@v1/T~[0,10)` |
//! | List, empty allowed | `T*` |
//! | List, non-empty | `T+` |
//! | Nullable | `T?` |

use crate::error::{ModelError, Result};
use crate::identifier::Identifier;
use crate::primitives::Primitive;
use crate::restriction::Restriction;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Names
// =============================================================================

/// Versioned namespace
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace {
    parts: Vec<Identifier>,
    version: Identifier,
}

impl Namespace {
    /// Create a namespace; at least one part is required
    pub fn new(parts: Vec<Identifier>, version: Identifier) -> Result<Self> {
        if parts.is_empty() {
            return Err(ModelError::InvalidNamespace(format!(
                "namespace with version {} has no parts",
                version
            )));
        }
        Ok(Namespace { parts, version })
    }

    pub(crate) fn from_static(parts: &[&str], version: &str) -> Self {
        Namespace {
            parts: parts.iter().map(|p| Identifier::from_static(&[p])).collect(),
            version: Identifier::from_static(&[version]),
        }
    }

    /// Namespace parts in order
    pub fn parts(&self) -> &[Identifier] {
        &self.parts
    }

    /// Version identifier
    pub fn version(&self) -> &Identifier {
        &self.version
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{}", part)?;
        }
        write!(f, "@{}", self.version)
    }
}

/// Local type name such as `Int32` or `S1`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeclaredTypeName(String);

impl DeclaredTypeName {
    /// Validate and wrap an upper camel name (`[A-Z][A-Za-z0-9]*`)
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut chars = name.chars();
        let head_ok = chars.next().is_some_and(|c| c.is_ascii_uppercase());
        if !head_ok || !chars.all(|c| c.is_ascii_alphanumeric()) {
            return Err(ModelError::InvalidDeclaredName(name));
        }
        Ok(DeclaredTypeName(name))
    }

    pub(crate) fn from_static(name: &str) -> Self {
        DeclaredTypeName(name.to_string())
    }

    /// The name text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeclaredTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DeclaredTypeName {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self> {
        DeclaredTypeName::new(s)
    }
}

impl From<DeclaredTypeName> for String {
    fn from(n: DeclaredTypeName) -> Self {
        n.0
    }
}

/// Namespace-qualified type name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualifiedTypeName {
    namespace: Namespace,
    name: DeclaredTypeName,
}

impl QualifiedTypeName {
    /// Create a qualified name
    pub fn new(namespace: Namespace, name: DeclaredTypeName) -> Self {
        QualifiedTypeName { namespace, name }
    }

    /// The namespace
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The local name
    pub fn name(&self) -> &DeclaredTypeName {
        &self.name
    }
}

impl fmt::Display for QualifiedTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Declared or qualified type name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeName {
    /// Local name
    Declared(DeclaredTypeName),
    /// Namespace-qualified name
    Qualified(QualifiedTypeName),
}

impl TypeName {
    /// The primitive this name denotes, if any
    pub fn primitive(&self) -> Option<Primitive> {
        Primitive::from_type_name(self)
    }

    /// The unqualified part of the name
    pub fn declared_name(&self) -> &DeclaredTypeName {
        match self {
            TypeName::Declared(d) => d,
            TypeName::Qualified(q) => q.name(),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Declared(d) => write!(f, "{}", d),
            TypeName::Qualified(q) => write!(f, "{}", q),
        }
    }
}

impl From<DeclaredTypeName> for TypeName {
    fn from(d: DeclaredTypeName) -> Self {
        TypeName::Declared(d)
    }
}

impl From<QualifiedTypeName> for TypeName {
    fn from(q: QualifiedTypeName) -> Self {
        TypeName::Qualified(q)
    }
}

// =============================================================================
// Type references
// =============================================================================

/// Named, non-list, non-nullable type with an optional restriction
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicType {
    name: TypeName,
    restriction: Option<Restriction>,
}

impl AtomicType {
    /// Unrestricted atomic type
    pub fn new(name: impl Into<TypeName>) -> Self {
        AtomicType {
            name: name.into(),
            restriction: None,
        }
    }

    /// Restricted atomic type
    ///
    /// Fails if the restriction cannot evaluate values of this type: regexes
    /// apply to `String` only, ranges to numeric kinds, `String` and
    /// `Timestamp` with bounds of the same kind.
    pub fn restricted(name: impl Into<TypeName>, restriction: Restriction) -> Result<Self> {
        let name = name.into();
        if !restriction.applies_to(&name) {
            return Err(ModelError::InapplicableRestriction {
                type_name: name.to_string(),
                restriction: restriction.to_string(),
            });
        }
        Ok(AtomicType {
            name,
            restriction: Some(restriction),
        })
    }

    /// The type name
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// The restriction, if any
    pub fn restriction(&self) -> Option<&Restriction> {
        self.restriction.as_ref()
    }

    /// The primitive this type names, if any
    pub fn primitive(&self) -> Option<Primitive> {
        self.name.primitive()
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(r) = &self.restriction {
            write!(f, "~{}", r)?;
        }
        Ok(())
    }
}

/// List of an element type
#[derive(Debug, Clone, PartialEq)]
pub struct ListType {
    element: Box<TypeReference>,
    allows_empty: bool,
}

impl ListType {
    /// Create a list type
    pub fn new(element: TypeReference, allows_empty: bool) -> Self {
        ListType {
            element: Box::new(element),
            allows_empty,
        }
    }

    /// Element type
    pub fn element(&self) -> &TypeReference {
        &self.element
    }

    /// Whether an empty list is legal (`*`) or not (`+`)
    pub fn allows_empty(&self) -> bool {
        self.allows_empty
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quant = if self.allows_empty { '*' } else { '+' };
        write!(f, "{}{}", self.element, quant)
    }
}

/// Type reference algebra
#[derive(Debug, Clone, PartialEq)]
pub enum TypeReference {
    /// Named type, optionally restricted
    Atomic(AtomicType),
    /// List of another type
    List(ListType),
    /// Nullable wrapper; never wraps another nullable
    Nullable(Box<TypeReference>),
}

impl TypeReference {
    /// Unrestricted atomic reference
    pub fn atomic(name: impl Into<TypeName>) -> Self {
        TypeReference::Atomic(AtomicType::new(name))
    }

    /// Restricted atomic reference
    pub fn restricted(name: impl Into<TypeName>, restriction: Restriction) -> Result<Self> {
        AtomicType::restricted(name, restriction).map(TypeReference::Atomic)
    }

    /// List reference
    pub fn list(element: TypeReference, allows_empty: bool) -> Self {
        TypeReference::List(ListType::new(element, allows_empty))
    }

    /// Nullable reference; rejects `T??`
    pub fn nullable(inner: TypeReference) -> Result<Self> {
        if let TypeReference::Nullable(_) = inner {
            return Err(ModelError::NestedNullable(inner.to_string()));
        }
        Ok(TypeReference::Nullable(Box::new(inner)))
    }

    /// Atomic payload, if atomic
    pub fn as_atomic(&self) -> Option<&AtomicType> {
        match self {
            TypeReference::Atomic(a) => Some(a),
            _ => None,
        }
    }

    /// List payload, if a list
    pub fn as_list(&self) -> Option<&ListType> {
        match self {
            TypeReference::List(l) => Some(l),
            _ => None,
        }
    }

    /// Whether this is a nullable reference
    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeReference::Nullable(_))
    }

    /// The reference with one nullable layer removed
    pub fn non_nullable(&self) -> &TypeReference {
        match self {
            TypeReference::Nullable(inner) => inner,
            other => other,
        }
    }

    /// The primitive named by an (unwrapped) atomic reference
    pub fn primitive(&self) -> Option<Primitive> {
        self.non_nullable().as_atomic().and_then(AtomicType::primitive)
    }

    /// Whether this is the generic `Value` type (possibly nullable)
    pub fn is_value_type(&self) -> bool {
        self.primitive() == Some(Primitive::Value)
    }

    /// Structural assignability, ignoring restrictions
    ///
    /// `self` is the expected type. `Value` accepts everything, nullable
    /// accepts `Null` and whatever its inner type accepts, atomic types match
    /// by name, and lists match element-wise.
    pub fn is_assignable_from(&self, actual: &TypeReference) -> bool {
        match (self, actual) {
            (TypeReference::Nullable(inner), actual) => {
                actual.primitive() == Some(Primitive::Null)
                    || inner.is_assignable_from(actual.non_nullable())
            }
            (TypeReference::Atomic(exp), _) if exp.primitive() == Some(Primitive::Value) => true,
            (TypeReference::Atomic(exp), TypeReference::Atomic(act)) => exp.name() == act.name(),
            (TypeReference::List(exp), TypeReference::List(act)) => {
                exp.element().is_assignable_from(act.element())
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Atomic(a) => write!(f, "{}", a),
            TypeReference::List(l) => write!(f, "{}", l),
            TypeReference::Nullable(inner) => write!(f, "{}?", inner),
        }
    }
}

impl From<AtomicType> for TypeReference {
    fn from(a: AtomicType) -> Self {
        TypeReference::Atomic(a)
    }
}

impl From<ListType> for TypeReference {
    fn from(l: ListType) -> Self {
        TypeReference::List(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{TYPE_INT32, TYPE_NULL, TYPE_STRING, TYPE_VALUE};
    use crate::restriction::RegexRestriction;

    fn ns(parts: &[&str], version: &str) -> Namespace {
        Namespace::new(
            parts.iter().map(|p| Identifier::parse(p).unwrap()).collect(),
            Identifier::parse(version).unwrap(),
        )
        .unwrap()
    }

    fn qname(s: &str) -> TypeName {
        QualifiedTypeName::new(ns(&["ns1"], "v1"), DeclaredTypeName::new(s).unwrap()).into()
    }

    #[test]
    fn test_namespace_display() {
        assert_eq!(ns(&["ns1", "ns2"], "v1").to_string(), "ns1:ns2@v1");
        assert!(Namespace::new(vec![], Identifier::parse("v1").unwrap()).is_err());
    }

    #[test]
    fn test_declared_name_validation() {
        assert!(DeclaredTypeName::new("S1").is_ok());
        assert!(DeclaredTypeName::new("s1").is_err());
        assert!(DeclaredTypeName::new("S-1").is_err());
        assert!(DeclaredTypeName::new("").is_err());
    }

    #[test]
    fn test_type_reference_display() {
        let s1 = TypeReference::atomic(qname("S1"));
        assert_eq!(s1.to_string(), "ns1@v1/S1");
        let list = TypeReference::list(s1.clone(), false);
        assert_eq!(list.to_string(), "ns1@v1/S1+");
        let nullable = TypeReference::nullable(TypeReference::list(s1, true)).unwrap();
        assert_eq!(nullable.to_string(), "ns1@v1/S1*?");

        let re = Restriction::Regex(RegexRestriction::new("^a+$").unwrap());
        let restricted = TypeReference::restricted(TYPE_STRING.as_atomic().unwrap().name().clone(), re)
            .unwrap();
        assert_eq!(restricted.to_string(), "tessera:core@v1/String~\"^a+$\"");
    }

    #[test]
    fn test_nested_nullable_rejected() {
        let n = TypeReference::nullable(TYPE_INT32.clone()).unwrap();
        assert!(matches!(
            TypeReference::nullable(n),
            Err(ModelError::NestedNullable(_))
        ));
    }

    #[test]
    fn test_regex_on_int_rejected() {
        let re = Restriction::Regex(RegexRestriction::new("a").unwrap());
        let name = TYPE_INT32.as_atomic().unwrap().name().clone();
        assert!(matches!(
            TypeReference::restricted(name, re),
            Err(ModelError::InapplicableRestriction { .. })
        ));
    }

    #[test]
    fn test_assignability() {
        let int_list = TypeReference::list(TYPE_INT32.clone(), true);
        let value_list = TypeReference::list(TYPE_VALUE.clone(), true);
        assert!(value_list.is_assignable_from(&int_list));
        assert!(!int_list.is_assignable_from(&TypeReference::list(TYPE_STRING.clone(), true)));
        assert!(TYPE_VALUE.is_assignable_from(&int_list));
        assert!(!TYPE_INT32.is_assignable_from(&TYPE_STRING));

        let nullable_int = TypeReference::nullable(TYPE_INT32.clone()).unwrap();
        assert!(nullable_int.is_assignable_from(&TYPE_NULL));
        assert!(nullable_int.is_assignable_from(&TYPE_INT32));
        assert!(!TYPE_INT32.is_assignable_from(&TYPE_NULL));
    }
}
