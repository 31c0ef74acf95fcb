//! Cast customization points

use crate::error::{ReactorError, Result};
use std::collections::HashMap;
use tessera_core::primitives::TYPE_NULLABLE_VALUE;
use tessera_core::{AtomicType, Identifier, ObjectPath, TypeName, TypeReference, Value};

/// Decides the expected type of each field of a struct or map
pub trait FieldTyper {
    /// Type for `field`; `parent` is the path of the enclosing struct
    fn field_type_for(&self, field: &Identifier, parent: &ObjectPath) -> Result<TypeReference>;
}

/// Hooks a [`CastReactor`](super::CastReactor) consults
///
/// Every method has a permissive default. Implementations are shared
/// between reactors and must not change once casting starts.
pub trait CastInterface {
    /// Field typer for a struct of type `type_name`
    ///
    /// `None` means every field is typed as nullable `Value`.
    fn field_typer_for(
        &self,
        _type_name: &TypeName,
        _path: &ObjectPath,
    ) -> Result<Option<Box<dyn FieldTyper>>> {
        Ok(None)
    }

    /// Whether a map arriving where `type_name` is expected becomes a struct
    fn infer_struct_for(&self, _type_name: &TypeName) -> bool {
        false
    }

    /// Override the built-in cast of `value` to `target`
    ///
    /// `None` falls through to the built-in rules. Restrictions on `target`
    /// are checked after either path.
    fn cast_atomic(
        &self,
        _value: &Value,
        _target: &AtomicType,
        _path: &ObjectPath,
    ) -> Option<Result<Value>> {
        None
    }

    /// Whether a value of named type `actual` may stand where `expected` is
    /// declared, beyond exact name equality
    fn allow_assignment(&self, _expected: &TypeName, _actual: &TypeName) -> bool {
        false
    }
}

/// Built-in rules only
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCastInterface;

impl CastInterface for DefaultCastInterface {}

/// Types every field as nullable `Value`
#[derive(Debug, Default, Clone, Copy)]
pub struct ValueFieldTyper;

impl FieldTyper for ValueFieldTyper {
    fn field_type_for(&self, _field: &Identifier, _parent: &ObjectPath) -> Result<TypeReference> {
        Ok(TYPE_NULLABLE_VALUE.clone())
    }
}

/// Fixed field declarations; undeclared fields are rejected
#[derive(Debug, Default, Clone)]
pub struct FieldTypeMap {
    fields: HashMap<Identifier, TypeReference>,
}

impl FieldTypeMap {
    /// No declared fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field (builder pattern)
    pub fn with_field(mut self, field: Identifier, type_ref: TypeReference) -> Self {
        self.fields.insert(field, type_ref);
        self
    }

    /// Declare a field
    pub fn insert(&mut self, field: Identifier, type_ref: TypeReference) {
        self.fields.insert(field, type_ref);
    }
}

impl FieldTyper for FieldTypeMap {
    fn field_type_for(&self, field: &Identifier, parent: &ObjectPath) -> Result<TypeReference> {
        self.fields
            .get(field)
            .cloned()
            .ok_or_else(|| ReactorError::unrecognized_field(parent.clone(), field.clone()))
    }
}

impl FromIterator<(Identifier, TypeReference)> for FieldTypeMap {
    fn from_iter<I: IntoIterator<Item = (Identifier, TypeReference)>>(fields: I) -> Self {
        FieldTypeMap {
            fields: fields.into_iter().collect(),
        }
    }
}
