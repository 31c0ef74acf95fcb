//! Shared fixtures for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
pub use tessera::model::primitives::{
    QNAME_STRING, TYPE_INT32, TYPE_INT64, TYPE_STRING, TYPE_VALUE,
};
pub use tessera::model::{
    DeclaredTypeName, Namespace, QualifiedTypeName, RegexRestriction, TypeName,
};
pub use tessera::reactor::{
    CastReactor, Event, EventKind, FieldOrder, FieldOrderReactor, FieldOrderSpec, FieldTypeMap,
    FieldTyper, PipelineConfig,
};
pub use tessera::{
    CastInterface, Heap, Identifier, ObjectPath, PointerId, ReactorError, Struct, SymbolMap,
    Tessera, TesseraConfig, TesseraError, TopType, TypeReference, Value,
};

// ============================================================================
// Builders
// ============================================================================

pub fn id(s: &str) -> Identifier {
    Identifier::parse(s).unwrap()
}

/// Type name in the `acme@v1` namespace
pub fn acme(name: &str) -> TypeName {
    let ns = Namespace::new(vec![id("acme")], id("v1")).unwrap();
    QualifiedTypeName::new(ns, DeclaredTypeName::new(name).unwrap()).into()
}

pub fn map(pairs: Vec<(&str, Value)>) -> Value {
    Value::SymbolMap(SymbolMap::from_pairs(pairs.into_iter().map(|(k, v)| (id(k), v))).unwrap())
}

pub fn person(pairs: Vec<(&str, Value)>) -> Value {
    let fields = SymbolMap::from_pairs(pairs.into_iter().map(|(k, v)| (id(k), v))).unwrap();
    Value::Struct(Struct::new(acme("Person"), fields))
}

pub fn person_type() -> TypeReference {
    TypeReference::atomic(acme("Person"))
}

// ============================================================================
// Schema
// ============================================================================

/// `Person {name: String, age: Int32?, email: String~".+@.+"?}`; maps
/// arriving where a Person is expected become Persons
pub struct PeopleSchema;

impl CastInterface for PeopleSchema {
    fn field_typer_for(
        &self,
        type_name: &TypeName,
        _path: &ObjectPath,
    ) -> tessera::reactor::Result<Option<Box<dyn FieldTyper>>> {
        if *type_name != acme("Person") {
            return Ok(None);
        }
        let email = TypeReference::restricted(
            QNAME_STRING.clone(),
            RegexRestriction::new(".+@.+").unwrap().into(),
        )
        .unwrap();
        let typer = FieldTypeMap::new()
            .with_field(id("name"), TYPE_STRING.clone())
            .with_field(id("age"), TypeReference::nullable(TYPE_INT32.clone()).unwrap())
            .with_field(id("email"), TypeReference::nullable(email).unwrap());
        Ok(Some(Box::new(typer)))
    }

    fn infer_struct_for(&self, type_name: &TypeName) -> bool {
        *type_name == acme("Person")
    }
}

/// Person fields ordered `name` (required), `age`, `email`
pub fn person_order() -> HashMap<TypeName, FieldOrder> {
    let mut orders = HashMap::new();
    orders.insert(
        acme("Person"),
        vec![
            FieldOrderSpec::required(id("name")),
            FieldOrderSpec::optional(id("age")),
            FieldOrderSpec::optional(id("email")),
        ],
    );
    orders
}

pub fn people() -> Tessera {
    Tessera::default().with_cast_interface(Arc::new(PeopleSchema))
}

// ============================================================================
// Event helpers
// ============================================================================

/// Events a value produces through `config`'s standard stages
pub fn events_through(config: PipelineConfig, value: &Value, heap: &Heap) -> Vec<Event> {
    let mut pipeline = config.builder().build(Vec::<Event>::new());
    tessera::reactor::visit_value(value, heap, &mut pipeline).unwrap();
    pipeline.into_sink()
}

/// Push raw events through the default stages
pub fn feed(events: Vec<Event>) -> Result<Vec<Event>, ReactorError> {
    let mut pipeline = PipelineConfig::default()
        .builder()
        .build(Vec::<Event>::new());
    for event in events {
        tessera::EventSink::process(&mut pipeline, event)?;
    }
    Ok(pipeline.into_sink())
}

pub fn field_names(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::FieldStart(f) => Some(f.to_string()),
            _ => None,
        })
        .collect()
}

pub fn value_paths(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::Value(_)))
        .map(|e| e.path_or_root().to_string())
        .collect()
}
