//! Structural validation
//!
//! [`StructuralReactor`] checks that an event stream forms exactly one
//! well-formed value of the expected top-level kind. It forwards valid
//! events unchanged and rejects the first event that breaks the grammar.

use crate::error::{ReactorError, Result};
use crate::event::{Event, EventKind};
use crate::pipeline::{EventProcessor, EventSink, StageKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tessera_core::primitives::Primitive;
use tessera_core::{Identifier, TypeReference};

/// Kind of value a stream must produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopType {
    /// Any value
    #[default]
    Value,
    /// A list
    List,
    /// An untyped map
    Map,
    /// A typed struct
    Struct,
}

impl TopType {
    fn accepts(self, event: &EventKind) -> bool {
        match event {
            EventKind::Value(_) | EventKind::ValueReference(_) => self == TopType::Value,
            EventKind::ListStart { .. } => matches!(self, TopType::Value | TopType::List),
            EventKind::MapStart(_) => matches!(self, TopType::Value | TopType::Map),
            EventKind::StructStart(_) => matches!(self, TopType::Value | TopType::Struct),
            EventKind::ValueAllocation { .. } => true,
            EventKind::FieldStart(_) | EventKind::End => false,
        }
    }
}

impl fmt::Display for TopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopType::Value => f.write_str("value"),
            TopType::List => f.write_str("list"),
            TopType::Map => f.write_str("map"),
            TopType::Struct => f.write_str("struct"),
        }
    }
}

enum Frame {
    /// Inside a list; values must be assignable to the element type
    List(TypeReference),
    /// Inside a map or struct, between fields
    Fields(HashSet<Identifier>),
    /// After a field start, before its value
    Field(Identifier),
}

/// Validates event grammar
#[derive(Default)]
pub struct StructuralReactor {
    top: TopType,
    stack: Vec<Frame>,
    done: bool,
}

impl StructuralReactor {
    /// Validator for a stream producing `top`
    pub fn new(top: TopType) -> Self {
        StructuralReactor {
            top,
            stack: Vec::new(),
            done: false,
        }
    }

    /// Expected top-level kind
    pub fn top_type(&self) -> TopType {
        self.top
    }

    /// Whether a complete value has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    fn check(&mut self, event: &Event) -> Result<()> {
        let fail = |msg: String| Err(ReactorError::structural(event.path_or_root(), msg));

        if self.done {
            return fail(format!("Saw {} after value was built", event.describe()));
        }

        match self.stack.last_mut() {
            None => {
                if !self.top.accepts(&event.kind) {
                    return fail(format!("Expected {} but got {}", self.top, event.describe()));
                }
                self.open(event);
            }
            Some(Frame::Fields(seen)) => match &event.kind {
                EventKind::FieldStart(field) => {
                    if !seen.insert(field.clone()) {
                        return fail(format!("Invalid fields: field '{}' already set", field));
                    }
                    self.stack.push(Frame::Field(field.clone()));
                }
                EventKind::End => {
                    self.stack.pop();
                    self.value_completed();
                }
                _ => {
                    return fail(format!(
                        "Expected field name or end of fields but got {}",
                        event.describe()
                    ))
                }
            },
            Some(Frame::Field(pending)) => match &event.kind {
                EventKind::FieldStart(field) => {
                    return fail(format!(
                        "Saw start of field '{}' while expecting a value for '{}'",
                        field, pending
                    ))
                }
                EventKind::End => {
                    return fail(format!("Saw end while expecting a value for '{}'", pending))
                }
                EventKind::ValueAllocation { .. } => {}
                _ => {
                    self.stack.pop();
                    self.open(event);
                }
            },
            Some(Frame::List(element)) => match &event.kind {
                EventKind::FieldStart(field) => {
                    return fail(format!("Expected list value but got start of field '{}'", field))
                }
                EventKind::End => {
                    self.stack.pop();
                    self.value_completed();
                }
                EventKind::Value(value) => {
                    let actual = value.type_reference();
                    if !element.is_assignable_from(&actual) {
                        return fail(format!(
                            "Expected list value of type {} but got {}",
                            element, actual
                        ));
                    }
                }
                EventKind::ListStart { list_type, .. } => {
                    let actual = TypeReference::List(list_type.clone());
                    if !element.is_assignable_from(&actual) {
                        return fail(format!(
                            "Expected list value of type {} but got {}",
                            element, actual
                        ));
                    }
                    self.open(event);
                }
                EventKind::MapStart(_) | EventKind::StructStart(_) => {
                    if !accepts_fields(element) {
                        return fail(format!(
                            "Expected list value of type {} but got {}",
                            element,
                            event.describe()
                        ));
                    }
                    self.open(event);
                }
                EventKind::ValueAllocation { .. } | EventKind::ValueReference(_) => {}
            },
        }
        Ok(())
    }

    /// Push a frame for a container start; complete a scalar
    fn open(&mut self, event: &Event) {
        match &event.kind {
            EventKind::ListStart { list_type, .. } => {
                self.stack.push(Frame::List(list_type.element().clone()))
            }
            EventKind::MapStart(_) | EventKind::StructStart(_) => {
                self.stack.push(Frame::Fields(HashSet::new()))
            }
            EventKind::Value(_) | EventKind::ValueReference(_) => self.value_completed(),
            EventKind::ValueAllocation { .. } | EventKind::FieldStart(_) | EventKind::End => {}
        }
    }

    fn value_completed(&mut self) {
        if self.stack.is_empty() {
            self.done = true;
        }
    }
}

/// Whether a list element type can hold a map or struct
///
/// Named types are left to the cast reactor, which knows assignment rules.
fn accepts_fields(element: &TypeReference) -> bool {
    match element.non_nullable() {
        TypeReference::Atomic(at) => match at.primitive() {
            Some(Primitive::Value) | Some(Primitive::SymbolMap) => true,
            Some(_) => false,
            None => true,
        },
        _ => false,
    }
}

impl EventProcessor for StructuralReactor {
    fn kind(&self) -> StageKind {
        StageKind::Structural
    }

    fn process(&mut self, event: Event, next: &mut dyn EventSink) -> Result<()> {
        self.check(&event)?;
        next.process(event)
    }
}
