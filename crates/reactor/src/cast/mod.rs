//! Type-directed casting
//!
//! [`CastReactor`] keeps a stack of expected types, one per open scope, and
//! rewrites each event so it conforms to the type expected at its position:
//! scalars are coerced, bare maps may be promoted to structs, and list
//! starts take the expected list type. Policy that depends on declared
//! schemas comes from a [`CastInterface`].
//!
//! # Scopes
//!
//! | Frame | Pushed by | Consumed by |
//! |-------|-----------|-------------|
//! | `Expect(t)` | construction, `FieldStart` | the next value |
//! | `Fields(typer)` | `MapStart`, `StructStart` | `End` |
//! | `List { .. }` | `ListStart` | `End`; each element reads its type |

mod atomic;
mod interface;

pub use interface::{
    CastInterface, DefaultCastInterface, FieldTypeMap, FieldTyper, ValueFieldTyper,
};

use crate::error::{ReactorError, Result};
use crate::event::{Event, EventKind};
use crate::pipeline::{EventProcessor, EventSink, StageKind};
use std::collections::HashMap;
use std::sync::Arc;
use tessera_core::primitives::{Primitive, TYPE_SYMBOL_MAP};
use tessera_core::{AtomicType, ObjectPath, PointerId, TypeName, TypeReference, Value};
use tracing::debug;

enum Frame {
    Expect(TypeReference),
    Fields(Box<dyn FieldTyper>),
    List {
        element: TypeReference,
        allows_empty: bool,
        seen: bool,
    },
}

/// Casts an event stream to an expected type
pub struct CastReactor {
    iface: Arc<dyn CastInterface>,
    stack: Vec<Frame>,
    /// Type each pointer id was cast to when allocated
    allocations: HashMap<PointerId, TypeReference>,
}

impl CastReactor {
    /// Cast to `expected` with the given interface
    pub fn new(expected: TypeReference, iface: Arc<dyn CastInterface>) -> Self {
        CastReactor {
            iface,
            stack: vec![Frame::Expect(expected)],
            allocations: HashMap::new(),
        }
    }

    /// Cast to `expected` with only the built-in rules
    pub fn with_defaults(expected: TypeReference) -> Self {
        CastReactor::new(expected, Arc::new(DefaultCastInterface))
    }

    /// Type the next value must have, consuming it unless inside a list
    fn next_expected(&mut self, event: &Event) -> Result<TypeReference> {
        if let Some(Frame::List { element, seen, .. }) = self.stack.last_mut() {
            *seen = true;
            return Ok(element.clone());
        }
        if let Some(Frame::Expect(_)) = self.stack.last() {
            if let Some(Frame::Expect(t)) = self.stack.pop() {
                return Ok(t);
            }
        }
        let message = match self.stack.last() {
            Some(Frame::Fields(_)) => {
                format!("Expected field start but got {}", event.describe())
            }
            _ => format!("Saw {} after value was cast", event.describe()),
        };
        Err(ReactorError::structural(event.path_or_root(), message))
    }

    /// Type the next value must have, without consuming it
    fn peek_expected(&self) -> Option<&TypeReference> {
        match self.stack.last() {
            Some(Frame::Expect(t)) => Some(t),
            Some(Frame::List { element, .. }) => Some(element),
            _ => None,
        }
    }

    fn record_allocation(&mut self, id: PointerId, cast_to: &TypeReference) {
        if !id.is_null() {
            self.allocations.insert(id, cast_to.non_nullable().clone());
        }
    }

    fn cast_value(
        &self,
        value: Value,
        expected: &TypeReference,
        path: &ObjectPath,
    ) -> Result<Value> {
        if value.is_null() {
            let nullable = expected.is_nullable()
                || matches!(expected.primitive(), Some(Primitive::Value | Primitive::Null));
            return if nullable {
                Ok(Value::Null)
            } else {
                Err(ReactorError::value_cast(path.clone(), "Value is null"))
            };
        }
        match expected {
            TypeReference::Nullable(inner) => self.cast_value(value, inner, path),
            TypeReference::List(_) => Err(ReactorError::type_cast(
                path.clone(),
                expected.clone(),
                value.type_reference(),
            )),
            TypeReference::Atomic(at) => self.cast_atomic(value, at, path),
        }
    }

    fn cast_atomic(&self, value: Value, target: &AtomicType, path: &ObjectPath) -> Result<Value> {
        let cast = match self.iface.cast_atomic(&value, target, path) {
            Some(result) => result?,
            None => atomic::cast_builtin(value, target, path, self.iface.as_ref())?,
        };
        if let Some(restriction) = target.restriction() {
            if !restriction.accepts(&cast) {
                return Err(ReactorError::value_cast(
                    path.clone(),
                    format!("Value {} does not satisfy restriction {}", cast, restriction),
                ));
            }
        }
        Ok(cast)
    }

    fn on_map_start(&mut self, event: Event, next: &mut dyn EventSink) -> Result<()> {
        let id = match &event.kind {
            EventKind::MapStart(id) => *id,
            _ => PointerId::NULL,
        };
        let path = event.path_or_root();
        let expected = self.next_expected(&event)?;
        self.record_allocation(id, &expected);
        if let TypeReference::Atomic(at) = expected.non_nullable() {
            match at.primitive() {
                Some(Primitive::Value | Primitive::SymbolMap) => {
                    self.stack.push(Frame::Fields(Box::new(ValueFieldTyper)));
                    return next.process(event);
                }
                None if self.iface.infer_struct_for(at.name()) => {
                    debug!(
                        target: "tessera::cast",
                        type_name = %at.name(),
                        path = %path,
                        "Inferred struct from map"
                    );
                    let type_name = at.name().clone();
                    self.push_fields(&type_name, &path)?;
                    if !id.is_null() {
                        next.process(Event {
                            kind: EventKind::ValueAllocation {
                                type_ref: TypeReference::atomic(type_name.clone()),
                                id,
                            },
                            path: event.path.clone(),
                        })?;
                    }
                    return next.process(Event {
                        kind: EventKind::StructStart(type_name),
                        path: event.path,
                    });
                }
                _ => {}
            }
        }
        Err(ReactorError::type_cast(path, expected, TYPE_SYMBOL_MAP.clone()))
    }

    fn on_struct_start(&mut self, type_name: &TypeName, event: &Event) -> Result<()> {
        let path = event.path_or_root();
        let expected = self.next_expected(event)?;
        let accepted = match expected.non_nullable() {
            TypeReference::Atomic(at) => match at.primitive() {
                Some(Primitive::Value) => true,
                Some(_) => false,
                None => {
                    at.name() == type_name || self.iface.allow_assignment(at.name(), type_name)
                }
            },
            _ => false,
        };
        if !accepted {
            return Err(ReactorError::type_cast(
                path,
                expected,
                TypeReference::atomic(type_name.clone()),
            ));
        }
        self.push_fields(type_name, &path)
    }

    fn push_fields(&mut self, type_name: &TypeName, path: &ObjectPath) -> Result<()> {
        let typer = self
            .iface
            .field_typer_for(type_name, path)?
            .unwrap_or_else(|| Box::new(ValueFieldTyper));
        self.stack.push(Frame::Fields(typer));
        Ok(())
    }

    fn on_list_start(&mut self, event: &mut Event) -> Result<()> {
        let path = event.path_or_root();
        let expected = self.next_expected(event)?;
        let EventKind::ListStart { list_type, id } = &mut event.kind else {
            return Ok(());
        };
        self.record_allocation(*id, &expected);
        match expected.non_nullable() {
            TypeReference::List(lt) => {
                self.stack.push(Frame::List {
                    element: lt.element().clone(),
                    allows_empty: lt.allows_empty(),
                    seen: false,
                });
                *list_type = lt.clone();
                Ok(())
            }
            TypeReference::Atomic(at) if at.primitive() == Some(Primitive::Value) => {
                self.stack.push(Frame::List {
                    element: list_type.element().clone(),
                    allows_empty: true,
                    seen: false,
                });
                Ok(())
            }
            _ => Err(ReactorError::type_cast(
                path,
                expected.clone(),
                TypeReference::List(list_type.clone()),
            )),
        }
    }

    fn on_field_start(&mut self, event: &Event) -> Result<()> {
        let EventKind::FieldStart(field) = &event.kind else {
            return Ok(());
        };
        let parent = event
            .path
            .as_ref()
            .and_then(ObjectPath::parent)
            .unwrap_or_default();
        let field_type = match self.stack.last() {
            Some(Frame::Fields(typer)) => typer.field_type_for(field, &parent)?,
            _ => {
                return Err(ReactorError::structural(
                    event.path_or_root(),
                    format!("Unexpected {}", event.describe()),
                ))
            }
        };
        self.stack.push(Frame::Expect(field_type));
        Ok(())
    }

    fn on_end(&mut self, event: &Event) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Fields(_)) => Ok(()),
            Some(Frame::List {
                allows_empty: false,
                seen: false,
                ..
            }) => Err(ReactorError::value_cast(event.path_or_root(), "List is empty")),
            Some(Frame::List { .. }) => Ok(()),
            _ => Err(ReactorError::structural(
                event.path_or_root(),
                "Unexpected end".to_string(),
            )),
        }
    }

    fn on_reference(&mut self, id: PointerId, event: &Event) -> Result<()> {
        let expected = self.next_expected(event)?;
        if let Some(actual) = self.allocations.get(&id) {
            if !expected.is_assignable_from(actual) {
                return Err(ReactorError::type_cast(
                    event.path_or_root(),
                    expected,
                    actual.clone(),
                ));
            }
        }
        Ok(())
    }
}

impl EventProcessor for CastReactor {
    fn kind(&self) -> StageKind {
        StageKind::Cast
    }

    fn requires(&self) -> &'static [StageKind] {
        &[StageKind::Structural, StageKind::PathSetting]
    }

    fn process(&mut self, mut event: Event, next: &mut dyn EventSink) -> Result<()> {
        match &event.kind {
            EventKind::Value(_) => {
                let expected = self.next_expected(&event)?;
                let path = event.path_or_root();
                if let EventKind::Value(value) = &mut event.kind {
                    let taken = std::mem::replace(value, Value::Null);
                    *value = self.cast_value(taken, &expected, &path)?;
                }
            }
            EventKind::MapStart(_) => return self.on_map_start(event, next),
            EventKind::StructStart(type_name) => {
                let type_name = type_name.clone();
                self.on_struct_start(&type_name, &event)?;
            }
            EventKind::ListStart { .. } => self.on_list_start(&mut event)?,
            EventKind::FieldStart(_) => self.on_field_start(&event)?,
            EventKind::End => self.on_end(&event)?,
            EventKind::ValueAllocation { id, .. } => {
                let id = *id;
                if let Some(expected) = self.peek_expected().cloned() {
                    self.record_allocation(id, &expected);
                }
            }
            EventKind::ValueReference(id) => {
                let id = *id;
                self.on_reference(id, &event)?;
            }
        }
        next.process(event)
    }
}
