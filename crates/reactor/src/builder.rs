//! Materializing values from events
//!
//! [`ValueBuilder`] is a terminal sink. Each container start pushes an
//! accumulator and each `End` pops one, handing the finished value to the
//! accumulator below or, at the bottom, keeping it as the result.
//!
//! An allocation pushes a pointer accumulator: the next finished value is
//! stored in the [`Heap`] under the pointer id and its place in the parent is
//! taken by [`Value::Pointer`]. The slot is reserved when the allocation is
//! seen, so references from inside the value (cycles) resolve.

use crate::error::{ReactorError, Result};
use crate::event::{Event, EventKind};
use crate::pipeline::EventSink;
use tessera_core::{Heap, Identifier, PointerId, Struct, SymbolMap, TypeName, Value};

enum Accumulator {
    List(Vec<Value>),
    Map {
        fields: SymbolMap,
        pending: Option<Identifier>,
    },
    Struct {
        type_name: TypeName,
        fields: SymbolMap,
        pending: Option<Identifier>,
    },
    Pointer(PointerId),
}

/// Builds a [`Value`] from an event stream
#[derive(Default)]
pub struct ValueBuilder {
    stack: Vec<Accumulator>,
    heap: Heap,
    result: Option<Value>,
}

impl ValueBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a complete value has been built
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty() && self.result.is_some()
    }

    /// The built value, if complete
    pub fn value(&self) -> Option<&Value> {
        if self.stack.is_empty() {
            self.result.as_ref()
        } else {
            None
        }
    }

    /// Pointees allocated so far
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The built value
    ///
    /// Pointers in the value refer to slots of a heap this discards; use
    /// [`ValueBuilder::into_parts`] for streams with allocations.
    pub fn into_value(self) -> Result<Value> {
        self.into_parts().map(|(value, _)| value)
    }

    /// The built value and the heap its pointers refer to
    pub fn into_parts(self) -> Result<(Value, Heap)> {
        match self.result {
            Some(value) if self.stack.is_empty() => Ok((value, self.heap)),
            _ => Err(ReactorError::structural(
                Default::default(),
                "Value is not complete",
            )),
        }
    }

    fn start(&mut self, id: PointerId, acc: Accumulator, event: &Event) -> Result<()> {
        if !id.is_null() {
            self.allocate(id, event)?;
        }
        self.stack.push(acc);
        Ok(())
    }

    fn allocate(&mut self, id: PointerId, event: &Event) -> Result<()> {
        if !self.heap.reserve(id) {
            return Err(ReactorError::reference(
                event.path_or_root(),
                format!("attempt to redefine reference: {}", id),
            ));
        }
        self.stack.push(Accumulator::Pointer(id));
        Ok(())
    }

    fn set_field(&mut self, field: Identifier, event: &Event) -> Result<()> {
        match self.stack.last_mut() {
            Some(Accumulator::Map { pending, .. }) | Some(Accumulator::Struct { pending, .. })
                if pending.is_none() =>
            {
                *pending = Some(field);
                Ok(())
            }
            _ => Err(ReactorError::structural(
                event.path_or_root(),
                format!("Unexpected {}", event.describe()),
            )),
        }
    }

    fn finish(&mut self, event: &Event) -> Result<()> {
        let value = match self.stack.pop() {
            Some(Accumulator::List(items)) => Value::List(items),
            Some(Accumulator::Map { fields, .. }) => Value::SymbolMap(fields),
            Some(Accumulator::Struct {
                type_name, fields, ..
            }) => Value::Struct(Struct::new(type_name, fields)),
            _ => {
                return Err(ReactorError::structural(
                    event.path_or_root(),
                    "Unexpected end",
                ))
            }
        };
        self.produce(value, event)
    }

    /// Hand a finished value to whatever is waiting for it
    fn produce(&mut self, value: Value, event: &Event) -> Result<()> {
        let mut value = value;
        loop {
            match self.stack.last_mut() {
                None => {
                    if self.result.is_some() {
                        return Err(ReactorError::structural(
                            event.path_or_root(),
                            format!("Saw {} after value was built", event.describe()),
                        ));
                    }
                    self.result = Some(value);
                    return Ok(());
                }
                Some(Accumulator::List(items)) => {
                    items.push(value);
                    return Ok(());
                }
                Some(Accumulator::Map { fields, pending })
                | Some(Accumulator::Struct {
                    fields, pending, ..
                }) => {
                    let Some(field) = pending.take() else {
                        return Err(ReactorError::structural(
                            event.path_or_root(),
                            "Value without field name",
                        ));
                    };
                    fields.try_insert(field, value)?;
                    return Ok(());
                }
                Some(Accumulator::Pointer(id)) => {
                    let id = *id;
                    self.stack.pop();
                    self.heap.insert(id, value);
                    value = Value::Pointer(id);
                }
            }
        }
    }
}

impl EventSink for ValueBuilder {
    fn process(&mut self, event: Event) -> Result<()> {
        match &event.kind {
            EventKind::Value(value) => self.produce(value.clone(), &event),
            EventKind::ValueReference(id) => {
                if !self.heap.contains(*id) {
                    return Err(ReactorError::reference(
                        event.path_or_root(),
                        format!("unrecognized reference: {}", id),
                    ));
                }
                self.produce(Value::Pointer(*id), &event)
            }
            EventKind::ValueAllocation { id, .. } => self.allocate(*id, &event),
            EventKind::ListStart { id, .. } => {
                self.start(*id, Accumulator::List(Vec::new()), &event)
            }
            EventKind::MapStart(id) => self.start(
                *id,
                Accumulator::Map {
                    fields: SymbolMap::new(),
                    pending: None,
                },
                &event,
            ),
            EventKind::StructStart(type_name) => {
                let acc = Accumulator::Struct {
                    type_name: type_name.clone(),
                    fields: SymbolMap::new(),
                    pending: None,
                };
                self.start(PointerId::NULL, acc, &event)
            }
            EventKind::FieldStart(field) => self.set_field(field.clone(), &event),
            EventKind::End => self.finish(&event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::primitives::{QNAME_STRING, TYPE_VALUE};
    use tessera_core::ListType;

    fn id(s: &str) -> Identifier {
        Identifier::parse(s).unwrap()
    }

    fn build(events: Vec<Event>) -> Result<(Value, Heap)> {
        let mut builder = ValueBuilder::new();
        for ev in events {
            builder.process(ev)?;
        }
        builder.into_parts()
    }

    fn list() -> Event {
        Event::list_start(ListType::new(TYPE_VALUE.clone(), true))
    }

    #[test]
    fn test_builds_nested_map() {
        let (value, heap) = build(vec![
            Event::map_start(),
            Event::field_start(id("f2")),
            list(),
            Event::value(1i32),
            Event::value("x"),
            Event::end(),
            Event::field_start(id("f1")),
            Event::value(true),
            Event::end(),
        ])
        .unwrap();
        assert!(heap.is_empty());
        let map = value.as_symbol_map().unwrap();
        let keys: Vec<String> = map.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["f1", "f2"]);
        assert_eq!(
            map.get(&id("f2")),
            Some(&Value::List(vec![Value::Int32(1), Value::from("x")]))
        );
    }

    #[test]
    fn test_builds_struct() {
        let (value, _) = build(vec![
            Event::struct_start(QNAME_STRING.clone()),
            Event::field_start(id("f1")),
            Event::value(3i64),
            Event::end(),
        ])
        .unwrap();
        let s = value.as_struct().unwrap();
        assert_eq!(s.type_name, TypeName::from(QNAME_STRING.clone()));
        assert_eq!(s.fields.get(&id("f1")), Some(&Value::Int64(3)));
    }

    #[test]
    fn test_allocation_stores_pointee() {
        let p = PointerId::new(5);
        let (value, heap) = build(vec![
            list(),
            Event::allocation(TYPE_VALUE.clone(), p),
            Event::value("shared"),
            Event::reference(p),
            Event::end(),
        ])
        .unwrap();
        assert_eq!(value, Value::List(vec![Value::Pointer(p), Value::Pointer(p)]));
        assert_eq!(heap.get(p), Some(&Value::from("shared")));
    }

    #[test]
    fn test_cyclic_list() {
        let p = PointerId::new(1);
        let (value, heap) = build(vec![
            Event::list_start_with_id(ListType::new(TYPE_VALUE.clone(), true), p),
            Event::reference(p),
            Event::end(),
        ])
        .unwrap();
        assert_eq!(value, Value::Pointer(p));
        assert_eq!(heap.get(p), Some(&Value::List(vec![Value::Pointer(p)])));
    }

    #[test]
    fn test_unknown_reference() {
        let err = build(vec![Event::reference(PointerId::new(2))]).unwrap_err();
        assert_eq!(err.message(), "unrecognized reference: 2");
    }

    #[test]
    fn test_incomplete_value() {
        let err = build(vec![list(), Event::value(1i32)]).unwrap_err();
        assert_eq!(err.message(), "Value is not complete");
    }
}
