//! Turning values into events
//!
//! [`visit_value`] walks a value depth first and pushes the matching events
//! into a sink. Maps and structs emit their fields in key order. The first
//! visit to a pointer emits an allocation followed by the pointee; later
//! visits, including ones from inside the pointee, emit a reference.

use crate::error::{ReactorError, Result};
use crate::event::Event;
use crate::pipeline::EventSink;
use std::collections::HashSet;
use tessera_core::primitives::TYPE_VALUE;
use tessera_core::{Heap, ListType, ObjectPath, PointerId, SymbolMap, Value};

/// Push the events describing `value` into `sink`
///
/// Pointers are resolved against `heap`.
pub fn visit_value(value: &Value, heap: &Heap, sink: &mut dyn EventSink) -> Result<()> {
    ValueVisitor::new(heap).visit(value, sink)
}

/// Depth-first event producer
pub struct ValueVisitor<'h> {
    heap: &'h Heap,
    allocated: HashSet<PointerId>,
}

impl<'h> ValueVisitor<'h> {
    /// Visitor resolving pointers against `heap`
    pub fn new(heap: &'h Heap) -> Self {
        ValueVisitor {
            heap,
            allocated: HashSet::new(),
        }
    }

    /// Visit one value
    pub fn visit(&mut self, value: &Value, sink: &mut dyn EventSink) -> Result<()> {
        match value {
            Value::SymbolMap(map) => {
                sink.process(Event::map_start())?;
                self.visit_fields(map, sink)?;
                sink.process(Event::end())
            }
            Value::Struct(s) => {
                sink.process(Event::struct_start(s.type_name.clone()))?;
                self.visit_fields(&s.fields, sink)?;
                sink.process(Event::end())
            }
            Value::List(items) => {
                sink.process(Event::list_start(ListType::new(TYPE_VALUE.clone(), true)))?;
                for item in items {
                    self.visit(item, sink)?;
                }
                sink.process(Event::end())
            }
            Value::Pointer(id) => self.visit_pointer(*id, sink),
            scalar => sink.process(Event::value(scalar.clone())),
        }
    }

    fn visit_fields(&mut self, fields: &SymbolMap, sink: &mut dyn EventSink) -> Result<()> {
        for (field, value) in fields {
            sink.process(Event::field_start(field.clone()))?;
            self.visit(value, sink)?;
        }
        Ok(())
    }

    fn visit_pointer(&mut self, id: PointerId, sink: &mut dyn EventSink) -> Result<()> {
        if id.is_null() {
            return Err(ReactorError::reference(
                ObjectPath::root(),
                "attempt to reference null pointer",
            ));
        }
        if self.allocated.contains(&id) {
            return sink.process(Event::reference(id));
        }
        let heap = self.heap;
        let pointee = heap.get(id).ok_or_else(|| {
            ReactorError::reference(ObjectPath::root(), format!("unrecognized reference: {}", id))
        })?;
        self.allocated.insert(id);
        sink.process(Event::allocation(pointee.type_reference(), id))?;
        self.visit(pointee, sink)
    }
}
