//! Canonical field ordering
//!
//! [`FieldOrderReactor`] rewrites the fields of structs whose type declares
//! a [`FieldOrder`] so they leave in declared order. A field arriving ahead
//! of its turn is held back, with its whole nested event sequence, until
//! every field declared before it has passed or the struct ends. Fields the
//! order does not list pass straight through.
//!
//! At the end of an ordered struct every required field must have been
//! seen; all missing ones are reported together.

use crate::error::{ReactorError, Result};
use crate::event::{Event, EventKind};
use crate::pipeline::{EventProcessor, EventSink, StageKind};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tessera_core::{Identifier, TypeName};
use tracing::trace;

/// One entry of a declared field order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOrderSpec {
    /// Field name
    pub field: Identifier,
    /// Whether the field must be present
    pub required: bool,
}

impl FieldOrderSpec {
    /// Required field
    pub fn required(field: Identifier) -> Self {
        FieldOrderSpec {
            field,
            required: true,
        }
    }

    /// Optional field
    pub fn optional(field: Identifier) -> Self {
        FieldOrderSpec {
            field,
            required: false,
        }
    }
}

/// Declared order of a struct's fields
pub type FieldOrder = Vec<FieldOrderSpec>;

/// Supplies field orders by struct type
pub trait FieldOrderGetter {
    /// Order for `type_name`, or `None` to leave its fields as they arrive
    fn field_order_for(&self, type_name: &TypeName) -> Option<FieldOrder>;
}

impl FieldOrderGetter for HashMap<TypeName, FieldOrder> {
    fn field_order_for(&self, type_name: &TypeName) -> Option<FieldOrder> {
        self.get(type_name).cloned()
    }
}

struct CurrentField {
    field: Identifier,
    /// `Some` while the field is held back
    held: Option<Vec<Event>>,
}

struct OrderedStruct {
    order: FieldOrder,
    /// Position in `order` of the next field allowed out
    next_pos: usize,
    seen: HashSet<Identifier>,
    held: HashMap<Identifier, Vec<Event>>,
    current: Option<CurrentField>,
}

impl OrderedStruct {
    fn new(order: FieldOrder) -> Self {
        OrderedStruct {
            order,
            next_pos: 0,
            seen: HashSet::new(),
            held: HashMap::new(),
            current: None,
        }
    }

    /// Whether `field` has to wait for earlier fields
    fn must_hold(&self, field: &Identifier) -> bool {
        self.order
            .iter()
            .position(|spec| &spec.field == field)
            .is_some_and(|pos| pos > self.next_pos)
    }

    fn missing_required(&self) -> Vec<Identifier> {
        self.order
            .iter()
            .filter(|spec| spec.required && !self.seen.contains(&spec.field))
            .map(|spec| spec.field.clone())
            .collect()
    }
}

enum Frame {
    Ordered(OrderedStruct),
    Plain,
}

/// Reorders struct fields to their declared order
pub struct FieldOrderReactor {
    getter: Arc<dyn FieldOrderGetter>,
    stack: Vec<Frame>,
}

impl FieldOrderReactor {
    /// Reactor using `getter` for struct orders
    pub fn new(getter: Arc<dyn FieldOrderGetter>) -> Self {
        FieldOrderReactor {
            getter,
            stack: Vec::new(),
        }
    }

    /// Send an event out of the first `depth` frames
    ///
    /// The innermost of those frames holding back its current field takes
    /// the event; otherwise it goes downstream.
    fn emit(&mut self, depth: usize, event: Event, next: &mut dyn EventSink) -> Result<()> {
        for frame in self.stack[..depth].iter_mut().rev() {
            if let Frame::Ordered(OrderedStruct {
                current:
                    Some(CurrentField {
                        held: Some(events),
                        ..
                    }),
                ..
            }) = frame
            {
                events.push(event);
                return Ok(());
            }
        }
        next.process(event)
    }

    fn start_field(
        &mut self,
        field: &Identifier,
        event: Event,
        next: &mut dyn EventSink,
    ) -> Result<()> {
        let depth = self.stack.len();
        let Some(Frame::Ordered(st)) = self.stack.last_mut() else {
            return self.emit(depth, event, next);
        };
        st.seen.insert(field.clone());
        if st.must_hold(field) {
            trace!(target: "tessera::field_order", field = %field, "Holding field");
            st.current = Some(CurrentField {
                field: field.clone(),
                held: Some(vec![event]),
            });
            return Ok(());
        }
        st.current = Some(CurrentField {
            field: field.clone(),
            held: None,
        });
        self.emit(depth - 1, event, next)
    }

    /// The value of the innermost frame's current field has finished
    fn value_completed(&mut self, next: &mut dyn EventSink) -> Result<()> {
        let Some(idx) = self.stack.len().checked_sub(1) else {
            return Ok(());
        };
        let Frame::Ordered(st) = &mut self.stack[idx] else {
            return Ok(());
        };
        let Some(current) = st.current.take() else {
            return Ok(());
        };
        match current.held {
            Some(events) => {
                st.held.insert(current.field, events);
                Ok(())
            }
            None => {
                if st.order.get(st.next_pos).map(|spec| &spec.field) == Some(&current.field) {
                    st.next_pos += 1;
                }
                self.release_ready(idx, next)
            }
        }
    }

    /// Release held fields whose turn has come
    fn release_ready(&mut self, idx: usize, next: &mut dyn EventSink) -> Result<()> {
        loop {
            let events = {
                let Frame::Ordered(st) = &mut self.stack[idx] else {
                    return Ok(());
                };
                let Some(spec) = st.order.get(st.next_pos) else {
                    return Ok(());
                };
                let Some(events) = st.held.remove(&spec.field) else {
                    return Ok(());
                };
                st.next_pos += 1;
                events
            };
            trace!(target: "tessera::field_order", count = events.len(), "Releasing held field");
            for event in events {
                self.emit(idx, event, next)?;
            }
        }
    }

    /// Close an ordered struct that has just been popped
    fn finish_struct(
        &mut self,
        mut st: OrderedStruct,
        end: &Event,
        next: &mut dyn EventSink,
    ) -> Result<()> {
        let missing = st.missing_required();
        if !missing.is_empty() {
            return Err(ReactorError::missing_fields(end.path_or_root(), missing));
        }
        let depth = self.stack.len();
        let remaining: Vec<Identifier> = st.order[st.next_pos..]
            .iter()
            .map(|spec| spec.field.clone())
            .collect();
        for field in remaining {
            if let Some(events) = st.held.remove(&field) {
                for event in events {
                    self.emit(depth, event, next)?;
                }
            }
        }
        Ok(())
    }
}

impl EventProcessor for FieldOrderReactor {
    fn kind(&self) -> StageKind {
        StageKind::FieldOrder
    }

    fn requires(&self) -> &'static [StageKind] {
        &[StageKind::Structural]
    }

    fn process(&mut self, event: Event, next: &mut dyn EventSink) -> Result<()> {
        let depth = self.stack.len();
        match &event.kind {
            EventKind::StructStart(type_name) => {
                let frame = match self.getter.field_order_for(type_name) {
                    Some(order) => Frame::Ordered(OrderedStruct::new(order)),
                    None => Frame::Plain,
                };
                self.emit(depth, event, next)?;
                self.stack.push(frame);
                Ok(())
            }
            EventKind::MapStart(_) | EventKind::ListStart { .. } => {
                self.emit(depth, event, next)?;
                self.stack.push(Frame::Plain);
                Ok(())
            }
            EventKind::FieldStart(field) => {
                let field = field.clone();
                self.start_field(&field, event, next)
            }
            EventKind::Value(_) | EventKind::ValueReference(_) => {
                self.emit(depth, event, next)?;
                self.value_completed(next)
            }
            EventKind::ValueAllocation { .. } => self.emit(depth, event, next),
            EventKind::End => {
                if let Some(Frame::Ordered(st)) = self.stack.pop() {
                    self.finish_struct(st, &event, next)?;
                }
                self.emit(self.stack.len(), event, next)?;
                self.value_completed(next)
            }
        }
    }
}
