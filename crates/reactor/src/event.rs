//! Reactor events
//!
//! A document is a stream of events. Scalars arrive as `Value`; maps,
//! structs and lists open with a start event and close with `End`; struct
//! and map fields are introduced by `FieldStart`. Pointers appear as
//! `ValueAllocation` (the next value is stored under an id) and
//! `ValueReference` (reuse of an allocated id).
//!
//! ```text
//! {f1:[1,2]}  =>  MapStart FieldStart(f1) ListStart Value(1) Value(2) End End
//! ```

use std::fmt;
use tessera_core::{Identifier, ListType, ObjectPath, PointerId, TypeName, TypeReference, Value};

/// Event payload
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Scalar value
    Value(Value),
    /// Start of a typed struct
    StructStart(TypeName),
    /// Start of an untyped map; a non-null id allocates it
    MapStart(PointerId),
    /// Start of a list of the given type; a non-null id allocates it
    ListStart {
        /// Declared list type
        list_type: ListType,
        /// Pointer id, or null
        id: PointerId,
    },
    /// Next value belongs to this field
    FieldStart(Identifier),
    /// Closes the innermost map, struct or list
    End,
    /// Next value is stored under `id`
    ValueAllocation {
        /// Type of the allocated value
        type_ref: TypeReference,
        /// Pointer id
        id: PointerId,
    },
    /// Reuse of an allocated value
    ValueReference(PointerId),
}

/// An event plus its location, once known
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Payload
    pub kind: EventKind,
    /// Location, set by the path setting processor
    pub path: Option<ObjectPath>,
}

impl Event {
    /// Wrap a payload with no path
    pub fn new(kind: EventKind) -> Self {
        Event { kind, path: None }
    }

    /// Scalar value event
    pub fn value(value: impl Into<Value>) -> Self {
        Event::new(EventKind::Value(value.into()))
    }

    /// Struct start event
    pub fn struct_start(type_name: impl Into<TypeName>) -> Self {
        Event::new(EventKind::StructStart(type_name.into()))
    }

    /// Untyped map start event
    pub fn map_start() -> Self {
        Event::new(EventKind::MapStart(PointerId::NULL))
    }

    /// Map start that also allocates `id`
    pub fn map_start_with_id(id: PointerId) -> Self {
        Event::new(EventKind::MapStart(id))
    }

    /// List start event
    pub fn list_start(list_type: ListType) -> Self {
        Event::list_start_with_id(list_type, PointerId::NULL)
    }

    /// List start that also allocates `id`
    pub fn list_start_with_id(list_type: ListType, id: PointerId) -> Self {
        Event::new(EventKind::ListStart { list_type, id })
    }

    /// Field start event
    pub fn field_start(field: Identifier) -> Self {
        Event::new(EventKind::FieldStart(field))
    }

    /// End event
    pub fn end() -> Self {
        Event::new(EventKind::End)
    }

    /// Pointer allocation event
    pub fn allocation(type_ref: TypeReference, id: PointerId) -> Self {
        Event::new(EventKind::ValueAllocation { type_ref, id })
    }

    /// Pointer reference event
    pub fn reference(id: PointerId) -> Self {
        Event::new(EventKind::ValueReference(id))
    }

    /// Same event with a path
    pub fn with_path(mut self, path: ObjectPath) -> Self {
        self.path = Some(path);
        self
    }

    /// The event path, or the root if none was set
    pub fn path_or_root(&self) -> ObjectPath {
        self.path.clone().unwrap_or_default()
    }

    /// Short description used in structural error messages
    pub fn describe(&self) -> String {
        match &self.kind {
            EventKind::Value(_) => "value".to_string(),
            EventKind::StructStart(t) => format!("start of struct {}", t),
            EventKind::MapStart(_) => "map start".to_string(),
            EventKind::ListStart { .. } => "list start".to_string(),
            EventKind::FieldStart(f) => format!("start of field '{}'", f),
            EventKind::End => "end".to_string(),
            EventKind::ValueAllocation { id, .. } => format!("allocation of &{}", id),
            EventKind::ValueReference(id) => format!("reference to &{}", id),
        }
    }

    /// Whether this event opens a container
    pub fn is_start(&self) -> bool {
        matches!(
            self.kind,
            EventKind::StructStart(_) | EventKind::MapStart(_) | EventKind::ListStart { .. }
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EventKind::Value(v) => write!(f, "Value({})", v)?,
            EventKind::StructStart(t) => write!(f, "StructStart({})", t)?,
            EventKind::MapStart(id) if id.is_null() => f.write_str("MapStart")?,
            EventKind::MapStart(id) => write!(f, "MapStart(&{})", id)?,
            EventKind::ListStart { list_type, id } if id.is_null() => {
                write!(f, "ListStart({})", list_type)?
            }
            EventKind::ListStart { list_type, id } => write!(f, "ListStart({}, &{})", list_type, id)?,
            EventKind::FieldStart(field) => write!(f, "FieldStart({})", field)?,
            EventKind::End => f.write_str("End")?,
            EventKind::ValueAllocation { type_ref, id } => {
                write!(f, "ValueAllocation({}, &{})", type_ref, id)?
            }
            EventKind::ValueReference(id) => write!(f, "ValueReference(&{})", id)?,
        }
        if let Some(path) = &self.path {
            write!(f, " @ {}", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::primitives::TYPE_INT32;

    #[test]
    fn test_describe_matches_error_vocabulary() {
        let f1 = Identifier::parse("f1").unwrap();
        assert_eq!(Event::field_start(f1).describe(), "start of field 'f1'");
        assert_eq!(Event::value(1i32).describe(), "value");
        assert_eq!(
            Event::list_start(ListType::new(TYPE_INT32.clone(), true)).describe(),
            "list start"
        );
        assert_eq!(Event::reference(PointerId::new(3)).describe(), "reference to &3");
    }

    #[test]
    fn test_display_includes_path() {
        let f1 = Identifier::parse("f1").unwrap();
        let ev = Event::value(1i32).with_path(ObjectPath::root().field(f1).index(0));
        assert_eq!(ev.to_string(), "Value(1) @ f1.0");
        assert_eq!(Event::map_start().to_string(), "MapStart");
    }

    #[test]
    fn test_path_or_root_defaults() {
        assert!(Event::end().path_or_root().is_empty());
    }
}
