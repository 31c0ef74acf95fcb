//! Event pipeline for Tessera
//!
//! Values travel as event streams through a chain of reactors, each
//! enforcing one property in a single pass:
//!
//! - **structural**: the stream is one well-formed value ([`StructuralReactor`])
//! - **path**: each event knows where it is ([`PathSettingProcessor`])
//! - **pointers**: allocations and references agree ([`PointerCheckReactor`])
//! - **cast**: values conform to an expected type ([`CastReactor`])
//! - **order**: struct fields follow their declared order ([`FieldOrderReactor`])
//!
//! [`visit_value`] produces a stream from a value and [`ValueBuilder`] turns
//! one back into a value.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod cast;
pub mod config;
pub mod error;
pub mod event;
pub mod field_order;
pub mod path_setter;
pub mod pipeline;
pub mod pointer_check;
pub mod structural;
pub mod visit;

pub use builder::ValueBuilder;
pub use cast::{
    CastInterface, CastReactor, DefaultCastInterface, FieldTypeMap, FieldTyper, ValueFieldTyper,
};
pub use config::PipelineConfig;
pub use error::{ReactorError, Result};
pub use event::{Event, EventKind};
pub use field_order::{FieldOrder, FieldOrderGetter, FieldOrderReactor, FieldOrderSpec};
pub use path_setter::PathSettingProcessor;
pub use pipeline::{DiscardSink, EventProcessor, EventSink, Pipeline, PipelineBuilder, StageKind};
pub use pointer_check::PointerCheckReactor;
pub use structural::{StructuralReactor, TopType};
pub use visit::{visit_value, ValueVisitor};
