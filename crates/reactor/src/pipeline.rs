//! Event pipelines
//!
//! A pipeline is an ordered list of processors ending in a sink. Each
//! processor sees every event, may rewrite or hold it back, and hands what
//! it forwards to the rest of the chain. The first error aborts the event
//! and is returned to the producer.
//!
//! Processors declare the stages they depend on. [`PipelineBuilder`] inserts
//! a default instance of any missing prerequisite ahead of the dependent
//! stage, so a cast reactor added on its own is still fed validated,
//! located events.

use crate::error::Result;
use crate::event::Event;
use crate::path_setter::PathSettingProcessor;
use crate::pointer_check::PointerCheckReactor;
use crate::structural::StructuralReactor;
use std::fmt;
use tracing::debug;

// ============================================================================
// Traits
// ============================================================================

/// Final consumer of an event stream
pub trait EventSink {
    /// Consume one event
    fn process(&mut self, event: Event) -> Result<()>;
}

/// A pipeline stage
///
/// `process` receives each event along with the downstream chain. A stage
/// forwards by calling `next.process`, which it may do zero or more times.
pub trait EventProcessor {
    /// Which stage this is
    fn kind(&self) -> StageKind;

    /// Stages that must appear earlier in the pipeline
    fn requires(&self) -> &'static [StageKind] {
        &[]
    }

    /// Handle one event
    fn process(&mut self, event: Event, next: &mut dyn EventSink) -> Result<()>;
}

/// Stage identity, used for prerequisite resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// [`StructuralReactor`]
    Structural,
    /// [`PathSettingProcessor`]
    PathSetting,
    /// [`PointerCheckReactor`]
    PointerCheck,
    /// Cast reactor
    Cast,
    /// Field order reactor
    FieldOrder,
    /// Caller-defined stage
    Custom(&'static str),
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Structural => f.write_str("structural"),
            StageKind::PathSetting => f.write_str("path-setting"),
            StageKind::PointerCheck => f.write_str("pointer-check"),
            StageKind::Cast => f.write_str("cast"),
            StageKind::FieldOrder => f.write_str("field-order"),
            StageKind::Custom(name) => f.write_str(name),
        }
    }
}

impl EventSink for Vec<Event> {
    fn process(&mut self, event: Event) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn process(&mut self, event: Event) -> Result<()> {
        (**self).process(event)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn process(&mut self, event: Event) -> Result<()> {
        (**self).process(event)
    }
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl EventSink for DiscardSink {
    fn process(&mut self, _event: Event) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Processors chained in front of a sink
///
/// A pipeline is itself an [`EventSink`], so producers such as
/// [`visit_value`](crate::visit::visit_value) drive it directly.
pub struct Pipeline<S> {
    stages: Vec<Box<dyn EventProcessor>>,
    sink: S,
}

impl<S: EventSink> Pipeline<S> {
    /// Stage kinds in processing order
    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.kind()).collect()
    }

    /// The sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The sink, mutably
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the pipeline, returning the sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: EventSink> EventSink for Pipeline<S> {
    fn process(&mut self, event: Event) -> Result<()> {
        dispatch(&mut self.stages, &mut self.sink, event)
    }
}

impl<S> fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<StageKind> = self.stages.iter().map(|s| s.kind()).collect();
        f.debug_struct("Pipeline").field("stages", &kinds).finish()
    }
}

fn dispatch(
    stages: &mut [Box<dyn EventProcessor>],
    sink: &mut dyn EventSink,
    event: Event,
) -> Result<()> {
    match stages.split_first_mut() {
        None => sink.process(event),
        Some((head, rest)) => {
            let mut next = Downstream { stages: rest, sink };
            head.process(event, &mut next)
        }
    }
}

/// The part of a pipeline after the current stage
struct Downstream<'a> {
    stages: &'a mut [Box<dyn EventProcessor>],
    sink: &'a mut dyn EventSink,
}

impl EventSink for Downstream<'_> {
    fn process(&mut self, event: Event) -> Result<()> {
        dispatch(&mut *self.stages, &mut *self.sink, event)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Pipeline`]
///
/// ```ignore
/// let pipeline = PipelineBuilder::new()
///     .add(CastReactor::with_defaults(TYPE_INT32.clone()))
///     .build(ValueBuilder::new());
/// // stages: structural, path-setting, cast
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Box<dyn EventProcessor>>,
    check_pointers: bool,
}

impl PipelineBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage, inserting missing prerequisites first
    pub fn add<P: EventProcessor + 'static>(self, stage: P) -> Self {
        self.add_boxed(Box::new(stage))
    }

    /// Append a boxed stage, inserting missing prerequisites first
    pub fn add_boxed(mut self, stage: Box<dyn EventProcessor>) -> Self {
        self.push(stage);
        self
    }

    /// Append a [`PointerCheckReactor`] as the last stage on build
    pub fn check_pointers(mut self, enabled: bool) -> Self {
        self.check_pointers = enabled;
        self
    }

    /// Stage kinds added so far
    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|s| s.kind()).collect()
    }

    /// Whether a stage of this kind is present
    pub fn contains(&self, kind: StageKind) -> bool {
        self.stages.iter().any(|s| s.kind() == kind)
    }

    /// Finish the pipeline in front of `sink`
    pub fn build<S: EventSink>(mut self, sink: S) -> Pipeline<S> {
        if self.check_pointers && !self.contains(StageKind::PointerCheck) {
            self.push(Box::new(PointerCheckReactor::new()));
        }
        debug!(
            target: "tessera::pipeline",
            stages = ?self.stage_kinds(),
            "Pipeline built"
        );
        Pipeline {
            stages: self.stages,
            sink,
        }
    }

    fn push(&mut self, stage: Box<dyn EventProcessor>) {
        for required in stage.requires() {
            if self.contains(*required) {
                continue;
            }
            if let Some(default) = default_stage(*required) {
                debug!(
                    target: "tessera::pipeline",
                    stage = %required,
                    dependent = %stage.kind(),
                    "Inserting prerequisite stage"
                );
                self.push(default);
            }
        }
        self.stages.push(stage);
    }
}

fn default_stage(kind: StageKind) -> Option<Box<dyn EventProcessor>> {
    match kind {
        StageKind::Structural => Some(Box::new(StructuralReactor::default())),
        StageKind::PathSetting => Some(Box::new(PathSettingProcessor::new())),
        StageKind::PointerCheck => Some(Box::new(PointerCheckReactor::new())),
        _ => None,
    }
}
