//! Path tracking
//!
//! [`PathSettingProcessor`] stamps every event with the [`ObjectPath`] of the
//! value it belongs to. Fields append their name, list elements their
//! index, and `End` carries the path of the container it closes. An
//! allocation carries the path of the value it announces.

use crate::error::Result;
use crate::event::{Event, EventKind};
use crate::pipeline::{EventProcessor, EventSink, StageKind};
use tessera_core::{ObjectPath, PathSegment};

enum Frame {
    List { next_index: u64 },
    Fields,
}

/// Attaches object paths to events
#[derive(Default)]
pub struct PathSettingProcessor {
    path: ObjectPath,
    stack: Vec<Frame>,
}

impl PathSettingProcessor {
    /// Paths start at the root
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths start below `start`
    pub fn with_start(start: ObjectPath) -> Self {
        PathSettingProcessor {
            path: start,
            stack: Vec::new(),
        }
    }

    fn begin_value(&mut self) -> ObjectPath {
        if let Some(Frame::List { next_index }) = self.stack.last() {
            self.path.push(PathSegment::Index(*next_index));
        }
        self.path.clone()
    }

    fn peek_value(&self) -> ObjectPath {
        match self.stack.last() {
            Some(Frame::List { next_index }) => self.path.clone().index(*next_index),
            _ => self.path.clone(),
        }
    }

    /// Leave the value just finished: drop its index or field segment
    fn complete_value(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::List { next_index }) => {
                self.path.pop();
                *next_index += 1;
            }
            Some(Frame::Fields) => {
                self.path.pop();
            }
            None => {}
        }
    }

    fn locate(&mut self, kind: &EventKind) -> ObjectPath {
        match kind {
            EventKind::FieldStart(field) => {
                self.path.push(PathSegment::Field(field.clone()));
                self.path.clone()
            }
            EventKind::Value(_) | EventKind::ValueReference(_) => {
                let path = self.begin_value();
                self.complete_value();
                path
            }
            EventKind::ListStart { .. } => {
                let path = self.begin_value();
                self.stack.push(Frame::List { next_index: 0 });
                path
            }
            EventKind::MapStart(_) | EventKind::StructStart(_) => {
                let path = self.begin_value();
                self.stack.push(Frame::Fields);
                path
            }
            EventKind::End => {
                let path = self.path.clone();
                self.stack.pop();
                self.complete_value();
                path
            }
            EventKind::ValueAllocation { .. } => self.peek_value(),
        }
    }
}

impl EventProcessor for PathSettingProcessor {
    fn kind(&self) -> StageKind {
        StageKind::PathSetting
    }

    fn requires(&self) -> &'static [StageKind] {
        &[StageKind::Structural]
    }

    fn process(&mut self, mut event: Event, next: &mut dyn EventSink) -> Result<()> {
        let path = self.locate(&event.kind);
        event.path = Some(path);
        next.process(event)
    }
}
