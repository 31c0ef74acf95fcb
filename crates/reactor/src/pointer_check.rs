//! Pointer consistency
//!
//! [`PointerCheckReactor`] rejects an id allocated twice, a reference to the
//! null pointer, and a reference to an id never allocated. References to an
//! allocation that is still open are fine; that is how cycles are written.

use crate::error::{ReactorError, Result};
use crate::event::{Event, EventKind};
use crate::pipeline::{EventProcessor, EventSink, StageKind};
use std::collections::HashSet;
use tessera_core::PointerId;

/// Validates pointer allocations and references
#[derive(Debug, Default)]
pub struct PointerCheckReactor {
    allocated: HashSet<PointerId>,
}

impl PointerCheckReactor {
    /// Fresh checker
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self, id: PointerId, event: &Event) -> Result<()> {
        if id.is_null() {
            return Ok(());
        }
        if !self.allocated.insert(id) {
            return Err(ReactorError::reference(
                event.path_or_root(),
                format!("attempt to redefine reference: {}", id),
            ));
        }
        Ok(())
    }

    fn check(&mut self, event: &Event) -> Result<()> {
        match &event.kind {
            EventKind::ValueAllocation { id, .. } | EventKind::MapStart(id) => {
                self.allocate(*id, event)
            }
            EventKind::ListStart { id, .. } => self.allocate(*id, event),
            EventKind::ValueReference(id) if id.is_null() => Err(ReactorError::reference(
                event.path_or_root(),
                "attempt to reference null pointer",
            )),
            EventKind::ValueReference(id) if !self.allocated.contains(id) => {
                Err(ReactorError::reference(
                    event.path_or_root(),
                    format!("unrecognized reference: {}", id),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl EventProcessor for PointerCheckReactor {
    fn kind(&self) -> StageKind {
        StageKind::PointerCheck
    }

    fn process(&mut self, event: Event, next: &mut dyn EventSink) -> Result<()> {
        self.check(&event)?;
        next.process(event)
    }
}
