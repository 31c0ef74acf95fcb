//! Binary output for event streams
//!
//! [`BinarySink`] is a terminal sink that writes each event straight to a
//! [`BinWriter`], so a pipeline's output can be encoded without first being
//! materialized. Fields are written in the order they arrive, which makes
//! the sink the natural end of a pipeline with a field order stage.

use std::io::Write;
use tessera_codec::BinWriter;
use tessera_reactor::{Event, EventKind, EventSink, ReactorError, Result};

/// Encodes events as they arrive
#[derive(Debug)]
pub struct BinarySink<W> {
    writer: BinWriter<W>,
}

impl<W: Write> BinarySink<W> {
    /// Sink writing to `inner`
    pub fn new(inner: W) -> Self {
        BinarySink {
            writer: BinWriter::new(inner),
        }
    }

    /// Unwrap the byte sink
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> EventSink for BinarySink<W> {
    fn process(&mut self, event: Event) -> Result<()> {
        let written = match &event.kind {
            EventKind::Value(value) => self.writer.write_value(value),
            EventKind::StructStart(name) => self.writer.begin_struct(name),
            EventKind::MapStart(id) if id.is_null() => self.writer.begin_map(),
            EventKind::ListStart { id, .. } if id.is_null() => self.writer.begin_list(),
            EventKind::FieldStart(field) => self.writer.write_map_pair_key(field),
            EventKind::End => self.writer.write_end(),
            EventKind::MapStart(id)
            | EventKind::ListStart { id, .. }
            | EventKind::ValueAllocation { id, .. }
            | EventKind::ValueReference(id) => {
                return Err(ReactorError::sink(
                    event.path_or_root(),
                    format!("cannot encode pointer {}", id),
                ))
            }
        };
        written.map_err(|e| ReactorError::sink(event.path_or_root(), e.to_string()))
    }
}
