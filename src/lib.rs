//! Tessera - schema-aware values with a streaming validation pipeline
//!
//! Tessera models structured data (structs, maps, lists, scalars, enums and
//! shared or cyclic values) together with the types that describe it, and
//! checks and converts that data as a stream of events.
//!
//! # Quick Start
//!
//! ```ignore
//! use tessera::{Heap, Tessera, TesseraConfig, Value};
//! use tessera::model::primitives::TYPE_INT64;
//!
//! let tessera = Tessera::new(TesseraConfig::default());
//! let (value, _heap) = tessera.cast(&Value::from("42"), &Heap::new(), TYPE_INT64.clone())?;
//! assert_eq!(value, Value::Int64(42));
//! ```
//!
//! # Architecture
//!
//! - [`model`]: identifiers, names, types, restrictions and values
//! - [`reactor`]: events, the pipeline and its stages
//! - [`codec`]: the tagged binary encoding
//!
//! [`Tessera`] wires the three together using a [`TesseraConfig`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod sink;

pub use config::{TesseraConfig, CONFIG_FILE_NAME};
pub use error::{Result, TesseraError};
pub use sink::BinarySink;

pub use tessera_codec as codec;
pub use tessera_core as model;
pub use tessera_reactor as reactor;

pub use tessera_core::{
    Heap, Identifier, ObjectPath, PointerId, Struct, SymbolMap, TypeReference, Value,
};
pub use tessera_reactor::{
    CastInterface, DefaultCastInterface, Event, EventSink, FieldOrderGetter, PipelineBuilder,
    ReactorError, TopType,
};

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tessera_reactor::{
    visit_value, CastReactor, DiscardSink, FieldOrderReactor, ValueBuilder,
};
use tracing::debug;

/// Configured entry point
///
/// Cheap to clone; the cast interface and field orders are shared.
#[derive(Clone)]
pub struct Tessera {
    config: TesseraConfig,
    cast_interface: Arc<dyn CastInterface>,
    field_orders: Option<Arc<dyn FieldOrderGetter>>,
}

impl Tessera {
    /// Instance using the default cast interface and no field orders
    pub fn new(config: TesseraConfig) -> Self {
        Tessera {
            config,
            cast_interface: Arc::new(DefaultCastInterface),
            field_orders: None,
        }
    }

    /// Load `path`, creating it with the default content first if missing
    pub fn open(path: &Path) -> Result<Self> {
        TesseraConfig::write_default_if_missing(path)?;
        Ok(Self::new(TesseraConfig::from_file(path)?))
    }

    /// Use `iface` for struct typing, inference and custom casts
    pub fn with_cast_interface(mut self, iface: Arc<dyn CastInterface>) -> Self {
        self.cast_interface = iface;
        self
    }

    /// Reorder struct fields in pipelines built by this instance
    pub fn with_field_orders(mut self, getter: Arc<dyn FieldOrderGetter>) -> Self {
        self.field_orders = Some(getter);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &TesseraConfig {
        &self.config
    }

    /// Builder preloaded with the configured standard stages
    pub fn pipeline(&self) -> PipelineBuilder {
        self.config.pipeline.builder()
    }

    fn cast_pipeline(&self, expected: TypeReference) -> PipelineBuilder {
        let builder = self
            .pipeline()
            .add(CastReactor::new(expected, Arc::clone(&self.cast_interface)));
        match &self.field_orders {
            Some(getter) => builder.add(FieldOrderReactor::new(Arc::clone(getter))),
            None => builder,
        }
    }

    /// Check a value against the configured stages without casting it
    pub fn validate(&self, value: &Value, heap: &Heap) -> Result<()> {
        let mut pipeline = self.pipeline().build(DiscardSink);
        visit_value(value, heap, &mut pipeline)?;
        Ok(())
    }

    /// Cast `value` to `expected`
    ///
    /// Returns the cast value and the heap holding any values it points to.
    pub fn cast(
        &self,
        value: &Value,
        heap: &Heap,
        expected: TypeReference,
    ) -> Result<(Value, Heap)> {
        debug!(target: "tessera", expected = %expected, "Casting value");
        let mut pipeline = self.cast_pipeline(expected).build(ValueBuilder::new());
        visit_value(value, heap, &mut pipeline)?;
        Ok(pipeline.into_sink().into_parts()?)
    }

    /// Cast `value` to `expected` and encode the result
    ///
    /// Fields are written in their declared order when field orders are set.
    pub fn cast_to_bytes(
        &self,
        value: &Value,
        heap: &Heap,
        expected: TypeReference,
    ) -> Result<Vec<u8>> {
        let mut pipeline = self
            .cast_pipeline(expected)
            .build(BinarySink::new(Vec::new()));
        visit_value(value, heap, &mut pipeline)?;
        Ok(pipeline.into_sink().into_inner())
    }

    /// Encode a pointer-free value
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(tessera_codec::encode_value(value)?)
    }

    /// Decode one value under the configured limits
    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        Ok(tessera_codec::decode_value_with_limits(
            bytes,
            self.config.codec,
        )?)
    }
}

impl Default for Tessera {
    fn default() -> Self {
        Self::new(TesseraConfig::default())
    }
}

impl fmt::Debug for Tessera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tessera")
            .field("config", &self.config)
            .field("field_orders", &self.field_orders.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::primitives::{TYPE_INT32, TYPE_INT64};

    #[test]
    fn test_cast_scalar() {
        let tessera = Tessera::default();
        let (value, heap) = tessera
            .cast(&Value::from("42"), &Heap::new(), TYPE_INT64.clone())
            .unwrap();
        assert_eq!(value, Value::Int64(42));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_cast_error_surfaces_reactor_error() {
        let tessera = Tessera::default();
        let err = tessera
            .cast(&Value::from("x"), &Heap::new(), TYPE_INT32.clone())
            .unwrap_err();
        let reactor = err.as_reactor().unwrap();
        assert_eq!(reactor.message(), "Invalid numeric value: \"x\"");
    }

    #[test]
    fn test_top_type_from_config() {
        let mut config = TesseraConfig::default();
        config.pipeline.top_type = TopType::List;
        let tessera = Tessera::new(config);
        assert!(tessera.validate(&Value::Int32(1), &Heap::new()).is_err());
        assert!(tessera
            .validate(&Value::List(vec![Value::Int32(1)]), &Heap::new())
            .is_ok());
    }

    #[test]
    fn test_decode_uses_configured_limits() {
        let mut config = TesseraConfig::default();
        config.codec.max_nesting_depth = 1;
        let tessera = Tessera::new(config);
        let nested = Value::List(vec![Value::List(vec![])]);
        let bytes = tessera.encode(&nested).unwrap();
        assert!(matches!(
            tessera.decode(&bytes),
            Err(TesseraError::Codec(_))
        ));
        assert_eq!(Tessera::default().decode(&bytes).unwrap(), nested);
    }

    #[test]
    fn test_open_writes_default_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let tessera = Tessera::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(tessera.config(), &TesseraConfig::default());
    }
}
