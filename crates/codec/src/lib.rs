//! Binary codec for Tessera
//!
//! Encodes values and type references directly, without going through the
//! event pipeline. Every item is a tag byte ([`Tag`]) and a payload;
//! integers and floats are little-endian, strings and buffers carry a `u32`
//! length prefix, and containers are closed by an `End` tag instead of
//! being counted up front.
//!
//! [`BinWriter`] and [`BinReader`] work over any `Write`/`Read`; the
//! functions below cover the common whole-buffer case and reject input with
//! bytes left over.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod reader;
pub mod tag;
pub mod writer;

pub use error::{CodecError, Result};
pub use limits::CodecLimits;
pub use reader::BinReader;
pub use tag::Tag;
pub use writer::BinWriter;

use tessera_core::{TypeReference, Value};
use tracing::debug;

/// Encode a pointer-free value
pub fn encode_value(value: &Value) -> Result<Vec<u8>> {
    let mut writer = BinWriter::new(Vec::new());
    writer.write_value(value)?;
    Ok(writer.into_inner())
}

/// Decode exactly one value with default limits
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    decode_value_with_limits(bytes, CodecLimits::default())
}

/// Decode exactly one value
pub fn decode_value_with_limits(bytes: &[u8], limits: CodecLimits) -> Result<Value> {
    decode_whole(bytes, limits, "value", BinReader::read_value)
}

/// Encode a type reference
pub fn encode_type_reference(type_ref: &TypeReference) -> Result<Vec<u8>> {
    let mut writer = BinWriter::new(Vec::new());
    writer.write_type_reference(type_ref)?;
    Ok(writer.into_inner())
}

/// Decode exactly one type reference with default limits
pub fn decode_type_reference(bytes: &[u8]) -> Result<TypeReference> {
    decode_type_reference_with_limits(bytes, CodecLimits::default())
}

/// Decode exactly one type reference
pub fn decode_type_reference_with_limits(
    bytes: &[u8],
    limits: CodecLimits,
) -> Result<TypeReference> {
    decode_whole(bytes, limits, "type reference", BinReader::read_type_reference)
}

fn decode_whole<'a, T>(
    bytes: &'a [u8],
    limits: CodecLimits,
    what: &'static str,
    read: impl FnOnce(&mut BinReader<&'a [u8]>) -> Result<T>,
) -> Result<T> {
    let mut reader = BinReader::with_limits(bytes, limits);
    let result = read(&mut reader).and_then(|item| reader.finish().map(|()| item));
    if let Err(e) = &result {
        debug!(target: "tessera::codec", len = bytes.len(), error = %e, "Rejected encoded {}", what);
    }
    result
}
