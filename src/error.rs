//! Top-level error type
//!
//! Wraps the per-crate errors so callers of the facade handle a single
//! type. Pipeline failures keep their location through
//! [`ReactorError::path`].

use tessera_codec::CodecError;
use tessera_core::ModelError;
use tessera_reactor::ReactorError;
use thiserror::Error;

/// Result type alias for facade operations
pub type Result<T> = std::result::Result<T, TesseraError>;

/// Any failure surfaced by [`Tessera`](crate::Tessera)
#[derive(Debug, Error)]
pub enum TesseraError {
    /// Event pipeline rejected the stream
    #[error(transparent)]
    Reactor(#[from] ReactorError),

    /// Binary encoding or decoding failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Model object could not be built
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Config file could not be read, parsed or written
    #[error("{0}")]
    Config(String),
}

impl TesseraError {
    /// Config failure with a message
    pub fn config(message: impl Into<String>) -> Self {
        TesseraError::Config(message.into())
    }

    /// The pipeline error, if this is one
    pub fn as_reactor(&self) -> Option<&ReactorError> {
        match self {
            TesseraError::Reactor(e) => Some(e),
            _ => None,
        }
    }
}
