//! Error taxonomy for the pipeline
//!
//! Source failures are terminal for the current run; conversion and
//! detection failures are absorbed per cycle and the loop continues.

use thiserror::Error;

use crate::capture::frame::PixelFormat;

/// Failures that invalidate the active frame source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source cannot produce frames (file missing, decode failure).
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The external vision service unbound while streaming.
    #[error("vision service binding lost: {0}")]
    BindingLost(String),
}

/// Per-cycle pixel conversion failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("unsupported pixel format {0:?}")]
    UnsupportedFormat(PixelFormat),

    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("chroma subsampling requires even dimensions, got {width}x{height}")]
    OddDimensions { width: u32, height: u32 },
}

/// Per-cycle detection failures.
#[derive(Debug, Error)]
pub enum DetectError {
    /// Buffer, dimensions, and format do not describe a valid frame.
    #[error("invalid detector input: {0}")]
    InvalidInput(String),
}

/// Controller misuse.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("a {0:?} source is already open")]
    AlreadyOpen(crate::pipeline::SourceKind),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),
}
