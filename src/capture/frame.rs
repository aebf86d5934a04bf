use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Pixel formats we support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    Rgba8888,
    Yuv420,
    Yv12,
}

impl PixelFormat {
    /// Expected buffer length in bytes for a frame of the given size.
    pub fn expected_len(self, width: u32, height: u32) -> usize {
        let pixels = width as usize * height as usize;
        match self {
            PixelFormat::Rgba8888 => pixels * 4,
            // Full luma plane plus half-resolution interleaved chroma
            PixelFormat::Yuv420 | PixelFormat::Yv12 => pixels * 3 / 2,
        }
    }

    /// Whether a renderer can take the buffer as-is, without conversion.
    pub fn is_displayable(self) -> bool {
        matches!(self, PixelFormat::Rgba8888)
    }
}

/// One decoded image buffer with format and dimensions.
///
/// Immutable once produced; ownership transfers from the source through the
/// worker into the published snapshot. `data` is `Bytes` so a snapshot
/// reader can hold the frame without copying it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,

    /// Capture timestamp for latency tracking
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(data: Bytes, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
            timestamp: Instant::now(),
        }
    }
}
