//! Static image source
//!
//! Decodes a fixed path into an RGBA frame on every poll, so edits to the
//! file on disk show up on the next cycle.

use std::path::PathBuf;

use bytes::Bytes;
use tracing::debug;

use crate::capture::frame::{Frame, PixelFormat};
use crate::capture::FrameSource;
use crate::error::SourceError;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameSource for FileSource {
    fn poll(&mut self) -> Result<Frame, SourceError> {
        let img = image::open(&self.path)
            .map_err(|e| SourceError::Unavailable(format!("{}: {e}", self.path.display())))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!(path = %self.path.display(), width, height, "decoded image frame");
        Ok(Frame::new(
            Bytes::from(rgba.into_raw()),
            width,
            height,
            PixelFormat::Rgba8888,
        ))
    }

    fn close(&mut self) {}
}
