//! Live stream source backed by an external vision service
//!
//! The vendor service exposes exactly five operations: bind, unbind,
//! start/stop by stream type, and a blocking next-frame/return-frame pair.
//! `StreamSource` is a thin adapter over those, translated into the
//! `FrameSource` contract. An asynchronous unbind reported by the service
//! surfaces as `SourceError::BindingLost` on the next poll.

use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::capture::frame::{Frame, PixelFormat};
use crate::capture::FrameSource;
use crate::error::SourceError;

/// Which stream of the service to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamKind {
    FishEye,
    Color,
}

/// One frame as handed out by the service, on loan until returned.
#[derive(Debug)]
pub struct ServiceFrame {
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,

    /// Hardware capture timestamp, if the service reports one.
    pub device_timestamp: Option<Duration>,
}

/// The external vision/camera service collaborator.
///
/// `next_frame` blocks until a frame is available and fails with
/// `BindingLost` if the service unbound in the meantime. Every frame
/// obtained must be handed back through `return_frame`.
pub trait VisionService: Send {
    fn bind(&mut self) -> Result<(), SourceError>;
    fn unbind(&mut self);
    fn start_stream(&mut self, kind: StreamKind) -> Result<(), SourceError>;
    fn stop_stream(&mut self, kind: StreamKind);
    fn next_frame(&mut self, kind: StreamKind) -> Result<ServiceFrame, SourceError>;
    fn return_frame(&mut self, frame: ServiceFrame);
}

pub struct StreamSource {
    service: Box<dyn VisionService>,
    kind: StreamKind,
}

impl StreamSource {
    /// Bind the service and start the requested stream.
    pub fn open(mut service: Box<dyn VisionService>, kind: StreamKind) -> Result<Self, SourceError> {
        service.bind()?;
        if let Err(e) = service.start_stream(kind) {
            service.unbind();
            return Err(e);
        }
        info!(?kind, "vision stream started");
        Ok(Self { service, kind })
    }
}

impl FrameSource for StreamSource {
    fn poll(&mut self) -> Result<Frame, SourceError> {
        let loaned = self.service.next_frame(self.kind)?;
        // Copy out of the loaned buffer so it can go back to the service
        // before conversion or detection runs.
        let frame = Frame::new(
            Bytes::copy_from_slice(&loaned.data),
            loaned.width,
            loaned.height,
            loaned.format,
        );
        self.service.return_frame(loaned);
        Ok(frame)
    }

    fn close(&mut self) {
        self.service.stop_stream(self.kind);
        self.service.unbind();
        info!(kind = ?self.kind, "vision stream closed");
    }
}
