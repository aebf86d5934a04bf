//! Shared (frame, detections) slot between worker and renderer
//!
//! The whole snapshot is published as one `Arc` swap, so a reader always
//! observes a complete pair: detections, when present, were computed from
//! the frame they ride with, never from a neighbouring cycle.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::capture::frame::Frame;
use crate::detect::Detection;

/// The unit exchanged between the worker and the renderer.
#[derive(Debug, Default)]
pub struct FrameSnapshot {
    pub frame: Option<Frame>,
    pub detections: Vec<Detection>,
}

impl FrameSnapshot {
    /// An empty snapshot tells the renderer to clear its display.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_none()
    }
}

/// Single-slot publication point; the only producer/consumer sync in the
/// pipeline.
pub struct SnapshotSlot {
    inner: ArcSwap<FrameSnapshot>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(FrameSnapshot::empty()),
        }
    }

    pub fn publish(&self, snapshot: Arc<FrameSnapshot>) {
        self.inner.store(snapshot);
    }

    pub fn load(&self) -> Arc<FrameSnapshot> {
        self.inner.load_full()
    }
}

impl Default for SnapshotSlot {
    fn default() -> Self {
        Self::new()
    }
}
