//! Renderer-side contract
//!
//! The worker hands each published snapshot to a sink and moves on; render
//! completion is never waited for. An empty snapshot means "clear the
//! display". Scaling detection boxes down to the preview resolution is the
//! renderer's job, driven by `DisplayConfig`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::detect::Detection;
use crate::pipeline::snapshot::FrameSnapshot;

/// Consumes published snapshots. Must not block the worker.
pub trait RenderSink: Send + Sync {
    fn present(&self, snapshot: Arc<FrameSnapshot>);
}

/// A flume sender is a natural non-blocking sink; the renderer drains the
/// receiving end at its own pace.
impl RenderSink for flume::Sender<Arc<FrameSnapshot>> {
    fn present(&self, snapshot: Arc<FrameSnapshot>) {
        // A gone receiver just means nobody is watching anymore.
        let _ = self.send(snapshot);
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Preview scale relative to the source frame (0.25 = quarter size).
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { scale: 0.25 }
    }
}

impl DisplayConfig {
    /// Detection boxes mapped into the preview's coordinate space.
    pub fn map_detections(&self, detections: &[Detection]) -> Vec<Detection> {
        detections.iter().map(|d| d.scaled(self.scale)).collect()
    }
}
