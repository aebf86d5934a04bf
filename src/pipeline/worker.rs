//! Pipeline worker loop
//!
//! One dedicated thread per activation: poll the source, optionally run
//! detection on the raw buffer, convert to a displayable frame, publish a
//! consistent snapshot, pace to the target interval. Cancellation is
//! cooperative; the stop flag is observed at cycle boundaries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::capture::convert::yuv_to_rgba;
use crate::capture::frame::{Frame, PixelFormat};
use crate::capture::FrameSource;
use crate::detect::{Detection, DetectionPort};
use crate::error::SourceError;
use crate::pipeline::snapshot::{FrameSnapshot, SnapshotSlot};
use crate::pipeline::{PipelineEvent, SourceKind};
use crate::render::RenderSink;

/// State shared between a running worker and the controller.
pub(crate) struct WorkerShared {
    pub stop: AtomicBool,
    pub detecting: AtomicBool,
    /// Set by the worker once its loop has fully exited.
    pub stopped: AtomicBool,
}

impl WorkerShared {
    pub fn new(detecting: bool) -> Self {
        Self {
            stop: AtomicBool::new(false),
            detecting: AtomicBool::new(detecting),
            stopped: AtomicBool::new(false),
        }
    }
}

/// Deferred source construction so binding happens on the worker thread;
/// a failed open surfaces as `SourceLost` like any later failure.
pub(crate) type SourceInit =
    Box<dyn FnOnce() -> Result<Box<dyn FrameSource>, SourceError> + Send>;

pub(crate) struct Worker {
    pub kind: SourceKind,
    pub shared: Arc<WorkerShared>,
    pub slot: Arc<SnapshotSlot>,
    pub detector: Arc<dyn DetectionPort>,
    pub sink: Arc<dyn RenderSink>,
    pub events: flume::Sender<PipelineEvent>,
    pub interval: Duration,
}

impl Worker {
    pub fn run(self, init: SourceInit) {
        let mut source = match init() {
            Ok(source) => source,
            Err(error) => {
                warn!(kind = ?self.kind, %error, "failed to open source");
                self.clear_and_finish(Some(error));
                return;
            }
        };

        info!(kind = ?self.kind, interval_ms = self.interval.as_millis() as u64, "worker started");
        let mut scratch: Vec<u8> = Vec::new();

        let terminal = loop {
            if self.shared.stop.load(Ordering::Acquire) {
                break None;
            }
            let cycle_start = Instant::now();

            let frame = match source.poll() {
                Ok(frame) => frame,
                Err(error) => {
                    warn!(kind = ?self.kind, %error, "source failed, stopping");
                    break Some(error);
                }
            };
            // Blocking polls can outlive a close request.
            if self.shared.stop.load(Ordering::Acquire) {
                break None;
            }

            let detections = if self.shared.detecting.load(Ordering::Acquire) {
                self.detect(&frame, &mut scratch)
            } else {
                Vec::new()
            };

            match self.display_frame(frame) {
                Some(display) => {
                    let snapshot = Arc::new(FrameSnapshot {
                        frame: Some(display),
                        detections,
                    });
                    self.slot.publish(snapshot.clone());
                    self.sink.present(snapshot);
                }
                // Conversion failed; keep the previous snapshot on screen
                // and try again next cycle.
                None => {}
            }

            let elapsed = cycle_start.elapsed();
            metrics::histogram!("pipeline_cycle_us").record(elapsed.as_micros() as f64);
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        };

        source.close();
        self.clear_and_finish(terminal);
    }

    /// Run the detector on the raw buffer, staged through the scratch
    /// buffer. The scratch is reused while frame sizes stay stable and
    /// reallocated exactly once when they change.
    fn detect(&self, frame: &Frame, scratch: &mut Vec<u8>) -> Vec<Detection> {
        if scratch.capacity() != frame.data.len() {
            *scratch = vec![0u8; frame.data.len()];
        }
        scratch.copy_from_slice(&frame.data);

        let started = Instant::now();
        let result = self
            .detector
            .detect(scratch, frame.format, frame.width, frame.height);
        metrics::histogram!("detect_time_us").record(started.elapsed().as_micros() as f64);

        match result {
            Ok(detections) => {
                debug!(count = detections.len(), "detector returned");
                detections
            }
            Err(error) => {
                // Per-cycle failure: treat as no detections and keep going.
                warn!(%error, "detection failed for this cycle");
                Vec::new()
            }
        }
    }

    /// Displayable version of the polled frame, or `None` when conversion
    /// fails and this cycle's publish is skipped.
    fn display_frame(&self, frame: Frame) -> Option<Frame> {
        if frame.format.is_displayable() {
            return Some(frame);
        }

        let started = Instant::now();
        match yuv_to_rgba(&frame.data, frame.width, frame.height, frame.format) {
            Ok(rgba) => {
                metrics::histogram!("convert_time_us")
                    .record(started.elapsed().as_micros() as f64);
                Some(Frame {
                    data: rgba.into(),
                    width: frame.width,
                    height: frame.height,
                    format: PixelFormat::Rgba8888,
                    timestamp: frame.timestamp,
                })
            }
            Err(error) => {
                warn!(%error, "conversion failed, skipping display update");
                None
            }
        }
    }

    /// Publish the clearing snapshot, flag the worker as stopped, and tell
    /// the controlling side why.
    fn clear_and_finish(&self, terminal: Option<SourceError>) {
        let empty = Arc::new(FrameSnapshot::empty());
        self.slot.publish(empty.clone());
        self.sink.present(empty);
        self.shared.stopped.store(true, Ordering::Release);

        if let Some(error) = terminal {
            let _ = self.events.send(PipelineEvent::SourceLost {
                kind: self.kind,
                error,
            });
        }
        let _ = self.events.send(PipelineEvent::Stopped { kind: self.kind });
        info!(kind = ?self.kind, "worker stopped");
    }
}
