//! Pipeline state machine exposed to the UI-owning side
//!
//! At most one source is open at a time; detection is an orthogonal flag
//! picked up by the worker at its next cycle. `close_source` is the only
//! blocking call: it joins the worker thread, so no snapshot is published
//! after it returns.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info};

use crate::capture::{FileSource, FrameSource, StreamKind, StreamSource, VisionService};
use crate::detect::DetectionPort;
use crate::error::ControlError;
use crate::pipeline::snapshot::{FrameSnapshot, SnapshotSlot};
use crate::pipeline::worker::{SourceInit, Worker, WorkerShared};
use crate::pipeline::{PipelineEvent, SourceKind};
use crate::render::RenderSink;
use crate::PipelineConfig;

/// Controller-visible pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    ImageActive,
    CameraActive,
}

struct ActiveWorker {
    kind: SourceKind,
    shared: Arc<WorkerShared>,
    handle: JoinHandle<()>,
}

pub struct PipelineController {
    interval: Duration,
    detector: Arc<dyn DetectionPort>,
    sink: Arc<dyn RenderSink>,
    slot: Arc<SnapshotSlot>,
    detecting: bool,
    active: Option<ActiveWorker>,
    events_tx: flume::Sender<PipelineEvent>,
    events_rx: flume::Receiver<PipelineEvent>,
}

impl PipelineController {
    pub fn new(
        config: &PipelineConfig,
        detector: Arc<dyn DetectionPort>,
        sink: Arc<dyn RenderSink>,
    ) -> Self {
        let (events_tx, events_rx) = flume::unbounded();
        Self {
            interval: Duration::from_millis(config.frame_interval_ms),
            detector,
            sink,
            slot: Arc::new(SnapshotSlot::new()),
            detecting: false,
            active: None,
            events_tx,
            events_rx,
        }
    }

    /// Open the static image source and start its worker.
    pub fn open_image(&mut self, path: impl Into<PathBuf>) -> Result<(), ControlError> {
        let path = path.into();
        self.open(SourceKind::Image, Box::new(move || {
            Ok(Box::new(FileSource::new(path)) as Box<dyn FrameSource>)
        }))
    }

    /// Bind the vision service and start streaming. Binding happens on the
    /// worker thread; a failed bind comes back as a `SourceLost` event.
    pub fn open_camera(
        &mut self,
        service: Box<dyn VisionService>,
        stream: StreamKind,
    ) -> Result<(), ControlError> {
        self.open(SourceKind::Camera, Box::new(move || {
            Ok(Box::new(StreamSource::open(service, stream)?) as Box<dyn FrameSource>)
        }))
    }

    fn open(&mut self, kind: SourceKind, init: SourceInit) -> Result<(), ControlError> {
        self.reap();
        if let Some(active) = &self.active {
            return Err(ControlError::AlreadyOpen(active.kind));
        }

        let shared = Arc::new(WorkerShared::new(self.detecting));
        let worker = Worker {
            kind,
            shared: shared.clone(),
            slot: self.slot.clone(),
            detector: self.detector.clone(),
            sink: self.sink.clone(),
            events: self.events_tx.clone(),
            interval: self.interval,
        };
        let handle = std::thread::Builder::new()
            .name("pipeline-worker".into())
            .spawn(move || worker.run(init))
            .map_err(|e| ControlError::Spawn(e.to_string()))?;

        info!(?kind, "source opened");
        self.active = Some(ActiveWorker {
            kind,
            shared,
            handle,
        });
        Ok(())
    }

    /// Stop the worker and wait for it to terminate. No-op when idle.
    pub fn close_source(&mut self) {
        if self.detecting {
            self.stop_detect();
        }
        if let Some(active) = self.active.take() {
            active.shared.stop.store(true, Ordering::Release);
            let _ = active.handle.join();
            info!(kind = ?active.kind, "source closed");
        }
    }

    /// Idempotent; takes effect on the worker's next cycle.
    pub fn start_detect(&mut self) {
        if !self.detecting {
            debug!("detection enabled");
        }
        self.detecting = true;
        if let Some(active) = &self.active {
            active.shared.detecting.store(true, Ordering::Release);
        }
    }

    /// Idempotent. An in-flight detection call is not interrupted; the
    /// flag is honored from the next cycle on.
    pub fn stop_detect(&mut self) {
        if self.detecting {
            debug!("detection disabled");
        }
        self.detecting = false;
        if let Some(active) = &self.active {
            active.shared.detecting.store(false, Ordering::Release);
        }
    }

    pub fn state(&self) -> PipelineState {
        match &self.active {
            Some(active) if !active.shared.stopped.load(Ordering::Acquire) => match active.kind {
                SourceKind::Image => PipelineState::ImageActive,
                SourceKind::Camera => PipelineState::CameraActive,
            },
            _ => PipelineState::Idle,
        }
    }

    pub fn detecting(&self) -> bool {
        self.detecting
    }

    /// Latest published snapshot; empty while no run is active.
    pub fn snapshot(&self) -> Arc<FrameSnapshot> {
        self.slot.load()
    }

    /// Worker notifications (source lost, stopped).
    pub fn events(&self) -> &flume::Receiver<PipelineEvent> {
        &self.events_rx
    }

    /// Join a worker that already stopped on its own (source failure), so
    /// the slot frees up for a reopen.
    fn reap(&mut self) {
        let stopped = self
            .active
            .as_ref()
            .is_some_and(|a| a.shared.stopped.load(Ordering::Acquire));
        if stopped {
            if let Some(active) = self.active.take() {
                let _ = active.handle.join();
                debug!(kind = ?active.kind, "reaped stopped worker");
            }
        }
    }
}

impl Drop for PipelineController {
    fn drop(&mut self) {
        self.close_source();
    }
}
