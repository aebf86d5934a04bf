pub mod controller;
pub mod snapshot;
pub(crate) mod worker;

pub use controller::{PipelineController, PipelineState};
pub use snapshot::{FrameSnapshot, SnapshotSlot};

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Which kind of source is feeding the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    Image,
    Camera,
}

/// Notifications the worker sends back to the controlling side.
#[derive(Debug)]
pub enum PipelineEvent {
    /// The active source failed; the run is over and the display was
    /// cleared. Reopening is allowed.
    SourceLost {
        kind: SourceKind,
        error: SourceError,
    },

    /// The worker exited, whether on request or after a source failure.
    Stopped { kind: SourceKind },
}
