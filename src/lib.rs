pub mod capture;
pub mod detect;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod uart;

use serde::{Deserialize, Serialize};

pub use capture::frame::{Frame, PixelFormat};
pub use pipeline::{FrameSnapshot, PipelineController, PipelineEvent, PipelineState};
pub use render::DisplayConfig;

/// System configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Target worker cycle interval; 100 ms approximates 10 Hz.
    pub frame_interval_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 100,
        }
    }
}
