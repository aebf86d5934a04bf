//! AI box frame pipeline demo
//!
//! Opens an image file as the frame source, runs the pipeline for a few
//! seconds with detection enabled, and logs every published snapshot.

use std::sync::Arc;
use std::time::Duration;

use aibox::detect::NullDetector;
use aibox::pipeline::{FrameSnapshot, PipelineController};
use aibox::{Config, DisplayConfig};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::info;

fn main() -> Result<()> {
    // Initialize error handling and logging
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter("aibox=debug")
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: aibox <image-path>"))?;

    let config = Config::default();
    let (tx, rx) = flume::unbounded::<Arc<FrameSnapshot>>();

    let mut controller =
        PipelineController::new(&config.pipeline, Arc::new(NullDetector), Arc::new(tx));
    controller.open_image(&path)?;
    controller.start_detect();
    info!(%path, "pipeline running");

    let deadline = std::time::Instant::now() + Duration::from_secs(3);
    while std::time::Instant::now() < deadline {
        match rx.recv_timeout(Duration::from_millis(500)) {
            Ok(snapshot) => log_snapshot(&snapshot, &config.display),
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }

    controller.close_source();
    info!("pipeline shut down");
    Ok(())
}

fn log_snapshot(snapshot: &FrameSnapshot, display: &DisplayConfig) {
    match &snapshot.frame {
        Some(frame) => {
            let boxes = display.map_detections(&snapshot.detections);
            info!(
                width = frame.width,
                height = frame.height,
                detections = boxes.len(),
                "snapshot"
            );
        }
        None => info!("display cleared"),
    }
}
