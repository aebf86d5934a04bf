//! Detection port to an opaque external engine

use crate::capture::frame::PixelFormat;
use crate::error::DetectError;

/// One detected bounding box in raw source-frame pixel space.
///
/// Display-space mapping (preview downscale) belongs to the renderer; the
/// port always reports coordinates against the frame it was given.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub label: Option<String>,
}

impl Detection {
    /// Map into a preview resolution scaled by `scale` (e.g. 0.25 for a
    /// quarter-resolution view).
    pub fn scaled(&self, scale: f32) -> Detection {
        Detection {
            x1: self.x1 * scale,
            y1: self.y1 * scale,
            x2: self.x2 * scale,
            y2: self.y2 * scale,
            label: self.label.clone(),
        }
    }
}

/// Blocking call into an external detection engine.
///
/// The engine never mutates the input buffer; the caller must keep it
/// untouched until the call returns. Results come back in the engine's
/// output order, which carries no priority.
pub trait DetectionPort: Send + Sync {
    fn detect(
        &self,
        data: &[u8],
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, DetectError>;
}

/// Placeholder detector for wiring without an engine linked in.
pub struct NullDetector;

impl DetectionPort for NullDetector {
    fn detect(
        &self,
        data: &[u8],
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, DetectError> {
        if data.len() != format.expected_len(width, height) {
            return Err(DetectError::InvalidInput(format!(
                "buffer of {} bytes does not fit {width}x{height} {format:?}",
                data.len()
            )));
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_maps_all_corners() {
        let det = Detection {
            x1: 8.0,
            y1: 12.0,
            x2: 40.0,
            y2: 60.0,
            label: Some("person".into()),
        };
        let quarter = det.scaled(0.25);
        assert_eq!(
            (quarter.x1, quarter.y1, quarter.x2, quarter.y2),
            (2.0, 3.0, 10.0, 15.0)
        );
        assert_eq!(quarter.label.as_deref(), Some("person"));
    }

    #[test]
    fn null_detector_validates_input() {
        let buf = vec![0u8; 16];
        assert!(NullDetector
            .detect(&buf, PixelFormat::Rgba8888, 2, 2)
            .unwrap()
            .is_empty());
        assert!(NullDetector
            .detect(&buf, PixelFormat::Rgba8888, 3, 3)
            .is_err());
    }
}
