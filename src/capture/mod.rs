pub mod convert;
pub mod file;
pub mod frame;
pub mod stream;

pub use file::FileSource;
pub use frame::Frame;
pub use frame::PixelFormat;
pub use stream::{ServiceFrame, StreamKind, StreamSource, VisionService};

use crate::error::SourceError;

/// Where frames come from: a decoded file or a live service stream.
///
/// One frame per poll. A poll error is terminal for the current run; the
/// worker stops instead of retrying.
pub trait FrameSource: Send {
    fn poll(&mut self) -> Result<Frame, SourceError>;

    /// Release any underlying resource. Called once when the worker exits.
    fn close(&mut self);
}
