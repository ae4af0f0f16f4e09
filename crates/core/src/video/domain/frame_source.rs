use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

/// Produces frames from a camera or image source.
///
/// Implementations handle device and decoding details while the
/// pipeline works with the abstract `Frame` and `StreamMetadata` types.
/// Live sources are unbounded; file sources return `None` when
/// exhausted.
pub trait FrameSource: Send {
    /// Opens the source and returns its metadata.
    fn open(&mut self) -> Result<StreamMetadata, Box<dyn std::error::Error>>;

    /// Returns the next frame, or `None` when the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
