use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;

/// Abstracts live frame display so the pipeline can emit output without
/// depending on a specific playback mechanism.
pub trait FrameSink: Send {
    fn open(&mut self, metadata: &StreamMetadata) -> Result<(), Box<dyn std::error::Error>>;

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
