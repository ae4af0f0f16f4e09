use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;
use crate::video::domain::frame_source::FrameSource;

#[derive(Error, Debug)]
pub enum CameraSourceError {
    #[error("Failed to open camera {index}: {source}")]
    Open {
        index: u32,
        source: nokhwa::NokhwaError,
    },
    #[error("Camera source is not open")]
    NotOpen,
}

/// Adapts a webcam to the [`FrameSource`] interface via nokhwa.
///
/// Frames are decoded to packed RGB24 on capture. The stream is
/// unbounded; `next_frame` never returns `None` while the device stays
/// up, so the caller bounds the loop itself.
pub struct CameraSource {
    index: u32,
    camera: Option<Camera>,
    frames_read: usize,
}

impl CameraSource {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            camera: None,
            frames_read: 0,
        }
    }
}

// Safety: CameraSource is only used from a single thread at a time. The
// capture handle is never shared across threads.
unsafe impl Send for CameraSource {}

impl FrameSource for CameraSource {
    fn open(&mut self) -> Result<StreamMetadata, Box<dyn std::error::Error>> {
        let format =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(self.index), format).map_err(|source| {
            CameraSourceError::Open {
                index: self.index,
                source,
            }
        })?;
        camera.open_stream()?;

        let resolution = camera.resolution();
        let metadata = StreamMetadata {
            width: resolution.width(),
            height: resolution.height(),
            fps: camera.frame_rate() as f64,
        };
        log::info!(
            "Opened camera {} at {}x{} @ {:.0} fps",
            self.index,
            metadata.width,
            metadata.height,
            metadata.fps
        );

        self.camera = Some(camera);
        self.frames_read = 0;
        Ok(metadata)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let camera = self.camera.as_mut().ok_or(CameraSourceError::NotOpen)?;

        let buffer = camera.frame()?;
        let decoded = buffer.decode_image::<RgbFormat>()?;
        let (width, height) = decoded.dimensions();

        let frame = Frame::new(decoded.into_raw(), width, height, self.frames_read);
        self.frames_read += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera stream: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_frame_without_open_returns_error() {
        let mut source = CameraSource::new(0);
        assert!(source.next_frame().is_err());
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut source = CameraSource::new(0);
        source.close();
        source.close();
    }
}
