use std::path::PathBuf;

use crate::shared::frame::Frame;
use crate::shared::stream_metadata::StreamMetadata;
use crate::video::domain::frame_source::FrameSource;

/// Adapts a single image file to the [`FrameSource`] interface.
///
/// Treats the image as a one-frame stream with `fps=0`, so the pipeline
/// processes still images and camera streams uniformly.
pub struct ImageFileSource {
    path: PathBuf,
    frame: Option<Frame>,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frame: None,
        }
    }
}

impl FrameSource for ImageFileSource {
    fn open(&mut self) -> Result<StreamMetadata, Box<dyn std::error::Error>> {
        let img = image::open(&self.path)?.to_rgb8();
        let (width, height) = img.dimensions();

        self.frame = Some(Frame::new(img.into_raw(), width, height, 0));
        Ok(StreamMetadata {
            width,
            height,
            fps: 0.0,
        })
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        Ok(self.frame.take())
    }

    fn close(&mut self) {
        self.frame = None;
    }
}
