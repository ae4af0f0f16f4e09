use crate::pipeline::throttled_predictor::AgeEstimate;
use crate::shared::detection::Detection;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Everything the renderer needs for one frame.
///
/// `NoFace` covers both "the detector found nothing" and "the detected
/// box had no usable area inside the frame" — the two are rendered
/// identically.
#[derive(Debug)]
pub enum RenderState {
    NoFace,
    Face(FaceRender),
}

#[derive(Debug)]
pub struct FaceRender {
    pub detection: Detection,
    pub region: Region,
    /// Unscaled crop for the region-of-interest preview surface.
    pub roi: Frame,
    pub estimate: AgeEstimate,
}

impl RenderState {
    pub fn face(&self) -> Option<&FaceRender> {
        match self {
            RenderState::Face(f) => Some(f),
            RenderState::NoFace => None,
        }
    }
}
