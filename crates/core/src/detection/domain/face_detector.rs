use crate::shared::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Implementations return detections ordered confidence-descending; the
/// pipeline consumes only the first. An empty result is the normal
/// "no face" state, not an error. Implementations may be stateful,
/// hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
