/// A face bounding box in normalized `[0,1]` coordinates, center-based.
///
/// This is the detector's native output format; conversion to pixel space
/// happens in [`crate::shared::region::Region::from_detection`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x_center: f32,
    pub y_center: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Mirror the box horizontally, for selfie-mode input.
    pub fn mirrored(self) -> Self {
        Self {
            x_center: 1.0 - self.x_center,
            ..self
        }
    }
}

/// One face detection: normalized bounding box plus confidence score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bounding_box: BoundingBox,
    pub confidence: f32,
}
