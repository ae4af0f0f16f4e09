use crate::shared::detection::Detection;

/// A pixel-space crop rectangle derived from a normalized detection,
/// always clamped to the frame bounds.
///
/// Construction goes through [`Region::from_detection`], which returns
/// `None` when the clamped rectangle has zero area — a face whose box
/// falls entirely outside the frame is treated as "no usable region".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Convert a normalized bounding box to pixel coordinates against a
    /// `frame_width × frame_height` frame and clamp it to the frame.
    pub fn from_detection(detection: &Detection, frame_width: u32, frame_height: u32) -> Option<Self> {
        let bb = detection.bounding_box;
        let fw = frame_width as f32;
        let fh = frame_height as f32;

        let w = bb.width * fw;
        let h = bb.height * fh;
        let x1 = bb.x_center * fw - w / 2.0;
        let y1 = bb.y_center * fh - h / 2.0;
        let x2 = x1 + w;
        let y2 = y1 + h;

        let cx1 = x1.max(0.0).min(fw);
        let cy1 = y1.max(0.0).min(fh);
        let cx2 = x2.max(0.0).min(fw);
        let cy2 = y2.max(0.0).min(fh);

        let width = (cx2 - cx1).round() as u32;
        let height = (cy2 - cy1).round() as u32;
        if width == 0 || height == 0 {
            return None;
        }

        let x = (cx1.round() as u32).min(frame_width - width);
        let y = (cy1.round() as u32).min(frame_height - height);
        Some(Self {
            x,
            y,
            width,
            height,
        })
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::detection::BoundingBox;
    use rstest::rstest;

    fn detection(x_center: f32, y_center: f32, width: f32, height: f32) -> Detection {
        Detection {
            bounding_box: BoundingBox {
                x_center,
                y_center,
                width,
                height,
            },
            confidence: 0.9,
        }
    }

    #[test]
    fn test_interior_box_matches_rounded_dimensions() {
        // 0.25 * 640 = 160 wide, 0.5 * 480 = 240 tall, centered
        let r = Region::from_detection(&detection(0.5, 0.5, 0.25, 0.5), 640, 480).unwrap();
        assert_eq!(r.width, 160);
        assert_eq!(r.height, 240);
        assert_eq!(r.x, 240); // 320 - 80
        assert_eq!(r.y, 120); // 240 - 120
    }

    #[test]
    fn test_box_clipped_at_left_edge() {
        // center at x=0.05 with width 0.2 extends 0.05 past the left edge
        let r = Region::from_detection(&detection(0.05, 0.5, 0.2, 0.2), 100, 100).unwrap();
        assert_eq!(r.x, 0);
        assert_eq!(r.width, 15); // visible part only
    }

    #[test]
    fn test_box_clipped_at_bottom_right_corner() {
        let r = Region::from_detection(&detection(0.95, 0.95, 0.2, 0.2), 100, 100).unwrap();
        assert_eq!(r.x + r.width, 100);
        assert_eq!(r.y + r.height, 100);
        assert_eq!(r.width, 15);
        assert_eq!(r.height, 15);
    }

    #[rstest]
    #[case::fully_left(detection(-0.5, 0.5, 0.2, 0.2))]
    #[case::fully_right(detection(1.5, 0.5, 0.2, 0.2))]
    #[case::fully_above(detection(0.5, -0.5, 0.2, 0.2))]
    #[case::fully_below(detection(0.5, 1.5, 0.2, 0.2))]
    #[case::zero_width(detection(0.5, 0.5, 0.0, 0.2))]
    #[case::zero_height(detection(0.5, 0.5, 0.2, 0.0))]
    fn test_degenerate_regions_yield_none(#[case] det: Detection) {
        assert!(Region::from_detection(&det, 640, 480).is_none());
    }

    #[test]
    fn test_full_frame_box() {
        let r = Region::from_detection(&detection(0.5, 0.5, 1.0, 1.0), 320, 240).unwrap();
        assert_eq!(r, Region { x: 0, y: 0, width: 320, height: 240 });
    }

    #[test]
    fn test_region_never_exceeds_frame() {
        // Oversized box centered near a corner must stay inside the frame.
        let r = Region::from_detection(&detection(0.9, 0.1, 0.6, 0.6), 200, 150).unwrap();
        assert!(r.x + r.width <= 200);
        assert!(r.y + r.height <= 150);
    }

    #[test]
    fn test_tiny_but_nonzero_box() {
        let r = Region::from_detection(&detection(0.5, 0.5, 0.01, 0.01), 640, 480).unwrap();
        assert!(r.width >= 1);
        assert!(r.height >= 1);
    }

    #[test]
    fn test_area() {
        let r = Region { x: 0, y: 0, width: 30, height: 20 };
        assert_eq!(r.area(), 600);
    }
}
