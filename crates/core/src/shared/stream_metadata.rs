/// Properties of an opened frame source.
///
/// Still images are represented as a single-frame stream with `fps = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_metadata() {
        let meta = StreamMetadata {
            width: 854,
            height: 480,
            fps: 30.0,
        };
        assert_eq!(meta.width, 854);
        assert_eq!(meta.fps, 30.0);
    }

    #[test]
    fn test_image_metadata_has_zero_fps() {
        let meta = StreamMetadata {
            width: 800,
            height: 600,
            fps: 0.0,
        };
        assert_eq!(meta.fps, 0.0);
    }
}
