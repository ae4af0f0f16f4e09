use ndarray::Array4;

use crate::shared::constants::AGE_INPUT_SIZE;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Output of one extraction pass.
pub struct Extraction {
    /// Unscaled crop of the detected region, for the on-screen preview.
    pub roi: Frame,
    /// `(1, 224, 224, 3)` NHWC tensor, bilinear-stretched and scaled to [0,1].
    pub input: Array4<f32>,
}

/// Crop the region out of the frame and build the age-model input.
///
/// The resize is a plain stretch to 224×224 — the model was trained with
/// distorted aspect ratios, so letterboxing here would silently degrade
/// predictions. Pure function: identical frame + region always yields a
/// bit-identical tensor.
pub fn extract(frame: &Frame, region: &Region) -> Extraction {
    let roi = crop(frame, region);
    let input = resize_normalize(&roi, AGE_INPUT_SIZE);
    Extraction { roi, input }
}

/// Copy the region's pixels into a standalone frame.
///
/// `region` is already clamped to the frame, so indexing stays in bounds.
fn crop(frame: &Frame, region: &Region) -> Frame {
    let src = frame.as_ndarray();
    let x1 = region.x as usize;
    let y1 = region.y as usize;
    let w = region.width as usize;
    let h = region.height as usize;

    let mut data = Vec::with_capacity(w * h * 3);
    for row in y1..y1 + h {
        for col in x1..x1 + w {
            for c in 0..3 {
                data.push(src[[row, col, c]]);
            }
        }
    }

    Frame::new(data, region.width, region.height, 0)
}

/// Bilinear stretch-resize to `size × size`, dividing channels by 255.
fn resize_normalize(roi: &Frame, size: u32) -> Array4<f32> {
    let src = roi.as_ndarray();
    let src_w = roi.width() as f32;
    let src_h = roi.height() as f32;
    let s = size as usize;

    let mut tensor = Array4::<f32>::zeros((1, s, s, 3));

    for y in 0..s {
        let sy = ((y as f32 + 0.5) * src_h / size as f32 - 0.5).clamp(0.0, src_h - 1.0);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(roi.height() as usize - 1);
        let fy = sy - y0 as f32;

        for x in 0..s {
            let sx = ((x as f32 + 0.5) * src_w / size as f32 - 0.5).clamp(0.0, src_w - 1.0);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(roi.width() as usize - 1);
            let fx = sx - x0 as f32;

            for c in 0..3 {
                let tl = src[[y0, x0, c]] as f32;
                let tr = src[[y0, x1, c]] as f32;
                let bl = src[[y1, x0, c]] as f32;
                let br = src[[y1, x1, c]] as f32;

                let top = tl + (tr - tl) * fx;
                let bottom = bl + (br - bl) * fx;
                tensor[[0, y, x, c]] = (top + (bottom - top) * fy) / 255.0;
            }
        }
    }

    tensor
}
