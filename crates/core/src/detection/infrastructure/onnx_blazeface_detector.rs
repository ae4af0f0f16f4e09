/// BlazeFace face detector using ONNX Runtime via `ort`.
///
/// Decodes anchor-relative box regressions into normalized center-based
/// bounding boxes, filters by confidence, applies NMS, and returns the
/// survivors ordered confidence-descending.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::detection::{BoundingBox, Detection};
use crate::shared::frame::Frame;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f32 = 0.3;

/// BlazeFace model variant.
///
/// The short-range model is tuned for faces within ~2m of the camera
/// (the webcam case); the full-range model trades speed for reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelSize {
    Short,
    Full,
}

impl ModelSize {
    /// Square input resolution the variant was trained with.
    pub fn input_size(&self) -> u32 {
        match self {
            ModelSize::Short => 128,
            ModelSize::Full => 192,
        }
    }

    /// `(stride, anchors_per_cell)` pairs for anchor generation.
    fn anchor_layout(&self) -> &'static [(usize, usize)] {
        match self {
            ModelSize::Short => &[(8, 2), (16, 6)],
            ModelSize::Full => &[(4, 1)],
        }
    }

    fn anchor_count(&self) -> usize {
        self.anchor_layout()
            .iter()
            .map(|&(stride, num)| {
                let grid = self.input_size() as usize / stride;
                grid * grid * num
            })
            .sum()
    }
}

/// Detector configuration, all values reachable from the CLI.
#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    /// Minimum confidence for a detection to be reported.
    pub confidence: f32,
    /// Flip detections horizontally (selfie-mode camera input).
    pub mirror_input: bool,
    pub model_size: ModelSize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence: crate::shared::constants::DEFAULT_CONFIDENCE,
            mirror_input: false,
            model_size: ModelSize::Short,
        }
    }
}

/// BlazeFace detector backed by an ONNX Runtime session.
pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    config: DetectorConfig,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    /// Load a BlazeFace ONNX model matching `config.model_size`.
    pub fn new(model_path: &Path, config: DetectorConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        let anchors = generate_anchors(config.model_size);
        Ok(Self {
            session,
            config,
            anchors,
        })
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let input_size = self.config.model_size.input_size();

        // 1. Preprocess: resize to the model's square input, [0,1] NCHW
        let input_tensor = preprocess(frame, input_size);

        // 2. Inference
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // BlazeFace outputs two tensors:
        // - regressors: [1, N, 16] (box deltas + keypoints)
        // - classificators: [1, N, 1] (confidence scores)
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }

        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        // 3. Decode anchor boxes + filter by confidence. Boxes stay in
        //    normalized [0,1] units; pixel mapping is the Region's job.
        let mut candidates = Vec::new();
        let num_anchors = self.anchors.len().min(score_data.len());

        for (i, &raw_score) in score_data.iter().enumerate().take(num_anchors) {
            let score = sigmoid(raw_score);
            if score < self.config.confidence {
                continue;
            }

            let anchor = &self.anchors[i];
            let reg_offset = i * 16;
            if reg_offset + 4 > reg_data.len() {
                break;
            }

            let bounding_box = BoundingBox {
                x_center: anchor[0] + reg_data[reg_offset] / input_size as f32,
                y_center: anchor[1] + reg_data[reg_offset + 1] / input_size as f32,
                width: reg_data[reg_offset + 2] / input_size as f32,
                height: reg_data[reg_offset + 3] / input_size as f32,
            };

            candidates.push(Detection {
                bounding_box,
                confidence: score,
            });
        }

        // 4. NMS (output stays confidence-descending)
        let mut detections = nms(&mut candidates, NMS_IOU_THRESH);

        // 5. Selfie mirroring
        if self.config.mirror_input {
            for d in &mut detections {
                d.bounding_box = d.bounding_box.mirrored();
            }
        }

        Ok(detections)
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Resize frame to `size × size` and normalize to [0,1] NCHW float32.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));

    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    tensor
}

// ---------------------------------------------------------------------------
// Anchor generation
// ---------------------------------------------------------------------------

/// Generate anchor centers for a BlazeFace variant.
///
/// The short-range model uses 16×16 and 8×8 feature maps with 2 and 6
/// anchors per cell (896 total); the full-range model uses a single
/// 48×48 map with one anchor per cell (2304 total).
fn generate_anchors(model_size: ModelSize) -> Vec<[f32; 2]> {
    let mut anchors = Vec::with_capacity(model_size.anchor_count());

    for &(stride, num) in model_size.anchor_layout() {
        let grid_size = model_size.input_size() as usize / stride;
        for y in 0..grid_size {
            for x in 0..grid_size {
                let cx = (x as f32 + 0.5) / grid_size as f32;
                let cy = (y as f32 + 0.5) / grid_size as f32;
                for _ in 0..num {
                    anchors.push([cx, cy]);
                }
            }
        }
    }

    anchors
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

fn nms(candidates: &mut [Detection], iou_thresh: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; candidates.len()];

    for i in 0..candidates.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(candidates[i]);
        for j in (i + 1)..candidates.len() {
            if suppressed[j] {
                continue;
            }
            if box_iou(&candidates[i].bounding_box, &candidates[j].bounding_box) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}

fn box_iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let (ax1, ay1, ax2, ay2) = corners(a);
    let (bx1, by1, bx2, by2) = corners(b);

    let x1 = ax1.max(bx1);
    let y1 = ay1.max(by1);
    let x2 = ax2.min(bx2);
    let y2 = ay2.min(by2);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = a.width * a.height;
    let area_b = b.width * b.height;
    inter / (area_a + area_b - inter)
}

fn corners(b: &BoundingBox) -> (f32, f32, f32, f32) {
    (
        b.x_center - b.width / 2.0,
        b.y_center - b.height / 2.0,
        b.x_center + b.width / 2.0,
        b.y_center + b.height / 2.0,
    )
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
