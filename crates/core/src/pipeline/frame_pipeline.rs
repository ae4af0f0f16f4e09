use std::time::Instant;

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::render_state::{FaceRender, RenderState};
use crate::pipeline::throttled_predictor::ThrottledPredictor;
use crate::prediction::domain::region_extractor;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Runs one full detection → extraction → prediction pass per frame.
///
/// Owns all per-stream state (the throttled predictor and its cache);
/// independent pipelines never share anything, so tests and multiple
/// streams can each hold their own instance. Frames are processed
/// strictly sequentially — the caller drives the loop and decides what
/// to do with each [`RenderState`].
pub struct FramePipeline {
    detector: Box<dyn FaceDetector>,
    predictor: ThrottledPredictor,
    logger: Box<dyn PipelineLogger>,
    had_face: Option<bool>,
}

impl FramePipeline {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        predictor: ThrottledPredictor,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            detector,
            predictor,
            logger,
            had_face: None,
        }
    }

    pub fn process_frame(&mut self, frame: &Frame) -> Result<RenderState, Box<dyn std::error::Error>> {
        self.process_frame_at(frame, Instant::now())
    }

    /// Clock-injectable variant of [`process_frame`](Self::process_frame).
    ///
    /// Only the first (highest-confidence) detection is considered; a
    /// detection whose clamped region has no area is treated as no face.
    /// The age model is never invoked without a usable input tensor.
    pub fn process_frame_at(
        &mut self,
        frame: &Frame,
        now: Instant,
    ) -> Result<RenderState, Box<dyn std::error::Error>> {
        let state = self.run_stages(frame, now)?;
        self.note_presence(&state);
        self.logger.frame_done(frame.index());
        Ok(state)
    }

    fn run_stages(
        &mut self,
        frame: &Frame,
        now: Instant,
    ) -> Result<RenderState, Box<dyn std::error::Error>> {
        let t = Instant::now();
        let detections = self.detector.detect(frame)?;
        self.logger
            .timing("detect", t.elapsed().as_secs_f64() * 1000.0);
        self.logger.metric("detections", detections.len() as f64);

        let Some(detection) = detections.first().copied() else {
            return Ok(RenderState::NoFace);
        };

        let Some(region) = Region::from_detection(&detection, frame.width(), frame.height())
        else {
            return Ok(RenderState::NoFace);
        };

        let t = Instant::now();
        let extraction = region_extractor::extract(frame, &region);
        self.logger
            .timing("extract", t.elapsed().as_secs_f64() * 1000.0);

        let t = Instant::now();
        let estimate = self.predictor.estimate_at(&extraction.input, now)?;
        self.logger
            .timing("predict", t.elapsed().as_secs_f64() * 1000.0);

        Ok(RenderState::Face(FaceRender {
            detection,
            region,
            roi: extraction.roi,
            estimate,
        }))
    }

    /// Report face appearance/disappearance once per transition instead
    /// of once per frame.
    fn note_presence(&mut self, state: &RenderState) {
        let has_face = state.face().is_some();
        if self.had_face != Some(has_face) {
            self.logger.info(if has_face {
                "Face in view"
            } else {
                "No face in view"
            });
            self.had_face = Some(has_face);
        }
    }

    /// Emit the logger's end-of-run summary.
    pub fn finish(&self) {
        self.logger.summary();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::pipeline::prediction_cache::Prediction;
    use crate::pipeline::throttled_predictor::AgeEstimate;
    use crate::prediction::domain::age_predictor::AgePredictor;
    use crate::shared::detection::{BoundingBox, Detection};
    use ndarray::Array4;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct StubDetector {
        results: Vec<Vec<Detection>>,
        call: usize,
    }

    impl StubDetector {
        fn always(detections: Vec<Detection>) -> Self {
            Self {
                results: vec![detections],
                call: 0,
            }
        }

        fn sequence(results: Vec<Vec<Detection>>) -> Self {
            Self { results, call: 0 }
        }
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            let result = self.results[self.call % self.results.len()].clone();
            self.call += 1;
            Ok(result)
        }
    }

    struct CountingPredictor {
        ready: bool,
        output: f32,
        calls: Arc<AtomicUsize>,
    }

    impl AgePredictor for CountingPredictor {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn predict(&mut self, _input: &Array4<f32>) -> Result<f32, Box<dyn std::error::Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output)
        }
    }

    fn detection(x_center: f32, y_center: f32, size: f32, confidence: f32) -> Detection {
        Detection {
            bounding_box: BoundingBox {
                x_center,
                y_center,
                width: size,
                height: size,
            },
            confidence,
        }
    }

    fn frame(index: usize) -> Frame {
        Frame::new(vec![90u8; 64 * 48 * 3], 64, 48, index)
    }

    fn pipeline_with(
        detector: StubDetector,
        ready: bool,
        output: f32,
    ) -> (FramePipeline, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let predictor = CountingPredictor {
            ready,
            output,
            calls: calls.clone(),
        };
        let pipeline = FramePipeline::new(
            Box::new(detector),
            ThrottledPredictor::new(Box::new(predictor), Duration::from_millis(500)),
            Box::new(NullPipelineLogger),
        );
        (pipeline, calls)
    }

    #[test]
    fn test_no_detections_yields_no_face_without_inference() {
        let (mut pipeline, calls) = pipeline_with(StubDetector::always(vec![]), true, 30.0);

        let state = pipeline.process_frame_at(&frame(0), Instant::now()).unwrap();

        assert!(matches!(state, RenderState::NoFace));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_face_yields_region_and_age() {
        let det = detection(0.5, 0.5, 0.5, 0.9);
        let (mut pipeline, calls) = pipeline_with(StubDetector::always(vec![det]), true, 27.4);

        let state = pipeline.process_frame_at(&frame(0), Instant::now()).unwrap();

        let face = state.face().expect("expected a face");
        assert_eq!(face.estimate, AgeEstimate::Predicted(Prediction::Age(27)));
        assert_eq!(face.region.width, 32); // 0.5 * 64
        assert_eq!(face.region.height, 24); // 0.5 * 48
        assert_eq!(face.roi.width(), 32);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_only_first_detection_is_used() {
        let primary = detection(0.5, 0.5, 0.5, 0.9);
        let secondary = detection(0.2, 0.2, 0.2, 0.6);
        let (mut pipeline, _) =
            pipeline_with(StubDetector::always(vec![primary, secondary]), true, 30.0);

        let state = pipeline.process_frame_at(&frame(0), Instant::now()).unwrap();

        let face = state.face().unwrap();
        assert_eq!(face.detection, primary);
    }

    #[test]
    fn test_degenerate_region_is_no_face_and_skips_model() {
        // Box entirely left of the frame
        let det = detection(-0.5, 0.5, 0.2, 0.2);
        let (mut pipeline, calls) = pipeline_with(StubDetector::always(vec![det]), true, 30.0);

        let state = pipeline.process_frame_at(&frame(0), Instant::now()).unwrap();

        assert!(matches!(state, RenderState::NoFace));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_model_not_loaded_renders_loading_and_skips_model() {
        let det = detection(0.5, 0.5, 0.5, 0.9);
        let (mut pipeline, calls) = pipeline_with(StubDetector::always(vec![det]), false, 30.0);

        let state = pipeline.process_frame_at(&frame(0), Instant::now()).unwrap();

        assert_eq!(state.face().unwrap().estimate, AgeEstimate::Loading);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_throttling_holds_across_frames() {
        let det = detection(0.5, 0.5, 0.5, 0.9);
        let (mut pipeline, calls) = pipeline_with(StubDetector::always(vec![det]), true, 30.0);
        let t = Instant::now();

        pipeline.process_frame_at(&frame(0), t).unwrap();
        pipeline
            .process_frame_at(&frame(1), t + Duration::from_millis(100))
            .unwrap();
        pipeline
            .process_frame_at(&frame(2), t + Duration::from_millis(600))
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_nan_model_output_renders_unavailable() {
        let det = detection(0.5, 0.5, 0.5, 0.9);
        let (mut pipeline, _) = pipeline_with(StubDetector::always(vec![det]), true, f32::NAN);

        let state = pipeline.process_frame_at(&frame(0), Instant::now()).unwrap();

        assert_eq!(
            state.face().unwrap().estimate,
            AgeEstimate::Predicted(Prediction::Unavailable)
        );
    }

    struct RecordingLogger {
        messages: Arc<std::sync::Mutex<Vec<String>>>,
    }

    impl PipelineLogger for RecordingLogger {
        fn frame_done(&mut self, _index: usize) {}
        fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
        fn metric(&mut self, _name: &str, _value: f64) {}
        fn info(&mut self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_presence_logged_once_per_transition() {
        let det = detection(0.5, 0.5, 0.5, 0.9);
        let detector = StubDetector::sequence(vec![vec![det], vec![det], vec![], vec![]]);
        let messages = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut pipeline = FramePipeline::new(
            Box::new(detector),
            ThrottledPredictor::new(
                Box::new(CountingPredictor {
                    ready: true,
                    output: 30.0,
                    calls: Arc::new(AtomicUsize::new(0)),
                }),
                Duration::from_millis(500),
            ),
            Box::new(RecordingLogger {
                messages: messages.clone(),
            }),
        );
        let t = Instant::now();

        for i in 0..4 {
            pipeline
                .process_frame_at(&frame(i), t + Duration::from_millis(i as u64 * 33))
                .unwrap();
        }

        assert_eq!(
            *messages.lock().unwrap(),
            vec!["Face in view".to_string(), "No face in view".to_string()]
        );
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Err("detector backend died".into())
        }
    }

    #[test]
    fn test_detector_error_propagates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pipeline = FramePipeline::new(
            Box::new(FailingDetector),
            ThrottledPredictor::new(
                Box::new(CountingPredictor {
                    ready: true,
                    output: 30.0,
                    calls: calls.clone(),
                }),
                Duration::from_millis(500),
            ),
            Box::new(NullPipelineLogger),
        );

        assert!(pipeline.process_frame_at(&frame(0), Instant::now()).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
