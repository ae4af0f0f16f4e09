//! Face detection and age estimation for camera frames.
//!
//! The crate is organized as domain interfaces (`FaceDetector`,
//! `AgePredictor`, `FrameSource`) with ONNX/camera infrastructure behind
//! them, and a single [`pipeline::frame_pipeline::FramePipeline`] that runs
//! one detection → extraction → throttled-prediction pass per frame.

pub mod detection;
pub mod pipeline;
pub mod prediction;
pub mod shared;
pub mod video;
