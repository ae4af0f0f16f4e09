use std::path::Path;

use ndarray::Array4;

use crate::prediction::domain::age_predictor::AgePredictor;

/// Age regression model backed by an ONNX Runtime session.
///
/// A failed load is not fatal: the predictor is constructed with no
/// session and reports `is_ready() == false`, so the pipeline renders
/// "loading model" instead of crashing.
pub struct OnnxAgePredictor {
    session: Option<ort::session::Session>,
}

impl OnnxAgePredictor {
    /// Predictor with no model at all. Reports not-ready forever; used
    /// when the model could not be resolved.
    pub fn offline() -> Self {
        Self { session: None }
    }

    /// Load the age model, logging and degrading to not-ready on failure.
    pub fn new(model_path: &Path) -> Self {
        match ort::session::Session::builder().and_then(|mut b| b.commit_from_file(model_path)) {
            Ok(session) => {
                log::info!("Age model loaded from {}", model_path.display());
                Self {
                    session: Some(session),
                }
            }
            Err(e) => {
                log::error!("Failed to load age model from {}: {e}", model_path.display());
                Self { session: None }
            }
        }
    }
}

impl AgePredictor for OnnxAgePredictor {
    fn is_ready(&self) -> bool {
        self.session.is_some()
    }

    fn predict(&mut self, input: &Array4<f32>) -> Result<f32, Box<dyn std::error::Error>> {
        let session = self
            .session
            .as_mut()
            .ok_or("age model is not loaded")?;

        let input_value = ort::value::Tensor::from_array(input.clone())?;
        let outputs = session.run(ort::inputs![input_value])?;

        // The model emits a single scalar, or an array whose first
        // element is the scalar.
        let output = outputs[0].try_extract_array::<f32>()?;
        let value = output
            .iter()
            .next()
            .copied()
            .ok_or("age model produced an empty output")?;

        Ok(value)
    }
}
