use ndarray::Array4;

/// Domain interface for the age model.
///
/// `predict` takes the extractor's `(1, 224, 224, 3)` normalized tensor and
/// returns the raw scalar output — possibly non-finite; mapping to a
/// displayable value is the throttled predictor's job. `is_ready` must be
/// checked before `predict`: a predictor whose weights never loaded stays
/// not-ready for its whole lifetime rather than failing construction.
pub trait AgePredictor: Send {
    fn is_ready(&self) -> bool;

    fn predict(&mut self, input: &Array4<f32>) -> Result<f32, Box<dyn std::error::Error>>;
}
