use std::time::{Duration, Instant};

use ndarray::Array4;

use crate::pipeline::prediction_cache::{Prediction, PredictionCache};
use crate::prediction::domain::age_predictor::AgePredictor;

/// What the pipeline knows about the age this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgeEstimate {
    /// The model has not finished loading; no inference was attempted.
    Loading,
    Predicted(Prediction),
}

/// Rate-limits age inference against a fast frame stream.
///
/// Camera frames arrive at 30+ Hz but a fresh prediction is only wanted
/// every `interval`; in between, the cached value is replayed without
/// touching the model. The underlying predictor is invoked at most once
/// per interval.
pub struct ThrottledPredictor {
    inner: Box<dyn AgePredictor>,
    cache: PredictionCache,
    interval: Duration,
}

impl ThrottledPredictor {
    pub fn new(inner: Box<dyn AgePredictor>, interval: Duration) -> Self {
        Self {
            inner,
            cache: PredictionCache::new(),
            interval,
        }
    }

    pub fn estimate(&mut self, input: &Array4<f32>) -> Result<AgeEstimate, Box<dyn std::error::Error>> {
        self.estimate_at(input, Instant::now())
    }

    /// Clock-injectable variant of [`estimate`](Self::estimate).
    pub fn estimate_at(
        &mut self,
        input: &Array4<f32>,
        now: Instant,
    ) -> Result<AgeEstimate, Box<dyn std::error::Error>> {
        if !self.inner.is_ready() {
            return Ok(AgeEstimate::Loading);
        }

        if self.cache.is_fresh(now, self.interval) {
            // The cache always holds a value once a run has happened.
            if let Some(value) = self.cache.value() {
                return Ok(AgeEstimate::Predicted(value));
            }
        }

        let raw = self.inner.predict(input)?;
        let prediction = if raw.is_finite() {
            Prediction::Age(raw.round().max(0.0) as u32)
        } else {
            Prediction::Unavailable
        };
        self.cache.store(prediction, now);
        Ok(AgeEstimate::Predicted(prediction))
    }
}
