use std::time::{Duration, Instant};

/// A displayable age result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prediction {
    /// Rounded age estimate.
    Age(u32),
    /// The model produced a non-finite value; not a pipeline failure.
    Unavailable,
}

/// Last computed prediction plus the time it was computed.
///
/// Owned by the throttled predictor and alive for the pipeline's
/// lifetime.
#[derive(Debug, Default)]
pub struct PredictionCache {
    value: Option<Prediction>,
    last_run: Option<Instant>,
}

impl PredictionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the cached value is still within its validity window.
    /// An empty cache is never fresh.
    pub fn is_fresh(&self, now: Instant, interval: Duration) -> bool {
        self.last_run
            .is_some_and(|t| now.saturating_duration_since(t) < interval)
    }

    pub fn store(&mut self, value: Prediction, now: Instant) {
        self.value = Some(value);
        self.last_run = Some(now);
    }

    pub fn value(&self) -> Option<Prediction> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(500);

    #[test]
    fn test_empty_cache_is_never_fresh() {
        let cache = PredictionCache::new();
        assert!(!cache.is_fresh(Instant::now(), INTERVAL));
        assert_eq!(cache.value(), None);
    }

    #[test]
    fn test_fresh_within_interval() {
        let mut cache = PredictionCache::new();
        let t = Instant::now();
        cache.store(Prediction::Age(30), t);
        assert!(cache.is_fresh(t + Duration::from_millis(100), INTERVAL));
        assert_eq!(cache.value(), Some(Prediction::Age(30)));
    }

    #[test]
    fn test_stale_at_interval_boundary() {
        let mut cache = PredictionCache::new();
        let t = Instant::now();
        cache.store(Prediction::Age(30), t);
        assert!(!cache.is_fresh(t + INTERVAL, INTERVAL));
    }

    #[test]
    fn test_store_overwrites() {
        let mut cache = PredictionCache::new();
        let t = Instant::now();
        cache.store(Prediction::Age(30), t);
        cache.store(Prediction::Unavailable, t + Duration::from_secs(1));
        assert_eq!(cache.value(), Some(Prediction::Unavailable));
    }

    #[test]
    fn test_now_before_last_run_counts_as_fresh() {
        // Clock oddities must not panic; saturating elapsed = 0 < interval.
        let mut cache = PredictionCache::new();
        let t = Instant::now();
        cache.store(Prediction::Age(30), t + Duration::from_secs(1));
        assert!(cache.is_fresh(t, INTERVAL));
    }
}
