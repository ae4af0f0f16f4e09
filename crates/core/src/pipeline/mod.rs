pub mod frame_pipeline;
pub mod overlay_renderer;
pub mod pipeline_logger;
pub mod prediction_cache;
pub mod render_state;
pub mod throttled_predictor;
