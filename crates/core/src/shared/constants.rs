pub const BLAZEFACE_SHORT_MODEL_NAME: &str = "blazeface_short_range.onnx";
pub const BLAZEFACE_SHORT_MODEL_URL: &str =
    "https://github.com/agecam/agecam/releases/download/v0.1.0/blazeface_short_range.onnx";

pub const BLAZEFACE_FULL_MODEL_NAME: &str = "blazeface_full_range.onnx";
pub const BLAZEFACE_FULL_MODEL_URL: &str =
    "https://github.com/agecam/agecam/releases/download/v0.1.0/blazeface_full_range.onnx";

pub const AGE_MODEL_NAME: &str = "age_regression_224.onnx";
pub const AGE_MODEL_URL: &str =
    "https://github.com/agecam/agecam/releases/download/v0.1.0/age_regression_224.onnx";

/// Input edge length the age model was trained with.
pub const AGE_INPUT_SIZE: u32 = 224;

/// Default minimum detection confidence.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Default minimum time between age-model invocations.
pub const DEFAULT_PREDICTION_INTERVAL_MS: u64 = 500;
