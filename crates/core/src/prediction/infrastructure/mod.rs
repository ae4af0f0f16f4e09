pub mod onnx_age_predictor;
