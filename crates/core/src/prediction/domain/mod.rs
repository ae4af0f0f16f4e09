pub mod age_predictor;
pub mod region_extractor;
