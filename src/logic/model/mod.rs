//! Model Module - Trained classifier inference
//!
//! Tách logic inference khỏi classification.
//! Dễ dàng swap model format (ONNX, exported regression).

pub mod inference;
pub mod artifacts;
pub mod predictor;

// Re-export common types
pub use inference::{OnnxRiskModel, RiskModel, SoftmaxRegressionModel};
pub use artifacts::{load_model, sha256_hex, ArtifactInfo};
pub use predictor::ModelPredictor;
