//! Logic Module - Risk Inference Engine
//!
//! Chứa các engines xử lý: validation, normalization, classification,
//! abnormal-vital detection, recommendations.
//!
//! ## Architecture
//! - `vitals/` - Input data model (VitalsRecord, reference ranges)
//! - `features/` - Model input layout + min/max normalizer
//! - `model/` - Trained model inference (ONNX, softmax regression export)
//! - `risk/` - Risk labels + rule-based / model-backed classifiers
//! - `engine/` - Orchestrator (mode latching, reload)

// Core modules
pub mod error;
pub mod config;
pub mod abnormal;
pub mod recommend;

// Modular architecture
pub mod vitals;
pub mod features;
pub mod model;
pub mod risk;
pub mod engine;

#[cfg(test)]
pub(crate) mod testing;
