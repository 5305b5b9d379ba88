//! Features Module - Model Input Preparation
//!
//! Tách logic chuẩn hoá features khỏi inference.
//! Layout, vector and min/max normalizer for the model-backed path.

pub mod layout;
pub mod vector;
pub mod normalizer;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{feature_name, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, SCALED_FEATURE_COUNT};
pub use vector::NormalizedFeatureVector;
pub use normalizer::{FeatureNormalizer, MinMaxScaler, ScalerArtifact};
