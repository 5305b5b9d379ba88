//! Model Predictor
//!
//! Wraps a loaded `RiskModel`: NormalizedFeatureVector -> label + distribution.
//! Only constructed when the model artifact loaded successfully.

use std::path::Path;

use super::artifacts::{load_model, ArtifactInfo};
use super::inference::RiskModel;
use crate::logic::error::{InferenceError, ModelUnavailableError};
use crate::logic::features::NormalizedFeatureVector;
use crate::logic::risk::{RiskDistribution, RiskLabel, RISK_LABEL_COUNT};

/// Accepted deviation of model output from a unit sum
pub const OUTPUT_SUM_TOLERANCE: f32 = 1e-2;

pub struct ModelPredictor {
    model: Box<dyn RiskModel>,
    info: Option<ArtifactInfo>,
}

impl std::fmt::Debug for ModelPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPredictor")
            .field("format", &self.model.format())
            .field("info", &self.info)
            .finish()
    }
}

impl ModelPredictor {
    /// Wrap an in-memory model (no artifact metadata)
    pub fn new(model: Box<dyn RiskModel>) -> Self {
        Self { model, info: None }
    }

    /// Load from an artifact file
    pub fn load(model_path: &Path) -> Result<Self, ModelUnavailableError> {
        let (model, info) = load_model(model_path)?;
        Ok(Self { model, info: Some(info) })
    }

    pub fn format(&self) -> &'static str {
        self.model.format()
    }

    pub fn info(&self) -> Option<&ArtifactInfo> {
        self.info.as_ref()
    }

    /// Predict label and distribution
    pub fn predict(&self, features: &NormalizedFeatureVector) -> Result<(RiskLabel, RiskDistribution), InferenceError> {
        let err = |reason: String| InferenceError::new(self.model.format(), reason);

        features
            .validate()
            .map_err(|e| err(e.to_string()))?;

        let raw = self.model.predict_proba(features.as_array())?;

        if raw.len() != RISK_LABEL_COUNT {
            return Err(err(format!(
                "Shape mismatch: expected {} probabilities, got {}",
                RISK_LABEL_COUNT,
                raw.len()
            )));
        }

        if raw.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(err(format!("Output is not a probability vector: {:?}", raw)));
        }

        let total: f32 = raw.iter().sum();
        if (total - 1.0).abs() > OUTPUT_SUM_TOLERANCE {
            return Err(err(format!("Output sums to {} instead of 1", total)));
        }

        let distribution = RiskDistribution::new(raw[0] / total, raw[1] / total, raw[2] / total);
        let label = distribution.argmax();

        log::debug!(
            "Model prediction: {} (low {:.3}, medium {:.3}, high {:.3})",
            label,
            distribution.low,
            distribution.medium,
            distribution.high
        );

        Ok((label, distribution))
    }
}

// ============================================================================
// TESTS
// ============================================================================
