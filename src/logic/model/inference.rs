//! Inference Backends - ONNX Runtime & softmax regression
//!
//! Load và chạy trained classifier.
//! Backends return raw per-label scores; `ModelPredictor` validates them.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::logic::error::{InferenceError, ModelUnavailableError};
use crate::logic::features::{FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::risk::RISK_LABEL_COUNT;

// ============================================================================
// RISK MODEL TRAIT
// ============================================================================

/// Trait cho trained classifiers (ONNX, exported regression, test doubles)
pub trait RiskModel: Send + Sync {
    /// Short format name for logs and errors
    fn format(&self) -> &'static str;

    /// Per-label scores in `RiskLabel::ALL` order
    fn predict_proba(&self, input: &[f32; FEATURE_COUNT]) -> Result<Vec<f32>, InferenceError>;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX Runtime session wrapper
pub struct OnnxRiskModel {
    // Session::run needs exclusive access
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxRiskModel {
    pub const FORMAT: &'static str = "onnx";

    /// Load ONNX model từ file
    pub fn load(model_path: &Path) -> Result<Self, ModelUnavailableError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| ModelUnavailableError::new(model_path, format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelUnavailableError::new(model_path, format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ModelUnavailableError::new(model_path, format!("Failed to load model: {}", e)))?;

        // Classifier exports often emit (label, probabilities); prefer the latter
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.to_ascii_lowercase().contains("prob"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelUnavailableError::new(model_path, "No output defined"))?;

        log::info!("ONNX model loaded successfully (output: {})", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl RiskModel for OnnxRiskModel {
    fn format(&self) -> &'static str {
        Self::FORMAT
    }

    fn predict_proba(&self, input: &[f32; FEATURE_COUNT]) -> Result<Vec<f32>, InferenceError> {
        let err = |reason: String| InferenceError::new(Self::FORMAT, reason);

        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input.to_vec())
            .map_err(|e| err(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| err(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| err(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| err("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| err(format!("Extract error: {}", e)))?;

        Ok(data.to_vec())
    }
}

// ============================================================================
// SOFTMAX REGRESSION IMPLEMENTATION
// ============================================================================

/// Multinomial logistic regression exported as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxRegressionModel {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// One weight row per label, in `RiskLabel::ALL` order
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl SoftmaxRegressionModel {
    pub const FORMAT: &'static str = "softmax_regression";

    /// Check dimensions against the feature layout
    pub fn validate(&self) -> Result<(), String> {
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_LAYOUT.iter().copied()) {
                return Err(format!("feature names {:?} do not match layout", names));
            }
        }
        if self.weights.len() != RISK_LABEL_COUNT || self.bias.len() != RISK_LABEL_COUNT {
            return Err(format!(
                "expected {} weight rows and biases, got {} / {}",
                RISK_LABEL_COUNT,
                self.weights.len(),
                self.bias.len()
            ));
        }
        if let Some(row) = self.weights.iter().find(|row| row.len() != FEATURE_COUNT) {
            return Err(format!("expected {} weights per row, got {}", FEATURE_COUNT, row.len()));
        }
        if self.weights.iter().flatten().chain(self.bias.iter()).any(|w| !w.is_finite()) {
            return Err("weights must be finite".to_string());
        }
        Ok(())
    }

    pub fn load(model_path: &Path) -> Result<Self, ModelUnavailableError> {
        log::info!("Loading softmax regression model from: {}", model_path.display());

        let content = std::fs::read_to_string(model_path)
            .map_err(|e| ModelUnavailableError::new(model_path, format!("Failed to read model: {}", e)))?;

        let model: SoftmaxRegressionModel = serde_json::from_str(&content)
            .map_err(|e| ModelUnavailableError::new(model_path, format!("Failed to parse model: {}", e)))?;

        model
            .validate()
            .map_err(|reason| ModelUnavailableError::new(model_path, reason))?;

        Ok(model)
    }
}

impl RiskModel for SoftmaxRegressionModel {
    fn format(&self) -> &'static str {
        Self::FORMAT
    }

    fn predict_proba(&self, input: &[f32; FEATURE_COUNT]) -> Result<Vec<f32>, InferenceError> {
        self.validate()
            .map_err(|reason| InferenceError::new(Self::FORMAT, reason))?;

        let logits: Vec<f32> = self
            .weights
            .iter()
            .zip(self.bias.iter())
            .map(|(row, b)| row.iter().zip(input.iter()).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect();

        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f32 = exps.iter().sum();

        Ok(exps.iter().map(|e| e / total).collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
