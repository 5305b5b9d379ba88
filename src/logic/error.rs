//! Error Types
//!
//! Error taxonomy of the risk engine.
//! Startup-time artifact errors are absorbed into the engine mode;
//! per-request errors are surfaced through `AssessmentError`.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// VALIDATION
// ============================================================================

/// Why a raw vital was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationReason {
    Missing,
    NonNumeric { raw: String },
    OutOfRange { value: f32, min: f32, max: f32 },
    Inconsistent { detail: String },
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationReason::Missing => write!(f, "value is missing"),
            ValidationReason::NonNumeric { raw } => write!(f, "value `{}` is not numeric", raw),
            ValidationReason::OutOfRange { value, min, max } => {
                write!(f, "value {} is outside the plausible range {} - {}", value, min, max)
            }
            ValidationReason::Inconsistent { detail } => write!(f, "{}", detail),
        }
    }
}

/// Malformed or implausible input; assessment is not attempted
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, ValidationReason::Missing)
    }
}

// ============================================================================
// ARTIFACTS
// ============================================================================

/// No fitted scaler is available for normalization
#[derive(Debug, Clone, PartialEq, Error)]
#[error("scaler unavailable: {reason}")]
pub struct ScalerUnavailableError {
    pub path: Option<PathBuf>,
    pub reason: String,
}

impl ScalerUnavailableError {
    pub fn new(path: Option<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path,
            reason: reason.into(),
        }
    }
}

/// The trained model artifact could not be loaded
#[derive(Debug, Clone, PartialEq, Error)]
#[error("model unavailable ({}): {reason}", path.display())]
pub struct ModelUnavailableError {
    pub path: PathBuf,
    pub reason: String,
}

impl ModelUnavailableError {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// INFERENCE
// ============================================================================

/// The model-backed path failed on a valid input
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("inference failed ({model}): {reason}")]
pub struct InferenceError {
    /// Model format that failed ("onnx", "softmax_regression", ...)
    pub model: String,
    pub reason: String,
}

impl InferenceError {
    pub fn new(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Malformed reference range configuration; fatal at startup
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid reference range for `{vital}`: {reason}")]
    InvalidRange { vital: String, reason: String },

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: String, reason: String },
}

// ============================================================================
// PER-REQUEST
// ============================================================================

/// Error surfaced to the caller of a single assessment
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(ValidationError),

    #[error(transparent)]
    Inference(InferenceError),
}

impl From<ValidationError> for AssessmentError {
    fn from(err: ValidationError) -> Self {
        AssessmentError::Validation(err)
    }
}

impl From<InferenceError> for AssessmentError {
    fn from(err: InferenceError) -> Self {
        AssessmentError::Inference(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = ValidationError::new(
            "heart_rate",
            ValidationReason::OutOfRange { value: -5.0, min: 20.0, max: 250.0 },
        );
        let msg = err.to_string();
        assert!(msg.contains("heart_rate"));
        assert!(msg.contains("-5"));
    }

    #[test]
    fn test_assessment_error_from_validation() {
        let err: AssessmentError = ValidationError::missing("temperature").into();
        match err {
            AssessmentError::Validation(v) => assert_eq!(v.field, "temperature"),
            _ => panic!("Expected Validation error"),
        }
    }
}
