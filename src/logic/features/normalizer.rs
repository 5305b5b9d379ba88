//! Feature Normalizer - Min/Max scaling
//!
//! VitalsRecord -> NormalizedFeatureVector using a fitted scaler artifact.
//! No scaler loaded = `ScalerUnavailableError`, which the engine reads as
//! "stay in rule-backed mode".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::layout::{validate_layout, FEATURE_COUNT, SCALED_FEATURE_COUNT, SCALED_VITALS};
use super::vector::NormalizedFeatureVector;
use crate::logic::error::ScalerUnavailableError;
use crate::logic::vitals::{VitalKind, VitalsRecord};

// ============================================================================
// SCALER ARTIFACT
// ============================================================================

/// Serialized scaler as exported by the training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub min_vals: Vec<f32>,
    pub max_vals: Vec<f32>,
    #[serde(default)]
    pub feature_version: Option<u8>,
    #[serde(default)]
    pub layout_hash: Option<u32>,
}

/// Fitted per-feature (min, max) table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinMaxScaler {
    min_vals: [f32; SCALED_FEATURE_COUNT],
    max_vals: [f32; SCALED_FEATURE_COUNT],
}

impl MinMaxScaler {
    /// Build from fitted bounds, validating shape and values
    pub fn new(min_vals: &[f32], max_vals: &[f32]) -> Result<Self, ScalerUnavailableError> {
        if min_vals.len() != SCALED_FEATURE_COUNT || max_vals.len() != SCALED_FEATURE_COUNT {
            return Err(ScalerUnavailableError::new(
                None,
                format!(
                    "expected {} features, got {} min / {} max values",
                    SCALED_FEATURE_COUNT,
                    min_vals.len(),
                    max_vals.len()
                ),
            ));
        }

        let mut mins = [0.0f32; SCALED_FEATURE_COUNT];
        let mut maxs = [0.0f32; SCALED_FEATURE_COUNT];

        for i in 0..SCALED_FEATURE_COUNT {
            let (min, max) = (min_vals[i], max_vals[i]);
            if !min.is_finite() || !max.is_finite() || max < min {
                return Err(ScalerUnavailableError::new(
                    None,
                    format!("invalid bounds for {}: min {} max {}", SCALED_VITALS[i], min, max),
                ));
            }
            mins[i] = min;
            maxs[i] = max;
        }

        Ok(Self { min_vals: mins, max_vals: maxs })
    }

    /// Build from an artifact, checking the declared layout
    pub fn from_artifact(artifact: &ScalerArtifact) -> Result<Self, ScalerUnavailableError> {
        if let Some(names) = &artifact.feature_names {
            let expected: Vec<&str> = SCALED_VITALS.iter().map(|k| k.as_str()).collect();
            if names.iter().map(String::as_str).ne(expected.iter().copied()) {
                return Err(ScalerUnavailableError::new(
                    None,
                    format!("feature names {:?} do not match layout {:?}", names, expected),
                ));
            }
        }

        if let (Some(version), Some(hash)) = (artifact.feature_version, artifact.layout_hash) {
            validate_layout(version, hash).map_err(|e| ScalerUnavailableError::new(None, e.to_string()))?;
        }

        Self::new(&artifact.min_vals, &artifact.max_vals)
    }

    /// Load scaler JSON from file
    pub fn load(path: &Path) -> Result<Self, ScalerUnavailableError> {
        let with_path = |reason: String| ScalerUnavailableError::new(Some(path.to_path_buf()), reason);

        if !path.exists() {
            return Err(with_path(format!("Scaler not found: {}", path.display())));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| with_path(format!("Failed to read scaler: {}", e)))?;

        let artifact: ScalerArtifact = serde_json::from_str(&content)
            .map_err(|e| with_path(format!("Failed to parse scaler: {}", e)))?;

        Self::from_artifact(&artifact).map_err(|e| with_path(e.reason))
    }

    /// (value - min) / (max - min), clamped to [0, 1].
    /// None for vitals outside the scaled layout.
    pub fn scale(&self, kind: VitalKind, value: f32) -> Option<f32> {
        let index = SCALED_VITALS.iter().position(|k| *k == kind)?;
        Some(self.scale_at(index, value))
    }

    /// `index` is always a position in SCALED_VITALS
    fn scale_at(&self, index: usize, value: f32) -> f32 {
        let min_val = self.min_vals[index];
        let range = (self.max_vals[index] - min_val).max(1e-8);
        ((value - min_val) / range).clamp(0.0, 1.0)
    }
}

// ============================================================================
// FEATURE NORMALIZER
// ============================================================================

/// Maps a VitalsRecord to the model input vector
#[derive(Debug, Clone, Default)]
pub struct FeatureNormalizer {
    scaler: Option<MinMaxScaler>,
    source: Option<PathBuf>,
}

impl FeatureNormalizer {
    pub fn new(scaler: MinMaxScaler) -> Self {
        Self { scaler: Some(scaler), source: None }
    }

    /// Normalizer with no fitted scaler
    pub fn unfitted() -> Self {
        Self::default()
    }

    /// Try to load a scaler; failure leaves the normalizer unfitted
    pub fn from_file(path: &Path) -> Self {
        match MinMaxScaler::load(path) {
            Ok(scaler) => {
                log::info!("Scaler loaded from: {}", path.display());
                Self { scaler: Some(scaler), source: Some(path.to_path_buf()) }
            }
            Err(e) => {
                log::warn!("Scaler unavailable: {}", e);
                Self::unfitted()
            }
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Normalize a record
    pub fn normalize(&self, record: &VitalsRecord) -> Result<NormalizedFeatureVector, ScalerUnavailableError> {
        let scaler = self
            .scaler
            .as_ref()
            .ok_or_else(|| ScalerUnavailableError::new(None, "no fitted scaler loaded"))?;

        let mut values = [0.0f32; FEATURE_COUNT];

        for (i, kind) in SCALED_VITALS.iter().enumerate() {
            values[i] = scaler.scale_at(i, record.value(*kind));
        }

        values[SCALED_FEATURE_COUNT] = if record.consciousness().is_alert() { 0.0 } else { 1.0 };
        values[SCALED_FEATURE_COUNT + 1] = if record.on_oxygen() { 1.0 } else { 0.0 };

        Ok(NormalizedFeatureVector::from_values(values))
    }
}
