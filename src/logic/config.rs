//! Engine Configuration
//!
//! Artifact paths, reference range overrides, escalation policy.
//! Đọc từ env (xem `constants.rs`), validate một lần lúc startup.

use std::path::PathBuf;

use serde::Serialize;

use crate::constants;
use crate::logic::error::ConfigurationError;
use crate::logic::risk::EscalationPolicy;
use crate::logic::vitals::ReferenceRangeTable;

// ============================================================================
// ARTIFACT PATHS
// ============================================================================

/// Well-known locations of the optional trained artifacts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            scaler: PathBuf::from(constants::DEFAULT_SCALER_PATH),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, scaler: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            scaler: scaler.into(),
        }
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Everything needed to build a RiskEngine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub artifacts: ArtifactPaths,

    /// Optional JSON file with reference range overrides
    pub ranges_path: Option<PathBuf>,

    /// Warning count that escalates the rule-based label (0 disables)
    pub escalation_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactPaths::default(),
            ranges_path: None,
            escalation_count: constants::DEFAULT_ESCALATION_COUNT,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let escalation_count = match constants::get_escalation_count() {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigurationError::InvalidSetting {
                name: constants::ENV_ESCALATION_COUNT.to_string(),
                reason: format!("`{}` is not a non-negative integer", raw),
            })?,
            None => constants::DEFAULT_ESCALATION_COUNT,
        };

        Ok(Self {
            artifacts: ArtifactPaths::new(constants::get_model_path(), constants::get_scaler_path()),
            ranges_path: constants::get_ranges_path().map(PathBuf::from),
            escalation_count,
        })
    }

    /// Default table plus overrides from `ranges_path`, if set
    pub fn load_ranges(&self) -> Result<ReferenceRangeTable, ConfigurationError> {
        match &self.ranges_path {
            Some(path) => ReferenceRangeTable::load(path),
            None => Ok(ReferenceRangeTable::default()),
        }
    }

    pub fn escalation_policy(&self) -> Result<EscalationPolicy, ConfigurationError> {
        EscalationPolicy::new(self.escalation_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.artifacts.model, PathBuf::from("risk_model.onnx"));
        assert_eq!(config.artifacts.scaler, PathBuf::from("scaler.json"));
        assert_eq!(config.escalation_policy().unwrap(), EscalationPolicy::default());
        assert_eq!(config.load_ranges().unwrap(), ReferenceRangeTable::default());
    }

    #[test]
    fn test_ranges_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranges.json");
        fs::write(&path, r#"{ "heart_rate": { "highWarning": 95 } }"#).unwrap();

        let config = EngineConfig {
            ranges_path: Some(path),
            ..Default::default()
        };
        let table = config.load_ranges().unwrap();
        let hr = table.get(crate::logic::vitals::VitalKind::HeartRate).unwrap();
        assert_eq!(hr.high_warning, 95.0);
    }

    #[test]
    fn test_missing_ranges_file_is_error() {
        let config = EngineConfig {
            ranges_path: Some(PathBuf::from("/nonexistent/ranges.json")),
            ..Default::default()
        };
        assert!(matches!(config.load_ranges(), Err(ConfigurationError::Io { .. })));
    }

    #[test]
    fn test_invalid_escalation_count() {
        let config = EngineConfig {
            escalation_count: 1,
            ..Default::default()
        };
        assert!(config.escalation_policy().is_err());
    }
}
