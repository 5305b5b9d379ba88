//! Reference Range Table
//!
//! Warning/critical thresholds per vital, shared by the rule-based
//! classifier and the abnormal vital detector.
//! Loaded once at startup, read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::VitalKind;
use crate::logic::error::ConfigurationError;

// ============================================================================
// SEVERITY
// ============================================================================

/// Severity tier of a single finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which side of the normal band a value falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Low,
    High,
}

impl Boundary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Boundary::Low => "low",
            Boundary::High => "high",
        }
    }
}

// ============================================================================
// VITAL RANGE
// ============================================================================

/// Thresholds for one vital.
///
/// Normal band is `[low_warning, high_warning]`. Below `low_critical` or
/// above `high_critical` is critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalRange {
    pub low_critical: f32,
    pub low_warning: f32,
    pub high_warning: f32,
    pub high_critical: f32,
}

/// Result of grading a value against a range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    pub severity: Severity,
    pub boundary: Option<Boundary>,
    /// The threshold that was crossed (None when normal)
    pub limit: Option<f32>,
}

impl VitalRange {
    pub const fn new(low_critical: f32, low_warning: f32, high_warning: f32, high_critical: f32) -> Self {
        Self {
            low_critical,
            low_warning,
            high_warning,
            high_critical,
        }
    }

    pub fn normal_band(&self) -> (f32, f32) {
        (self.low_warning, self.high_warning)
    }

    /// Grade a value against this range
    pub fn grade(&self, value: f32) -> Grade {
        if value < self.low_critical {
            Grade { severity: Severity::Critical, boundary: Some(Boundary::Low), limit: Some(self.low_critical) }
        } else if value < self.low_warning {
            Grade { severity: Severity::Warning, boundary: Some(Boundary::Low), limit: Some(self.low_warning) }
        } else if value > self.high_critical {
            Grade { severity: Severity::Critical, boundary: Some(Boundary::High), limit: Some(self.high_critical) }
        } else if value > self.high_warning {
            Grade { severity: Severity::Warning, boundary: Some(Boundary::High), limit: Some(self.high_warning) }
        } else {
            Grade { severity: Severity::Normal, boundary: None, limit: None }
        }
    }

    fn validate(&self, vital: &str) -> Result<(), ConfigurationError> {
        let bounds = [self.low_critical, self.low_warning, self.high_warning, self.high_critical];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(ConfigurationError::InvalidRange {
                vital: vital.to_string(),
                reason: "thresholds must be finite numbers".to_string(),
            });
        }
        if !(self.low_critical <= self.low_warning
            && self.low_warning <= self.high_warning
            && self.high_warning <= self.high_critical)
        {
            return Err(ConfigurationError::InvalidRange {
                vital: vital.to_string(),
                reason: format!(
                    "expected lowCritical <= lowWarning <= highWarning <= highCritical, got {} / {} / {} / {}",
                    self.low_critical, self.low_warning, self.high_warning, self.high_critical
                ),
            });
        }
        Ok(())
    }
}

// ============================================================================
// DEFAULTS
// ============================================================================

/// Default clinical thresholds (lowCritical, lowWarning, highWarning, highCritical)
pub const DEFAULT_RANGES: &[(VitalKind, VitalRange)] = &[
    (VitalKind::RespiratoryRate, VitalRange::new(9.0, 12.0, 20.0, 24.0)),
    (VitalKind::OxygenSaturation, VitalRange::new(90.0, 95.0, 100.0, 100.0)),
    (VitalKind::SystolicBp, VitalRange::new(90.0, 100.0, 140.0, 180.0)),
    (VitalKind::DiastolicBp, VitalRange::new(50.0, 60.0, 90.0, 120.0)),
    (VitalKind::HeartRate, VitalRange::new(40.0, 60.0, 100.0, 130.0)),
    (VitalKind::Temperature, VitalRange::new(35.0, 36.1, 37.5, 39.5)),
];

// ============================================================================
// OVERRIDES
// ============================================================================

/// Partial override of one vital's thresholds
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RangeOverride {
    #[serde(alias = "low_warning")]
    pub low_warning: Option<f32>,
    #[serde(alias = "low_critical")]
    pub low_critical: Option<f32>,
    #[serde(alias = "high_warning")]
    pub high_warning: Option<f32>,
    #[serde(alias = "high_critical")]
    pub high_critical: Option<f32>,
}

// ============================================================================
// TABLE
// ============================================================================

/// Reference ranges for every graded vital
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRangeTable {
    ranges: BTreeMap<VitalKind, VitalRange>,
}

impl Default for ReferenceRangeTable {
    fn default() -> Self {
        Self {
            ranges: DEFAULT_RANGES.iter().copied().collect(),
        }
    }
}

impl ReferenceRangeTable {
    /// Build a table from explicit ranges, validating each one
    pub fn new(ranges: impl IntoIterator<Item = (VitalKind, VitalRange)>) -> Result<Self, ConfigurationError> {
        let ranges: BTreeMap<_, _> = ranges.into_iter().collect();
        for (kind, range) in &ranges {
            range.validate(kind.as_str())?;
        }
        Ok(Self { ranges })
    }

    pub fn get(&self, kind: VitalKind) -> Option<&VitalRange> {
        self.ranges.get(&kind)
    }

    /// Graded vitals in record order
    pub fn iter(&self) -> impl Iterator<Item = (VitalKind, &VitalRange)> {
        self.ranges.iter().map(|(k, r)| (*k, r))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Apply partial overrides on top of this table.
    ///
    /// A vital without a default range must specify all four thresholds.
    pub fn with_overrides(
        mut self,
        overrides: &BTreeMap<String, RangeOverride>,
    ) -> Result<Self, ConfigurationError> {
        for (name, patch) in overrides {
            let kind = VitalKind::from_name(name).ok_or_else(|| ConfigurationError::InvalidRange {
                vital: name.clone(),
                reason: "unknown vital".to_string(),
            })?;

            let merged = match self.ranges.get(&kind) {
                Some(base) => VitalRange {
                    low_critical: patch.low_critical.unwrap_or(base.low_critical),
                    low_warning: patch.low_warning.unwrap_or(base.low_warning),
                    high_warning: patch.high_warning.unwrap_or(base.high_warning),
                    high_critical: patch.high_critical.unwrap_or(base.high_critical),
                },
                None => match (patch.low_critical, patch.low_warning, patch.high_warning, patch.high_critical) {
                    (Some(lc), Some(lw), Some(hw), Some(hc)) => VitalRange::new(lc, lw, hw, hc),
                    _ => {
                        return Err(ConfigurationError::InvalidRange {
                            vital: name.clone(),
                            reason: "no default range; all four thresholds are required".to_string(),
                        })
                    }
                },
            };

            merged.validate(name)?;
            log::info!(
                "Reference range override for {}: {} / {} / {} / {}",
                name, merged.low_critical, merged.low_warning, merged.high_warning, merged.high_critical
            );
            self.ranges.insert(kind, merged);
        }
        Ok(self)
    }

    /// Load defaults plus overrides from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let overrides: BTreeMap<String, RangeOverride> =
            serde_json::from_str(&content).map_err(|source| ConfigurationError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("Loading reference range overrides from: {}", path.display());
        Self::default().with_overrides(&overrides)
    }
}

// ============================================================================
// TESTS
// ============================================================================
