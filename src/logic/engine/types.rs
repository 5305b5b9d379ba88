//! Engine Types
//!
//! Mode, status snapshot and the assessment result.

use std::path::PathBuf;

use serde::Serialize;

use crate::logic::abnormal::AbnormalVitals;
use crate::logic::features::LayoutInfo;
use crate::logic::model::ArtifactInfo;
use crate::logic::risk::{ClassificationPath, EscalationPolicy, RiskDistribution, RiskLabel};
use crate::logic::vitals::VitalKind;

// ============================================================================
// ENGINE MODE
// ============================================================================

/// Latched once per engine instance (startup or reload)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Fitted scaler + trained model
    ModelBacked,
    /// Threshold rules only
    RuleBacked,
}

impl EngineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineMode::ModelBacked => "model_backed",
            EngineMode::RuleBacked => "rule_backed",
        }
    }

    /// Classification path every assessment in this mode takes
    pub fn path(&self) -> ClassificationPath {
        match self {
            EngineMode::ModelBacked => ClassificationPath::Model,
            EngineMode::RuleBacked => ClassificationPath::RuleBased,
        }
    }
}

impl std::fmt::Display for EngineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ENGINE STATUS
// ============================================================================

/// Snapshot for diagnostics (`--status`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStatus {
    pub version: String,
    pub mode: EngineMode,
    /// Loaded model artifact (model-backed only)
    pub model: Option<ArtifactInfo>,
    /// Scaler file in use (model-backed only)
    pub scaler: Option<PathBuf>,
    pub layout: LayoutInfo,
    pub graded_vitals: Vec<VitalKind>,
    pub escalation: EscalationPolicy,
}

// ============================================================================
// ASSESSMENT RESULT
// ============================================================================

/// The engine's only output. Contains no timestamps or counters,
/// so identical inputs serialize to identical bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessmentResult {
    pub label: RiskLabel,
    pub probabilities: RiskDistribution,
    /// Probability of `label`, in percent
    pub risk_score: f32,
    pub abnormal_vitals: AbnormalVitals,
    pub recommendations: Vec<String>,
    /// Which strategy produced `label` and `probabilities`.
    /// `rule_based` probabilities are synthetic, not calibrated.
    pub path: ClassificationPath,
    pub reasons: Vec<String>,
}
