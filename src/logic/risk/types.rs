//! Risk Types
//!
//! Core types cho risk classification.
//! KHÔNG chứa logic classify - chỉ data structures.

use serde::{Deserialize, Serialize};

use crate::logic::vitals::Severity;

// ============================================================================
// RISK LABEL
// ============================================================================

/// Number of risk labels
pub const RISK_LABEL_COUNT: usize = 3;

/// Ordered risk labels (low < medium < high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    /// All labels in severity order (model output order)
    pub const ALL: [RiskLabel; RISK_LABEL_COUNT] = [RiskLabel::Low, RiskLabel::Medium, RiskLabel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::Low => "low",
            RiskLabel::Medium => "medium",
            RiskLabel::High => "high",
        }
    }

    pub fn from_index(index: usize) -> Option<RiskLabel> {
        RiskLabel::ALL.get(index).copied()
    }

    /// One tier up, saturating at High
    pub fn escalate(&self) -> RiskLabel {
        match self {
            RiskLabel::Low => RiskLabel::Medium,
            RiskLabel::Medium | RiskLabel::High => RiskLabel::High,
        }
    }

    /// Label implied by a single finding's severity
    pub fn from_severity(severity: Severity) -> RiskLabel {
        match severity {
            Severity::Normal => RiskLabel::Low,
            Severity::Warning => RiskLabel::Medium,
            Severity::Critical => RiskLabel::High,
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PROBABILITY DISTRIBUTION
// ============================================================================

/// Tolerance for "sums to 1"
pub const DISTRIBUTION_TOLERANCE: f32 = 1e-4;

/// Distribution over risk labels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: f32,
    pub medium: f32,
    pub high: f32,
}

impl RiskDistribution {
    pub const fn new(low: f32, medium: f32, high: f32) -> Self {
        Self { low, medium, high }
    }

    pub fn from_array(values: [f32; RISK_LABEL_COUNT]) -> Self {
        Self::new(values[0], values[1], values[2])
    }

    pub fn as_array(&self) -> [f32; RISK_LABEL_COUNT] {
        [self.low, self.medium, self.high]
    }

    pub fn get(&self, label: RiskLabel) -> f32 {
        match label {
            RiskLabel::Low => self.low,
            RiskLabel::Medium => self.medium,
            RiskLabel::High => self.high,
        }
    }

    pub fn sum(&self) -> f32 {
        self.low + self.medium + self.high
    }

    /// Non-negative, finite, sums to 1 within tolerance
    pub fn is_normalized(&self) -> bool {
        let values = self.as_array();
        values.iter().all(|v| v.is_finite() && *v >= 0.0) && (self.sum() - 1.0).abs() <= DISTRIBUTION_TOLERANCE
    }

    /// Most probable label; ties go to the more severe label
    pub fn argmax(&self) -> RiskLabel {
        let mut best = RiskLabel::High;
        for label in [RiskLabel::Medium, RiskLabel::Low] {
            if self.get(label) > self.get(best) {
                best = label;
            }
        }
        best
    }
}

// ============================================================================
// CLASSIFICATION PATH
// ============================================================================

/// Which strategy produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationPath {
    /// Trained model + fitted scaler; probabilities are model output
    Model,
    /// Threshold rules; probabilities are synthetic, not calibrated
    RuleBased,
}

impl ClassificationPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationPath::Model => "model",
            ClassificationPath::RuleBased => "rule_based",
        }
    }

    /// Whether the probability distribution is a genuine model estimate
    pub fn is_calibrated(&self) -> bool {
        matches!(self, ClassificationPath::Model)
    }
}

impl std::fmt::Display for ClassificationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Output shared by both classifiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub label: RiskLabel,
    pub distribution: RiskDistribution,
    pub path: ClassificationPath,
    pub reasons: Vec<String>,
}
