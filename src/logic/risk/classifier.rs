//! Risk Classifiers
//!
//! Two interchangeable strategies behind one trait:
//! - `RuleBasedClassifier`: threshold rules, always available
//! - `ModelBackedClassifier`: scaler + trained model
//!
//! Input: VitalsRecord. Output: Classification.

use std::sync::Arc;

use super::rules::{synthetic_distribution, EscalationPolicy};
use super::types::{Classification, ClassificationPath, RiskLabel};
use crate::logic::error::InferenceError;
use crate::logic::features::FeatureNormalizer;
use crate::logic::model::ModelPredictor;
use crate::logic::vitals::{Boundary, Consciousness, ReferenceRangeTable, Severity, VitalKind, VitalsRecord};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A classification strategy, selected once at engine startup
pub trait RiskClassifier: Send + Sync {
    fn path(&self) -> ClassificationPath;

    fn classify(&self, record: &VitalsRecord) -> Result<Classification, InferenceError>;
}

// ============================================================================
// RULE-BASED
// ============================================================================

/// Deterministic threshold classifier (no trained artifacts)
#[derive(Debug, Clone)]
pub struct RuleBasedClassifier {
    ranges: Arc<ReferenceRangeTable>,
    escalation: EscalationPolicy,
}

impl RuleBasedClassifier {
    pub fn new(ranges: Arc<ReferenceRangeTable>, escalation: EscalationPolicy) -> Self {
        Self { ranges, escalation }
    }

    /// Severity tier of one vital value (Normal if the vital is not graded)
    pub fn vital_severity(&self, kind: VitalKind, value: f32) -> Severity {
        self.ranges
            .get(kind)
            .map(|range| range.grade(value).severity)
            .unwrap_or(Severity::Normal)
    }

    /// Severity of the AVPU level
    pub fn consciousness_severity(level: Consciousness) -> Severity {
        match level {
            Consciousness::Alert => Severity::Normal,
            Consciousness::Voice => Severity::Warning,
            Consciousness::Pain | Consciousness::Unresponsive => Severity::Critical,
        }
    }

    /// Classify; never fails for a validated record
    pub fn evaluate(&self, record: &VitalsRecord) -> Classification {
        let mut reasons = Vec::new();
        let mut warnings = 0usize;
        let mut criticals = 0usize;
        let mut most_severe = Severity::Normal;

        let mut count = |severity: Severity| {
            match severity {
                Severity::Warning => warnings += 1,
                Severity::Critical => criticals += 1,
                Severity::Normal => {}
            }
            most_severe = most_severe.max(severity);
        };

        for (kind, range) in self.ranges.iter() {
            let value = record.value(kind);
            let grade = range.grade(value);
            if let (Some(boundary), Some(limit)) = (grade.boundary, grade.limit) {
                reasons.push(format!(
                    "{} {} {} {} limit {}",
                    kind,
                    value,
                    if boundary == Boundary::Low { "below" } else { "above" },
                    grade.severity,
                    limit
                ));
            }
            count(grade.severity);
        }

        let level = record.consciousness();
        let consciousness = Self::consciousness_severity(level);
        if consciousness != Severity::Normal {
            reasons.push(format!("consciousness {} ({})", level.as_str(), consciousness));
        }
        count(consciousness);

        if record.on_oxygen() {
            reasons.push("supplemental oxygen in use (warning)".to_string());
            count(Severity::Warning);
        }

        let mut label = RiskLabel::from_severity(most_severe);

        if self.escalation.should_escalate(warnings, criticals) {
            let escalated = label.escalate();
            reasons.push(format!(
                "{} warning-level findings escalate {} to {}",
                warnings, label, escalated
            ));
            label = escalated;
        }

        Classification {
            label,
            distribution: synthetic_distribution(label),
            path: ClassificationPath::RuleBased,
            reasons,
        }
    }
}

impl RiskClassifier for RuleBasedClassifier {
    fn path(&self) -> ClassificationPath {
        ClassificationPath::RuleBased
    }

    fn classify(&self, record: &VitalsRecord) -> Result<Classification, InferenceError> {
        Ok(self.evaluate(record))
    }
}

// ============================================================================
// MODEL-BACKED
// ============================================================================

/// Fitted scaler + trained model
#[derive(Debug)]
pub struct ModelBackedClassifier {
    normalizer: FeatureNormalizer,
    predictor: ModelPredictor,
}

impl ModelBackedClassifier {
    pub fn new(normalizer: FeatureNormalizer, predictor: ModelPredictor) -> Self {
        Self { normalizer, predictor }
    }

    pub fn normalizer(&self) -> &FeatureNormalizer {
        &self.normalizer
    }

    pub fn predictor(&self) -> &ModelPredictor {
        &self.predictor
    }
}

impl RiskClassifier for ModelBackedClassifier {
    fn path(&self) -> ClassificationPath {
        ClassificationPath::Model
    }

    fn classify(&self, record: &VitalsRecord) -> Result<Classification, InferenceError> {
        // No fallback here: a failure belongs to this request
        let features = self
            .normalizer
            .normalize(record)
            .map_err(|e| InferenceError::new(self.predictor.format(), e.to_string()))?;

        log::debug!("Model input: {}", features.to_log_entry());

        let (label, distribution) = self.predictor.predict(&features)?;

        Ok(Classification {
            label,
            distribution,
            path: ClassificationPath::Model,
            reasons: vec![format!(
                "{} model predicts {} ({:.1}%)",
                self.predictor.format(),
                label,
                distribution.get(label) * 100.0
            )],
        })
    }
}
