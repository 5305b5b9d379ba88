//! Recommendation Generator
//!
//! Static lookup: (risk label | abnormal vital + boundary) -> guidance text.
//! Ordered: immediate care -> finding-specific (critical trước warning)
//! -> follow-up -> general advice.
//!
//! A critical flag always brings urgent-care text, whatever the label.

use std::cmp::Reverse;
use std::collections::HashSet;

use serde::Serialize;

use crate::logic::abnormal::AbnormalVitals;
use crate::logic::risk::RiskLabel;
use crate::logic::vitals::{Boundary, Severity, VitalKind};

/// Returned when no rule matches
pub const DEFAULT_RECOMMENDATION: &str = "Consult a physician for a personal assessment of these readings.";

// ============================================================================
// RULE TYPES
// ============================================================================

/// Output ordering tier (lower sorts first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Immediate,
    Finding,
    FollowUp,
    General,
}

/// What makes a rule apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// The overall risk label
    Label(RiskLabel),
    /// The label, and only while no vital is flagged
    Unflagged(RiskLabel),
    /// Any flagged vital at critical severity
    AnyCritical,
    /// A flagged vital on the given side of its normal band
    Finding(VitalKind, Boundary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecommendationRule {
    pub trigger: Trigger,
    pub priority: Priority,
    pub text: &'static str,
}

impl RecommendationRule {
    pub const fn label(label: RiskLabel, priority: Priority, text: &'static str) -> Self {
        Self {
            trigger: Trigger::Label(label),
            priority,
            text,
        }
    }

    pub const fn unflagged(label: RiskLabel, priority: Priority, text: &'static str) -> Self {
        Self {
            trigger: Trigger::Unflagged(label),
            priority,
            text,
        }
    }

    pub const fn critical(text: &'static str) -> Self {
        Self {
            trigger: Trigger::AnyCritical,
            priority: Priority::Immediate,
            text,
        }
    }

    pub const fn finding(vital: VitalKind, boundary: Boundary, text: &'static str) -> Self {
        Self {
            trigger: Trigger::Finding(vital, boundary),
            priority: Priority::Finding,
            text,
        }
    }

    /// Severity of the matching finding, Normal for label rules.
    /// None if the rule does not apply.
    fn matches(&self, label: RiskLabel, abnormal: &AbnormalVitals) -> Option<Severity> {
        match self.trigger {
            Trigger::Label(l) => (l == label).then_some(Severity::Normal),
            Trigger::Unflagged(l) => (l == label && abnormal.is_empty()).then_some(Severity::Normal),
            Trigger::AnyCritical => abnormal
                .values()
                .any(|flag| flag.severity == Severity::Critical)
                .then_some(Severity::Critical),
            Trigger::Finding(vital, boundary) => abnormal
                .get(&vital)
                .filter(|flag| flag.boundary == boundary)
                .map(|flag| flag.severity),
        }
    }
}

// ============================================================================
// DEFAULT TABLE
// ============================================================================

use Boundary::{High as Above, Low as Below};
use Priority::*;
use VitalKind::*;

pub const DEFAULT_RULES: &[RecommendationRule] = &[
    // Any critical vital
    RecommendationRule::critical("URGENT: Seek immediate medical attention."),
    RecommendationRule::critical("Go to the nearest emergency room or call emergency services."),
    // High
    RecommendationRule::label(RiskLabel::High, Immediate, "URGENT: Seek immediate medical attention."),
    RecommendationRule::label(RiskLabel::High, Immediate, "Go to the nearest emergency room or call emergency services."),
    RecommendationRule::label(RiskLabel::High, Immediate, "Do not drive yourself to the hospital."),
    RecommendationRule::label(RiskLabel::High, Immediate, "Have someone stay with you at all times."),
    RecommendationRule::label(RiskLabel::High, FollowUp, "Do not take any new medications without doctor approval."),
    RecommendationRule::label(RiskLabel::High, FollowUp, "Bring a list of your current medications to the hospital."),
    // Medium
    RecommendationRule::label(RiskLabel::Medium, FollowUp, "Some vitals are outside the normal range."),
    RecommendationRule::label(RiskLabel::Medium, FollowUp, "Consult a doctor within the next 24-48 hours."),
    RecommendationRule::label(RiskLabel::Medium, FollowUp, "Monitor your vitals daily and track any changes."),
    RecommendationRule::label(RiskLabel::Medium, FollowUp, "Contact your healthcare provider if symptoms worsen."),
    RecommendationRule::label(RiskLabel::Medium, General, "Take prescribed medications as directed."),
    RecommendationRule::label(RiskLabel::Medium, General, "Reduce stress through relaxation techniques."),
    RecommendationRule::label(RiskLabel::Medium, General, "Follow a heart-healthy diet and reduce sodium intake."),
    // Low
    RecommendationRule::unflagged(RiskLabel::Low, General, "Your vitals are within normal range."),
    RecommendationRule::label(RiskLabel::Low, General, "Maintain a balanced diet and regular exercise."),
    RecommendationRule::label(RiskLabel::Low, General, "Stay hydrated and get adequate sleep (7-9 hours)."),
    RecommendationRule::label(RiskLabel::Low, General, "Engage in at least 30 minutes of physical activity daily."),
    RecommendationRule::label(RiskLabel::Low, General, "Schedule routine check-ups every 6-12 months."),
    RecommendationRule::label(RiskLabel::Low, General, "Avoid smoking and limit alcohol consumption."),
    // Findings
    RecommendationRule::finding(RespiratoryRate, Above, "Rapid breathing: sit upright, rest, and report any shortness of breath."),
    RecommendationRule::finding(RespiratoryRate, Below, "Slow breathing: have someone check breathing and responsiveness regularly."),
    RecommendationRule::finding(OxygenSaturation, Below, "Low oxygen saturation: check the sensor placement and seek care if it stays low."),
    RecommendationRule::finding(SystolicBp, Above, "High systolic pressure: rest and re-measure in 15 minutes; limit salt intake."),
    RecommendationRule::finding(SystolicBp, Below, "Low blood pressure: lie down, raise your legs, and drink fluids."),
    RecommendationRule::finding(DiastolicBp, Above, "High diastolic pressure: re-measure after resting and discuss it with your doctor."),
    RecommendationRule::finding(DiastolicBp, Below, "Low diastolic pressure: stand up slowly and watch for dizziness."),
    RecommendationRule::finding(HeartRate, Above, "Fast heart rate: rest, avoid caffeine, and seek care if it comes with chest pain."),
    RecommendationRule::finding(HeartRate, Below, "Slow heart rate: seek care if you feel dizzy or faint."),
    RecommendationRule::finding(Temperature, Above, "Fever: rest, stay hydrated, and use fever reducers as directed."),
    RecommendationRule::finding(Temperature, Below, "Low body temperature: move somewhere warm and add layers."),
];

// ============================================================================
// GENERATOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct RecommendationGenerator {
    rules: Vec<RecommendationRule>,
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl RecommendationGenerator {
    pub fn new(rules: Vec<RecommendationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RecommendationRule] {
        &self.rules
    }

    /// Ordered, de-duplicated guidance. Never empty.
    pub fn generate(&self, label: RiskLabel, abnormal: &AbnormalVitals) -> Vec<String> {
        let mut matched: Vec<(Priority, Reverse<Severity>, usize, &'static str)> = self
            .rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| {
                rule.matches(label, abnormal)
                    .map(|severity| (rule.priority, Reverse(severity), index, rule.text))
            })
            .collect();

        if matched.is_empty() {
            return vec![DEFAULT_RECOMMENDATION.to_string()];
        }

        matched.sort();

        let mut seen = HashSet::new();
        matched
            .into_iter()
            .filter(|(_, _, _, text)| seen.insert(*text))
            .map(|(_, _, _, text)| text.to_string())
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
