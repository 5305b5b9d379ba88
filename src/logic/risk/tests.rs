//! Risk classification tests

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use super::*;
use crate::logic::error::InferenceError;
use crate::logic::features::{FeatureNormalizer, MinMaxScaler, FEATURE_COUNT};
use crate::logic::model::{ModelPredictor, RiskModel};
use crate::logic::testing::{normal_raw, normal_record, random_record, record_with};
use crate::logic::vitals::{
    Consciousness, RangeOverride, ReferenceRangeTable, Severity, VitalKind, VitalsRecord,
};

fn classifier() -> RuleBasedClassifier {
    RuleBasedClassifier::new(Arc::new(ReferenceRangeTable::default()), EscalationPolicy::default())
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_all_normal_is_low() {
    let result = classifier().evaluate(&normal_record());
    assert_eq!(result.label, RiskLabel::Low);
    assert_eq!(result.path, ClassificationPath::RuleBased);
    assert_eq!(result.distribution, synthetic_distribution(RiskLabel::Low));
    assert!(result.reasons.is_empty());
}

#[test]
fn test_critical_heart_rate_is_high() {
    let record = record_with(&[("heart_rate", json!(140))]);
    let result = classifier().evaluate(&record);

    assert_eq!(result.label, RiskLabel::High);
    assert_eq!(result.reasons, vec!["heart_rate 140 above critical limit 130".to_string()]);
}

#[test]
fn test_single_warning_is_medium() {
    let record = record_with(&[("heart_rate", json!(110))]);
    let result = classifier().evaluate(&record);
    assert_eq!(result.label, RiskLabel::Medium);
    assert_eq!(result.reasons.len(), 1);
}

#[test]
fn test_two_warnings_escalate() {
    let record = record_with(&[("heart_rate", json!(110)), ("respiratory_rate", json!(22))]);

    let result = classifier().evaluate(&record);
    assert_eq!(result.label, RiskLabel::High);
    assert!(result
        .reasons
        .iter()
        .any(|r| r == "2 warning-level findings escalate medium to high"));

    let no_escalation = RuleBasedClassifier::new(Arc::new(ReferenceRangeTable::default()), EscalationPolicy::disabled());
    assert_eq!(no_escalation.evaluate(&record).label, RiskLabel::Medium);
}

#[test]
fn test_escalation_threshold_three() {
    let policy = EscalationPolicy::new(3).unwrap();
    let classifier = RuleBasedClassifier::new(Arc::new(ReferenceRangeTable::default()), policy);

    let two = record_with(&[("heart_rate", json!(110)), ("respiratory_rate", json!(22))]);
    assert_eq!(classifier.evaluate(&two).label, RiskLabel::Medium);

    let three = record_with(&[
        ("heart_rate", json!(110)),
        ("respiratory_rate", json!(22)),
        ("temperature", json!(38.0)),
    ]);
    assert_eq!(classifier.evaluate(&three).label, RiskLabel::High);
}

#[test]
fn test_critical_blocks_escalation_reason() {
    let record = record_with(&[
        ("heart_rate", json!(140)),
        ("respiratory_rate", json!(22)),
        ("temperature", json!(38.0)),
    ]);
    let result = classifier().evaluate(&record);
    assert_eq!(result.label, RiskLabel::High);
    assert!(!result.reasons.iter().any(|r| r.contains("escalate")));
}

#[test]
fn test_low_side_findings() {
    let record = record_with(&[("oxygen_saturation", json!(88))]);
    let result = classifier().evaluate(&record);
    assert_eq!(result.label, RiskLabel::High);
    assert_eq!(result.reasons, vec!["oxygen_saturation 88 below critical limit 90".to_string()]);

    let record = record_with(&[("oxygen_saturation", json!(93))]);
    assert_eq!(classifier().evaluate(&record).label, RiskLabel::Medium);
}

#[test]
fn test_band_edges_are_normal() {
    let record = record_with(&[("heart_rate", json!(100)), ("respiratory_rate", json!(12))]);
    assert_eq!(classifier().evaluate(&record).label, RiskLabel::Low);
}

#[test]
fn test_consciousness_levels() {
    let cases = [
        ("A", RiskLabel::Low),
        ("V", RiskLabel::Medium),
        ("P", RiskLabel::High),
        ("U", RiskLabel::High),
    ];
    for (level, expected) in cases {
        let record = record_with(&[("consciousness", json!(level))]);
        assert_eq!(classifier().evaluate(&record).label, expected, "level {}", level);
    }

    assert_eq!(
        RuleBasedClassifier::consciousness_severity(Consciousness::Pain),
        Severity::Critical
    );
}

#[test]
fn test_on_oxygen_counts_as_warning() {
    let record = record_with(&[("on_oxygen", json!(true))]);
    let result = classifier().evaluate(&record);
    assert_eq!(result.label, RiskLabel::Medium);
    assert_eq!(result.reasons, vec!["supplemental oxygen in use (warning)".to_string()]);

    let record = record_with(&[("on_oxygen", json!(true)), ("heart_rate", json!(110))]);
    assert_eq!(classifier().evaluate(&record).label, RiskLabel::High);
}

#[test]
fn test_custom_ranges() {
    let mut overrides: BTreeMap<String, RangeOverride> = BTreeMap::new();
    overrides.insert(
        "heart_rate".to_string(),
        serde_json::from_value(json!({ "highWarning": 90 })).unwrap(),
    );
    let table = ReferenceRangeTable::default().with_overrides(&overrides).unwrap();
    let classifier = RuleBasedClassifier::new(Arc::new(table), EscalationPolicy::default());

    let record = record_with(&[("heart_rate", json!(95))]);
    assert_eq!(classifier.evaluate(&record).label, RiskLabel::Medium);
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_random_records_well_formed() {
    let mut rng = StdRng::seed_from_u64(42);
    let classifier = classifier();

    for _ in 0..500 {
        let record = random_record(&mut rng);
        let result = classifier.evaluate(&record);

        assert!(result.distribution.is_normalized());
        assert_eq!(result.distribution.argmax(), result.label);
        assert_eq!(result.path, ClassificationPath::RuleBased);

        // Same input, same output
        assert_eq!(classifier.evaluate(&record), result);
    }
}

#[test]
fn test_moving_away_from_normal_never_lowers_label() {
    let classifier = classifier();
    let table = ReferenceRangeTable::default();

    for (kind, range) in table.iter() {
        let (low, high) = kind.plausible_bounds();
        let (band_low, band_high) = range.normal_band();

        let upward = sweep(band_high, high);
        let downward = sweep(band_low, low);

        for path in [upward, downward] {
            let mut previous = RiskLabel::Low;
            for value in path {
                let mut raw = normal_raw();
                raw.insert(kind.as_str(), value);
                // Diastolic above systolic is not a valid record
                let Ok(record) = VitalsRecord::validate(&raw) else {
                    continue;
                };
                let label = classifier.evaluate(&record).label;
                assert!(label >= previous, "{} = {} lowered label to {}", kind, value, label);
                previous = label;
            }
        }
    }
}

fn sweep(from: f32, to: f32) -> Vec<f32> {
    let steps = 40;
    (0..=steps)
        .map(|i| from + (to - from) * i as f32 / steps as f32)
        .collect()
}

#[test]
fn test_ungraded_vital_never_flags() {
    let classifier = classifier();
    assert!(ReferenceRangeTable::default().get(VitalKind::O2Scale).is_none());
    for scale in 0..=5 {
        let record = record_with(&[("o2_scale", json!(scale))]);
        assert_eq!(classifier.evaluate(&record).label, RiskLabel::Low);
    }
}

// ============================================================================
// MODEL-BACKED
// ============================================================================

struct FixedModel(Vec<f32>);

impl RiskModel for FixedModel {
    fn format(&self) -> &'static str {
        "fixed"
    }

    fn predict_proba(&self, _input: &[f32; FEATURE_COUNT]) -> Result<Vec<f32>, InferenceError> {
        Ok(self.0.clone())
    }
}

fn fitted_normalizer() -> FeatureNormalizer {
    let scaler = MinMaxScaler::new(
        &[0.0, 50.0, 0.0, 50.0, 20.0, 30.0],
        &[60.0, 100.0, 5.0, 300.0, 250.0, 45.0],
    )
    .unwrap();
    FeatureNormalizer::new(scaler)
}

#[test]
fn test_model_backed_uses_model_output() {
    let classifier = ModelBackedClassifier::new(
        fitted_normalizer(),
        ModelPredictor::new(Box::new(FixedModel(vec![0.1, 0.2, 0.7]))),
    );

    // Model output wins even when every vital is normal
    let result = classifier.classify(&normal_record()).unwrap();
    assert_eq!(result.label, RiskLabel::High);
    assert_eq!(result.path, ClassificationPath::Model);
    assert!((result.distribution.high - 0.7).abs() < 1e-4);
    assert_eq!(result.reasons, vec!["fixed model predicts high (70.0%)".to_string()]);
    assert_eq!(classifier.path(), ClassificationPath::Model);
}

#[test]
fn test_model_backed_unfitted_scaler_is_inference_error() {
    let classifier = ModelBackedClassifier::new(
        FeatureNormalizer::unfitted(),
        ModelPredictor::new(Box::new(FixedModel(vec![0.1, 0.2, 0.7]))),
    );
    let err = classifier.classify(&normal_record()).unwrap_err();
    assert_eq!(err.model, "fixed");
}

#[test]
fn test_model_backed_bad_output_is_inference_error() {
    let classifier = ModelBackedClassifier::new(
        fitted_normalizer(),
        ModelPredictor::new(Box::new(FixedModel(vec![0.5, 0.5]))),
    );
    assert!(classifier.classify(&normal_record()).is_err());
}

#[test]
fn test_rule_based_trait_object() {
    let boxed: Box<dyn RiskClassifier> = Box::new(classifier());
    assert_eq!(boxed.path(), ClassificationPath::RuleBased);
    let result = boxed.classify(&record_with(&[("heart_rate", json!(140))])).unwrap();
    assert_eq!(result.label, RiskLabel::High);
}
