//! Abnormal Vital Detector
//!
//! Flag từng vital nằm ngoài normal band của ReferenceRangeTable.
//! Chạy độc lập với classification path, nên UI highlight và recommendations
//! giống nhau ở cả model-backed và rule-backed mode.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::logic::vitals::{Boundary, ReferenceRangeTable, Severity, VitalKind, VitalsRecord};

// ============================================================================
// TYPES
// ============================================================================

/// One vital outside its normal band
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbnormalVital {
    pub vital: VitalKind,
    pub value: f32,
    /// Warning or Critical (never Normal)
    pub severity: Severity,
    /// Which side of the normal band was violated
    pub boundary: Boundary,
    /// The threshold that was crossed
    pub limit: f32,
    pub normal_low: f32,
    pub normal_high: f32,
}

impl AbnormalVital {
    /// e.g. "Heart Rate 140 bpm (high, critical; normal 60-100)"
    pub fn summary(&self) -> String {
        let unit = self.vital.unit();
        let value = if unit.is_empty() {
            self.value.to_string()
        } else {
            format!("{} {}", self.value, unit)
        };
        format!(
            "{} {} ({}, {}; normal {}-{})",
            self.vital.label(),
            value,
            self.boundary.as_str(),
            self.severity,
            self.normal_low,
            self.normal_high
        )
    }
}

/// Abnormal vitals keyed by vital, in record order
pub type AbnormalVitals = BTreeMap<VitalKind, AbnormalVital>;

// ============================================================================
// DETECTOR
// ============================================================================

#[derive(Debug, Clone)]
pub struct AbnormalVitalDetector {
    ranges: Arc<ReferenceRangeTable>,
}

impl AbnormalVitalDetector {
    pub fn new(ranges: Arc<ReferenceRangeTable>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &ReferenceRangeTable {
        &self.ranges
    }

    /// Graded vitals outside the normal band; ungraded vitals are never flagged
    pub fn detect(&self, record: &VitalsRecord) -> AbnormalVitals {
        let mut abnormal = BTreeMap::new();

        for (kind, range) in self.ranges.iter() {
            let value = record.value(kind);
            let grade = range.grade(value);

            if let (Some(boundary), Some(limit)) = (grade.boundary, grade.limit) {
                let (normal_low, normal_high) = range.normal_band();
                abnormal.insert(
                    kind,
                    AbnormalVital {
                        vital: kind,
                        value,
                        severity: grade.severity,
                        boundary,
                        limit,
                        normal_low,
                        normal_high,
                    },
                );
            }
        }

        if !abnormal.is_empty() {
            log::debug!("Abnormal vitals: {:?}", abnormal.keys().collect::<Vec<_>>());
        }

        abnormal
    }
}

// ============================================================================
// TESTS
// ============================================================================
