//! Vital Types
//!
//! Core types cho vitals: kinds, consciousness scale, validated record.
//! KHÔNG chứa validation logic - xem `validate.rs`.

use serde::{Deserialize, Serialize};

// ============================================================================
// VITAL KIND
// ============================================================================

/// Number of numeric vitals in a record
pub const NUMERIC_VITAL_COUNT: usize = 7;

/// Numeric vital measurements, in fixed record order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    RespiratoryRate,
    OxygenSaturation,
    O2Scale,
    SystolicBp,
    DiastolicBp,
    HeartRate,
    Temperature,
}

impl VitalKind {
    pub const ALL: [VitalKind; NUMERIC_VITAL_COUNT] = [
        VitalKind::RespiratoryRate,
        VitalKind::OxygenSaturation,
        VitalKind::O2Scale,
        VitalKind::SystolicBp,
        VitalKind::DiastolicBp,
        VitalKind::HeartRate,
        VitalKind::Temperature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VitalKind::RespiratoryRate => "respiratory_rate",
            VitalKind::OxygenSaturation => "oxygen_saturation",
            VitalKind::O2Scale => "o2_scale",
            VitalKind::SystolicBp => "systolic_bp",
            VitalKind::DiastolicBp => "diastolic_bp",
            VitalKind::HeartRate => "heart_rate",
            VitalKind::Temperature => "temperature",
        }
    }

    /// Human readable label for UI/report collaborators
    pub fn label(&self) -> &'static str {
        match self {
            VitalKind::RespiratoryRate => "Respiratory Rate",
            VitalKind::OxygenSaturation => "Oxygen Saturation",
            VitalKind::O2Scale => "O2 Scale",
            VitalKind::SystolicBp => "Systolic BP",
            VitalKind::DiastolicBp => "Diastolic BP",
            VitalKind::HeartRate => "Heart Rate",
            VitalKind::Temperature => "Temperature",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            VitalKind::RespiratoryRate => "breaths/min",
            VitalKind::OxygenSaturation => "%",
            VitalKind::O2Scale => "",
            VitalKind::SystolicBp | VitalKind::DiastolicBp => "mmHg",
            VitalKind::HeartRate => "bpm",
            VitalKind::Temperature => "°C",
        }
    }

    /// Physically plausible bounds (min, max); values outside are rejected
    pub fn plausible_bounds(&self) -> (f32, f32) {
        match self {
            VitalKind::RespiratoryRate => (0.0, 60.0),
            VitalKind::OxygenSaturation => (50.0, 100.0),
            VitalKind::O2Scale => (0.0, 5.0),
            VitalKind::SystolicBp => (50.0, 300.0),
            VitalKind::DiastolicBp => (20.0, 200.0),
            VitalKind::HeartRate => (20.0, 250.0),
            VitalKind::Temperature => (30.0, 45.0),
        }
    }

    pub fn from_name(name: &str) -> Option<VitalKind> {
        VitalKind::ALL.iter().copied().find(|k| k.as_str() == name)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for VitalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CONSCIOUSNESS (AVPU)
// ============================================================================

/// AVPU level of consciousness
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Consciousness {
    /// A - Alert
    #[serde(rename = "A")]
    Alert,
    /// V - responds to Voice
    #[serde(rename = "V")]
    Voice,
    /// P - responds to Pain
    #[serde(rename = "P")]
    Pain,
    /// U - Unresponsive
    #[serde(rename = "U")]
    Unresponsive,
}

impl Consciousness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Consciousness::Alert => "A",
            Consciousness::Voice => "V",
            Consciousness::Pain => "P",
            Consciousness::Unresponsive => "U",
        }
    }

    pub fn parse(raw: &str) -> Option<Consciousness> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a" | "alert" => Some(Consciousness::Alert),
            "v" | "voice" | "verbal" => Some(Consciousness::Voice),
            "p" | "pain" => Some(Consciousness::Pain),
            "u" | "unresponsive" => Some(Consciousness::Unresponsive),
            _ => None,
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, Consciousness::Alert)
    }
}

// ============================================================================
// VITALS RECORD
// ============================================================================

/// One validated measurement event.
///
/// Only constructible through validation (`VitalsRecord::validate`), so every
/// record handed to a classifier is complete and within plausible bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalsRecord {
    values: [f32; NUMERIC_VITAL_COUNT],
    consciousness: Consciousness,
    on_oxygen: bool,
}

impl VitalsRecord {
    pub(super) fn from_parts(
        values: [f32; NUMERIC_VITAL_COUNT],
        consciousness: Consciousness,
        on_oxygen: bool,
    ) -> Self {
        Self {
            values,
            consciousness,
            on_oxygen,
        }
    }

    /// Value of a numeric vital
    pub fn value(&self, kind: VitalKind) -> f32 {
        self.values[kind.index()]
    }

    pub fn consciousness(&self) -> Consciousness {
        self.consciousness
    }

    pub fn on_oxygen(&self) -> bool {
        self.on_oxygen
    }

    /// Iterate numeric vitals in record order
    pub fn iter(&self) -> impl Iterator<Item = (VitalKind, f32)> + '_ {
        VitalKind::ALL.iter().map(move |&k| (k, self.value(k)))
    }
}
