//! Vitals Validation
//!
//! Raw input (form / JSON body) -> validated `VitalsRecord`.
//! Out-of-range values are rejected, never clamped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{Consciousness, VitalKind, VitalsRecord, NUMERIC_VITAL_COUNT};
use crate::logic::error::{ValidationError, ValidationReason};

/// Field name of the AVPU consciousness level
pub const CONSCIOUSNESS_FIELD: &str = "consciousness";

/// Field name of the supplemental oxygen flag
pub const ON_OXYGEN_FIELD: &str = "on_oxygen";

// ============================================================================
// RAW INPUT
// ============================================================================

/// Named raw vital values as supplied by the calling application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawVitals(BTreeMap<String, Value>);

impl RawVitals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set a field (builder style)
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

impl VitalsRecord {
    /// Validate raw input into a record.
    ///
    /// Fields are checked in record order; the first failure is returned.
    pub fn validate(raw: &RawVitals) -> Result<VitalsRecord, ValidationError> {
        let mut values = [0.0f32; NUMERIC_VITAL_COUNT];

        for (i, kind) in VitalKind::ALL.iter().enumerate() {
            let value = parse_number(kind.as_str(), raw.get(kind.as_str()))?;
            let (min, max) = kind.plausible_bounds();
            if value < min || value > max {
                return Err(ValidationError::new(
                    kind.as_str(),
                    ValidationReason::OutOfRange { value, min, max },
                ));
            }
            values[i] = value;
        }

        let systolic = values[VitalKind::SystolicBp as usize];
        let diastolic = values[VitalKind::DiastolicBp as usize];
        if diastolic >= systolic {
            return Err(ValidationError::new(
                VitalKind::DiastolicBp.as_str(),
                ValidationReason::Inconsistent {
                    detail: format!(
                        "diastolic pressure {} must be below systolic pressure {}",
                        diastolic, systolic
                    ),
                },
            ));
        }

        let consciousness = parse_consciousness(raw.get(CONSCIOUSNESS_FIELD))?;
        let on_oxygen = parse_flag(ON_OXYGEN_FIELD, raw.get(ON_OXYGEN_FIELD))?;

        for name in raw.0.keys() {
            if VitalKind::from_name(name).is_none()
                && name != CONSCIOUSNESS_FIELD
                && name != ON_OXYGEN_FIELD
            {
                log::debug!("Ignoring unrecognized vital field: {}", name);
            }
        }

        Ok(VitalsRecord::from_parts(values, consciousness, on_oxygen))
    }
}

impl TryFrom<&RawVitals> for VitalsRecord {
    type Error = ValidationError;

    fn try_from(raw: &RawVitals) -> Result<Self, Self::Error> {
        VitalsRecord::validate(raw)
    }
}

fn parse_number(field: &str, value: Option<&Value>) -> Result<f32, ValidationError> {
    let parsed = match value {
        None | Some(Value::Null) => return Err(ValidationError::missing(field)),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v as f32),
        _ => Err(ValidationError::new(
            field,
            ValidationReason::NonNumeric {
                raw: value.map(|v| v.to_string()).unwrap_or_default(),
            },
        )),
    }
}

fn parse_consciousness(value: Option<&Value>) -> Result<Consciousness, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::missing(CONSCIOUSNESS_FIELD)),
        Some(Value::String(s)) => Consciousness::parse(s).ok_or_else(|| {
            ValidationError::new(
                CONSCIOUSNESS_FIELD,
                ValidationReason::Inconsistent {
                    detail: format!("`{}` is not an AVPU level (A, V, P, U)", s),
                },
            )
        }),
        Some(other) => Err(ValidationError::new(
            CONSCIOUSNESS_FIELD,
            ValidationReason::Inconsistent {
                detail: format!("`{}` is not an AVPU level (A, V, P, U)", other),
            },
        )),
    }
}

fn parse_flag(field: &str, value: Option<&Value>) -> Result<bool, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::missing(field)),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v == 0.0 => Ok(false),
            Some(v) if v == 1.0 => Ok(true),
            _ => Err(ValidationError::new(
                field,
                ValidationReason::Inconsistent {
                    detail: format!("flag must be 0 or 1, got {}", n),
                },
            )),
        },
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            _ => Err(ValidationError::new(
                field,
                ValidationReason::NonNumeric { raw: s.clone() },
            )),
        },
        Some(other) => Err(ValidationError::new(
            field,
            ValidationReason::NonNumeric { raw: other.to_string() },
        )),
    }
}

// ============================================================================
// TESTS
// ============================================================================
