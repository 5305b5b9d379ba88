//! Vitals Module - Input Data Model
//!
//! ## Structure
//! - `types`: VitalKind, Consciousness, VitalsRecord
//! - `validate`: RawVitals -> VitalsRecord (plausible bounds)
//! - `ranges`: ReferenceRangeTable (warning/critical thresholds)

pub mod types;
pub mod validate;
pub mod ranges;

// Re-export common types
pub use types::{Consciousness, VitalKind, VitalsRecord, NUMERIC_VITAL_COUNT};
pub use validate::{RawVitals, CONSCIOUSNESS_FIELD, ON_OXYGEN_FIELD};
pub use ranges::{Boundary, Grade, RangeOverride, ReferenceRangeTable, Severity, VitalRange, DEFAULT_RANGES};
