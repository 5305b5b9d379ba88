//! Vital Risk - Risk Inference Engine
//!
//! Validates a set of vital signs, classifies patient risk (trained model
//! when artifacts are available, threshold rules otherwise), flags abnormal
//! vitals and derives prioritized recommendations.

pub mod constants;
pub mod logic;

pub use logic::abnormal::{AbnormalVital, AbnormalVitalDetector, AbnormalVitals};
pub use logic::config::{ArtifactPaths, EngineConfig};
pub use logic::engine::{EngineMode, EngineStatus, RiskAssessmentResult, RiskEngine, SharedEngine};
pub use logic::error::{
    AssessmentError, ConfigurationError, InferenceError, ModelUnavailableError, ScalerUnavailableError,
    ValidationError, ValidationReason,
};
pub use logic::recommend::RecommendationGenerator;
pub use logic::risk::{ClassificationPath, RiskDistribution, RiskLabel};
pub use logic::vitals::{RawVitals, ReferenceRangeTable, VitalKind, VitalsRecord};
